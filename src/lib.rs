//! Bounded in-memory cache of decoded thumbnails.
//!
//! Images are keyed by file path and evicted least-recently-used first.
//! Around the entry the viewer is focused on, a window of neighbours can be
//! preloaded ahead of demand, either inline or on a background thread.
//!
//! ```no_run
//! use thumbcache::{scanner, ThumbnailCache};
//!
//! let cache = ThumbnailCache::with_file_loader(50);
//! let entries = scanner::scan_directory("photos".as_ref()).unwrap();
//! cache.ensure_preloaded(&entries, 0);
//! let first = cache.fetch(&entries[0].path);
//! ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod preload;
pub mod scanner;
pub mod settings;
pub mod state;

pub use cache::{CacheStats, CacheStore, PreloadOutcome, ThumbnailCache, DEFAULT_CAPACITY};
pub use error::{LoadError, SettingsError};
pub use loader::{DecodedImage, FileImageLoader, ImageHandle, ImageLoader};
pub use preload::BackgroundPreloader;
pub use scanner::{is_image_file, EntryId, FileEntry, FileKind};
pub use settings::CacheSettings;
pub use state::{ItemState, ItemStates};
