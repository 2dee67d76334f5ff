// Cache module - LRU store and the thumbnail cache built on it
mod facade;
mod store;

pub use facade::{PreloadOutcome, ThumbnailCache, DEFAULT_CAPACITY};
pub use store::{CacheStats, CacheStore};
