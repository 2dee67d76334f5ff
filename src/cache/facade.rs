// Thumbnail cache - the surface the viewer talks to
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::store::{CacheStats, CacheStore};
use crate::loader::{FileImageLoader, ImageHandle, ImageLoader};
use crate::preload::planner;
use crate::scanner::FileEntry;
use crate::state::ItemStates;

/// Capacity used when nothing else is configured
pub const DEFAULT_CAPACITY: usize = 50;

/// Store plus a counter bumped by every reset.
///
/// Loads remember the generation they started under and are dropped at
/// commit time if a clear or resize happened meanwhile.
struct Shared {
    store: CacheStore,
    generation: u64,
}

/// What a preload pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadOutcome {
    /// Paths in the window that were not resident
    pub requested: usize,
    /// Images decoded and inserted
    pub loaded: usize,
    /// Paths that failed to load
    pub failed: usize,
}

/// Bounded cache of decoded images with load-on-miss and windowed preloading.
///
/// All store mutations happen under one lock. Decoding runs outside it, so
/// a slow file only blocks the caller that asked for it.
pub struct ThumbnailCache<L = FileImageLoader> {
    shared: Mutex<Shared>,
    loader: L,
    item_states: ItemStates,
}

impl ThumbnailCache<FileImageLoader> {
    /// Cache that decodes from disk with the `image` crate
    pub fn with_file_loader(capacity: usize) -> Self {
        Self::new(capacity, FileImageLoader::new())
    }
}

impl<L: ImageLoader> ThumbnailCache<L> {
    /// Create an empty cache.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize, loader: L) -> Self {
        Self {
            shared: Mutex::new(Shared {
                store: CacheStore::new(nonzero_capacity(capacity)),
                generation: 0,
            }),
            loader,
            item_states: ItemStates::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recreate the store empty with the given capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn initialize(&self, capacity: usize) {
        let capacity = nonzero_capacity(capacity);
        let mut shared = self.lock();
        shared.store = CacheStore::new(capacity);
        shared.generation += 1;
        info!(capacity = capacity.get(), "thumbnail cache initialized");
    }

    /// Change capacity. Every resident image is dropped, even if it would fit.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn resize(&self, capacity: usize) {
        let capacity = nonzero_capacity(capacity);
        let mut shared = self.lock();
        let dropped = shared.store.len();
        shared.store = CacheStore::new(capacity);
        shared.generation += 1;
        info!(capacity = capacity.get(), dropped, "thumbnail cache resized");
    }

    pub fn clear(&self) {
        let mut shared = self.lock();
        shared.store.clear();
        shared.generation += 1;
        debug!("thumbnail cache cleared");
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lock().store.contains(path.as_ref())
    }

    /// Cached image for `path`, loading and inserting it on a miss.
    ///
    /// Load failures are logged and reported as None.
    pub fn fetch(&self, path: impl AsRef<Path>) -> Option<ImageHandle> {
        let path = path.as_ref();
        let generation = {
            let mut shared = self.lock();
            if let Some(image) = shared.store.get(path) {
                return Some(image);
            }
            shared.generation
        };

        match self.loader.load(path) {
            Ok(image) => {
                self.commit(path, Arc::clone(&image), generation);
                Some(image)
            }
            Err(err) => {
                warn!(error = %err, "failed to load image");
                self.lock().store.record_load_failure();
                None
            }
        }
    }

    /// `fetch` for a listed entry, refreshing its `has_thumbnail` flag
    pub fn fetch_entry(&self, entry: &FileEntry) -> Option<ImageHandle> {
        let image = self.fetch(&entry.path);
        self.item_states.set_has_thumbnail(&entry.id, image.is_some());
        image
    }

    /// Load the images around `focus_index` that are not yet resident.
    ///
    /// Best-effort: a file that fails to load is logged and skipped without
    /// holding up the rest of the window. `entries` is taken as the full
    /// displayed list; item states for paths not in it are dropped.
    pub fn ensure_preloaded(&self, entries: &[FileEntry], focus_index: usize) -> PreloadOutcome {
        self.item_states.retain(entries.iter().map(|entry| &entry.id));

        let (targets, generation) = {
            let shared = self.lock();
            let targets: Vec<&FileEntry> = planner::plan(
                entries,
                focus_index,
                shared.store.capacity(),
                |path| shared.store.contains(path),
            );
            (targets, shared.generation)
        };

        if targets.is_empty() {
            return PreloadOutcome::default();
        }
        debug!(focus_index, count = targets.len(), "preloading window");

        self.load_and_commit(&targets, generation)
    }

    /// Load only the focused entry, if it is an image that is not resident
    pub fn ensure_current(&self, entries: &[FileEntry], focus_index: usize) -> bool {
        let (target, generation) = {
            let shared = self.lock();
            let target = planner::current(entries, focus_index, |path| {
                shared.store.contains(path)
            });
            (target, shared.generation)
        };

        match target {
            Some(entry) => self.load_and_commit(&[entry], generation).loaded == 1,
            None => false,
        }
    }

    /// Decode in parallel, then insert in list order under one lock
    fn load_and_commit(&self, targets: &[&FileEntry], generation: u64) -> PreloadOutcome {
        for entry in targets {
            self.item_states.set_is_loading_thumbnail(&entry.id, true);
        }

        let decoded: Vec<_> = targets
            .par_iter()
            .map(|entry| (*entry, self.loader.load(&entry.path)))
            .collect();

        let mut outcome = PreloadOutcome {
            requested: targets.len(),
            ..PreloadOutcome::default()
        };

        {
            let mut shared = self.lock();
            let current = shared.generation == generation;

            for (entry, result) in decoded {
                let resident = match result {
                    Ok(image) if current => {
                        shared.store.insert(entry.path.clone(), image);
                        outcome.loaded += 1;
                        true
                    }
                    Ok(_) => false,
                    Err(err) => {
                        warn!(error = %err, "preload skipped image");
                        shared.store.record_load_failure();
                        outcome.failed += 1;
                        false
                    }
                };
                self.item_states.set_has_thumbnail(&entry.id, resident);
                self.item_states.set_is_loading_thumbnail(&entry.id, false);
            }

            if !current {
                debug!("discarding preload results finished after cache reset");
            }
        }

        outcome
    }

    /// Insert a finished load unless the cache was reset since it started
    fn commit(&self, path: &Path, image: ImageHandle, generation: u64) -> bool {
        let mut shared = self.lock();
        if shared.generation != generation {
            debug!(path = %path.display(), "discarding load finished after cache reset");
            return false;
        }
        shared.store.insert(path.to_path_buf(), image);
        true
    }

    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().store.capacity()
    }

    /// Resident images from least to most recently used
    pub fn snapshot(&self) -> Vec<(PathBuf, ImageHandle)> {
        self.lock().store.snapshot()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().store.stats()
    }

    /// Per-entry loading/availability flags.
    ///
    /// Pruned to the current list on every `ensure_preloaded`; callers that
    /// only use `fetch_entry` should call `retain` when the list changes.
    pub fn item_states(&self) -> &ItemStates {
        &self.item_states
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

fn nonzero_capacity(capacity: usize) -> NonZeroUsize {
    match NonZeroUsize::new(capacity) {
        Some(capacity) => capacity,
        None => panic!("thumbnail cache capacity must be at least 1"),
    }
}
