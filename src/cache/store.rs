// Decoded image store with strict LRU eviction
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use tracing::debug;

use crate::loader::ImageHandle;

/// Counters kept alongside the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub load_failures: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, 0.0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct CacheEntry {
    image: ImageHandle,
}

/// Capacity-bounded map from path to decoded image.
///
/// The recency list and the key map live together inside `LruCache`, so
/// they can never disagree about which paths are resident. The store does
/// not load anything itself; see `ThumbnailCache` for load-on-miss.
pub struct CacheStore {
    /// path -> entry, ordered by last use
    entries: LruCache<PathBuf, CacheEntry>,
    stats: CacheStats,
}

impl CacheStore {
    /// Create an empty store holding at most `capacity` images
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Look up an image and mark it most recently used
    pub fn get(&mut self, path: &Path) -> Option<ImageHandle> {
        match self.entries.get(path) {
            Some(entry) => {
                self.stats.hits += 1;
                Some(Arc::clone(&entry.image))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Check residency without touching recency
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains(path)
    }

    /// Insert or replace an image, making it most recently used.
    ///
    /// Replacing keeps occupancy unchanged. Inserting a new path into a full
    /// store evicts the least recently used path first; that path is returned.
    pub fn insert(&mut self, path: PathBuf, image: ImageHandle) -> Option<PathBuf> {
        let mut evicted = None;

        if !self.entries.contains(&path) {
            if self.entries.len() >= self.entries.cap().get() {
                if let Some((oldest, _)) = self.entries.pop_lru() {
                    debug!(path = %oldest.display(), "evicted least recently used image");
                    self.stats.evictions += 1;
                    evicted = Some(oldest);
                }
            }
            self.stats.insertions += 1;
        }

        self.entries.put(path, CacheEntry { image });
        evicted
    }

    /// Drop a path from the store; no-op if absent
    pub fn remove(&mut self, path: &Path) -> Option<ImageHandle> {
        self.entries.pop(path).map(|entry| entry.image)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Resident images ordered from least to most recently used.
    ///
    /// Read-only; recency is not affected.
    pub fn snapshot(&self) -> Vec<(PathBuf, ImageHandle)> {
        self.entries
            .iter()
            .rev()
            .map(|(path, entry)| (path.clone(), Arc::clone(&entry.image)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub(crate) fn record_load_failure(&mut self) {
        self.stats.load_failures += 1;
    }
}
