// Per-entry UI flags, kept apart from cache residency
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::scanner::EntryId;

/// Transient flags the UI shows for one file entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemState {
    pub has_thumbnail: bool,
    pub is_loading_thumbnail: bool,
}

/// Side table of `ItemState` keyed by entry ID.
///
/// `has_thumbnail` may stay true after the image was evicted from the
/// store; the next fetch reloads it. `ThumbnailCache::ensure_preloaded`
/// prunes the table to the list it is given.
#[derive(Debug, Default)]
pub struct ItemStates {
    states: Mutex<HashMap<EntryId, ItemState>>,
}

impl ItemStates {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EntryId, ItemState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current flags for an entry; unknown entries report all-false
    pub fn get(&self, id: &EntryId) -> ItemState {
        self.lock().get(id).copied().unwrap_or_default()
    }

    pub fn has_thumbnail(&self, id: &EntryId) -> bool {
        self.get(id).has_thumbnail
    }

    pub fn is_loading_thumbnail(&self, id: &EntryId) -> bool {
        self.get(id).is_loading_thumbnail
    }

    pub fn set_has_thumbnail(&self, id: &EntryId, value: bool) {
        self.lock().entry(id.clone()).or_default().has_thumbnail = value;
    }

    pub fn set_is_loading_thumbnail(&self, id: &EntryId, value: bool) {
        self.lock().entry(id.clone()).or_default().is_loading_thumbnail = value;
    }

    /// Keep only the entries still present in the displayed list
    pub fn retain<'a>(&self, live: impl IntoIterator<Item = &'a EntryId>) {
        let live: HashSet<&EntryId> = live.into_iter().collect();
        self.lock().retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
