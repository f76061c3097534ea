//! Process-lifetime cache of image lookups, keyed by castle id.
//!
//! Each id maps to a shared [`OnceCell`]. Inserting the cell marks the id as
//! in progress; the first caller to drive it runs the search and every other
//! caller awaits the same outcome. Entries are never evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Option<String>>>;

/// Observable state of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// Never searched.
    Unresolved,
    /// A search has been started and has not finished yet.
    InProgress,
    /// Searched; `None` is a negative result and is never retried.
    Resolved(Option<String>),
}

#[derive(Debug, Default)]
pub struct ImageCache {
    entries: Mutex<HashMap<String, Slot>>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, id: &str) -> CacheState {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(id) {
            None => CacheState::Unresolved,
            Some(slot) => match slot.get() {
                None => CacheState::InProgress,
                Some(outcome) => CacheState::Resolved(outcome.clone()),
            },
        }
    }

    /// Returns the slot for `id`, creating it if needed. The lock is released
    /// before the caller awaits anything on the slot.
    pub(crate) fn slot(&self, id: &str) -> Slot {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(id.to_owned()).or_default())
    }

    /// Number of ids that have been requested at least once.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
