// In-memory registry of active drafts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::draft::{Draft, DraftId};

/// Shared handle to one draft. Holding its lock serializes every operation
/// on that draft.
pub type DraftHandle = Arc<Mutex<Draft>>;

/// Process-lifetime storage for drafts.
///
/// The map itself is behind a `RwLock` so creates and lookups on different
/// drafts never contend beyond the brief map access. Drafts stay until
/// [`DraftStore::remove`] is called; there is no implicit eviction.
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: RwLock<HashMap<DraftId, DraftHandle>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a draft under its own identifier.
    pub fn insert(&self, draft: Draft) -> DraftId {
        let id = draft.id();
        self.drafts
            .write()
            .expect("draft store lock poisoned")
            .insert(id, Arc::new(Mutex::new(draft)));
        id
    }

    pub fn get(&self, id: &DraftId) -> Option<DraftHandle> {
        self.drafts
            .read()
            .expect("draft store lock poisoned")
            .get(id)
            .cloned()
    }

    /// Drop a draft. Returns false if it was not registered.
    pub fn remove(&self, id: &DraftId) -> bool {
        self.drafts
            .write()
            .expect("draft store lock poisoned")
            .remove(id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.drafts.read().expect("draft store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lock one draft for the duration of an operation.
pub fn lock(handle: &DraftHandle) -> MutexGuard<'_, Draft> {
    handle.lock().expect("draft mutex poisoned")
}
