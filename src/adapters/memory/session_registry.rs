//! In-memory session registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::foundation::ExecutionContextId;
use crate::ports::{Session, SessionRegistry};

/// Process-wide session registry backed by a locked hash map.
///
/// Satisfies the registry contract: concurrent `get`/`put`/`remove` without
/// external locking, at most one session per execution-context id. Intended
/// to be created once at engine startup and shared by every proxy built on
/// that engine.
///
/// # Panics
///
/// Methods panic if the internal lock is poisoned, which only happens after
/// a panic inside the registry itself.
#[derive(Default)]
pub struct InMemorySessionRegistry {
    entries: RwLock<HashMap<ExecutionContextId, Arc<dyn Session>>>,
}

impl InMemorySessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently registered sessions.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("InMemorySessionRegistry: lock poisoned")
            .len()
    }

    /// Whether no session is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionRegistry for InMemorySessionRegistry {
    fn get(&self, id: ExecutionContextId) -> Option<Arc<dyn Session>> {
        self.entries
            .read()
            .expect("InMemorySessionRegistry: lock poisoned")
            .get(&id)
            .cloned()
    }

    fn put(&self, id: ExecutionContextId, session: Arc<dyn Session>) {
        self.entries
            .write()
            .expect("InMemorySessionRegistry: lock poisoned")
            .insert(id, session);
    }

    fn remove(&self, id: ExecutionContextId) {
        self.entries
            .write()
            .expect("InMemorySessionRegistry: lock poisoned")
            .remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::RecordingSession;

    #[test]
    fn put_get_remove_round_trip() {
        let registry = InMemorySessionRegistry::new();
        let id = ExecutionContextId::new(4);
        assert!(registry.get(id).is_none());

        let session: Arc<dyn Session> = Arc::new(RecordingSession::new());
        registry.put(id, session);
        assert!(registry.get(id).is_some());
        assert_eq!(registry.len(), 1);

        registry.remove(id);
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn entries_are_scoped_per_id() {
        let registry = InMemorySessionRegistry::new();
        registry.put(ExecutionContextId::new(1), Arc::new(RecordingSession::new()));
        registry.put(ExecutionContextId::new(2), Arc::new(RecordingSession::new()));

        assert_eq!(registry.len(), 2);
        registry.remove(ExecutionContextId::new(1));
        assert!(registry.get(ExecutionContextId::new(2)).is_some());
    }

    #[test]
    fn put_replaces_existing_entry() {
        let registry = InMemorySessionRegistry::new();
        let id = ExecutionContextId::SHARED;
        registry.put(id, Arc::new(RecordingSession::new()));
        registry.put(id, Arc::new(RecordingSession::new()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_access_is_safe() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let mut handles = Vec::new();
        for i in 0..8u64 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                let id = ExecutionContextId::new(i);
                registry.put(id, Arc::new(RecordingSession::new()));
                assert!(registry.get(id).is_some());
                registry.remove(id);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(registry.is_empty());
    }
}
