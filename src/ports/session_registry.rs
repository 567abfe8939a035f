//! Session registry port.

use std::sync::Arc;

use crate::domain::foundation::ExecutionContextId;

use super::Session;

/// Maps an execution-context id to at most one active session.
///
/// Contract, owned by the implementation:
///
/// - `get`/`put`/`remove` are safe for concurrent use without external
///   locking by callers;
/// - at most one session is registered per id at any observable instant;
/// - registration and deregistration are paired within the single envelope
///   invocation that created the session.
pub trait SessionRegistry: Send + Sync {
    /// Returns the session registered under `id`, if any.
    fn get(&self, id: ExecutionContextId) -> Option<Arc<dyn Session>>;

    /// Registers `session` under `id`, replacing any previous entry.
    fn put(&self, id: ExecutionContextId, session: Arc<dyn Session>);

    /// Removes the entry for `id`, if present.
    fn remove(&self, id: ExecutionContextId);
}
