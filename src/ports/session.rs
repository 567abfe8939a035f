//! Session port.
//!
//! A session is a bound handle to one active transactional scope against the
//! underlying store. Its lifecycle is driven entirely by the envelope: the
//! call that created it begins, commits or rolls back, and finally closes
//! it; nested calls that reuse it only begin/commit/rollback within it.

use async_trait::async_trait;

use crate::domain::foundation::CallContext;
use crate::domain::transaction::{Propagation, SessionError};

/// One open transaction scope.
///
/// Implementations must track the mode of the most recent successful
/// [`begin`](Session::begin) and report it from
/// [`last_propagation`](Session::last_propagation); untagged calls inherit
/// it. A fresh session reports [`Propagation::Never`].
#[async_trait]
pub trait Session: Send + Sync {
    /// Binds the current call's context (deadline, correlation metadata)
    /// to this session. Re-bound on every envelope invocation that touches
    /// the session, including nested reuse.
    fn bind(&self, ctx: &CallContext);

    /// Begins a transaction with the given propagation mode.
    ///
    /// # Errors
    ///
    /// `BeginFailed` on store-level failure. The envelope treats this as
    /// fatal to the call; no retry.
    async fn begin(&self, propagation: Propagation) -> Result<(), SessionError>;

    /// Commits the current transaction.
    async fn commit(&self) -> Result<(), SessionError>;

    /// Rolls back the current transaction.
    async fn rollback(&self) -> Result<(), SessionError>;

    /// Releases the session. Called exactly once, by the envelope
    /// invocation that created the session.
    async fn close(&self);

    /// Mode of the most recent successful begin, [`Propagation::Never`]
    /// for a session that has not begun yet.
    fn last_propagation(&self) -> Propagation;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_is_object_safe() {
        fn _accepts_dyn(_session: &dyn Session) {}
    }
}
