//! Error taxonomy for the transactional envelope.

use thiserror::Error;

use super::Propagation;

/// Errors reported by session collaborators (engine and session ports).
///
/// Implementations map their driver-level failures into these variants;
/// the envelope never inspects the payload beyond reporting it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session could not be opened: {0}")]
    OpenFailed(String),

    #[error("begin failed: {0}")]
    BeginFailed(String),

    #[error("commit failed: {0}")]
    CommitFailed(String),

    #[error("rollback failed: {0}")]
    RollbackFailed(String),

    #[error("session backend error: {0}")]
    Backend(String),
}

impl SessionError {
    pub fn open_failed(message: impl Into<String>) -> Self {
        SessionError::OpenFailed(message.into())
    }
    pub fn begin_failed(message: impl Into<String>) -> Self {
        SessionError::BeginFailed(message.into())
    }
    pub fn commit_failed(message: impl Into<String>) -> Self {
        SessionError::CommitFailed(message.into())
    }
    pub fn rollback_failed(message: impl Into<String>) -> Self {
        SessionError::RollbackFailed(message.into())
    }
    pub fn backend(message: impl Into<String>) -> Self {
        SessionError::Backend(message.into())
    }
}

/// Failures of the envelope itself, distinct from the wrapped method's own
/// results. Every variant is fatal to the current call; no retries happen
/// at this layer.
///
/// An abrupt delegate failure is not represented here: after rollback the
/// original panic is re-raised unchanged so the caller observes the real
/// cause. Only a rollback that itself fails on that path is folded into
/// [`TxError::RollbackAfterFailure`], carrying both messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// Session acquisition failed; nothing was registered.
    #[error("could not open session for '{service}': {source}")]
    AcquireSession {
        service: String,
        source: SessionError,
    },

    /// Begin failed for the resolved propagation mode.
    #[error("could not begin transaction ({propagation}): {source}")]
    Begin {
        propagation: Propagation,
        source: SessionError,
    },

    /// Commit after a successful call failed.
    #[error("commit failed for '{method}': {source}")]
    Commit {
        method: String,
        source: SessionError,
    },

    /// Marker-triggered rollback failed.
    #[error("rollback failed for '{method}': {source}")]
    Rollback {
        method: String,
        source: SessionError,
    },

    /// The delegate failed abruptly and the rollback that followed failed
    /// too; both causes are preserved.
    #[error("'{method}' failed ({cause}) and rollback also failed: {source}")]
    RollbackAfterFailure {
        method: String,
        cause: String,
        source: SessionError,
    },
}
