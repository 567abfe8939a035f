//! Session engine port.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::ContextMode;
use crate::domain::transaction::SessionError;

use super::{Session, SessionRegistry};

/// Factory and registry owner for transactional sessions.
///
/// The engine decides the context-resolution mode for every call it backs
/// and owns the process-wide registry, which is expected to be initialized
/// once at engine startup and shared across all proxies built on the engine.
#[async_trait]
pub trait SessionEngine: Send + Sync {
    /// Opens a new session.
    ///
    /// `identity_hint` is the fully-qualified type name of the service the
    /// call belongs to; implementations may use it to pick a datasource or
    /// tag diagnostics.
    ///
    /// # Errors
    ///
    /// `OpenFailed` when no session can be established. The envelope
    /// escalates this immediately, leaving nothing registered.
    async fn open_session(&self, identity_hint: &str) -> Result<Arc<dyn Session>, SessionError>;

    /// The registry scoping session reuse by execution-context id.
    fn registry(&self) -> Arc<dyn SessionRegistry>;

    /// How execution-context ids are resolved for calls on this engine.
    fn context_mode(&self) -> ContextMode;
}
