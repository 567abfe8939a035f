//! Call context flowing through every proxied invocation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use super::ExecutionContextId;

/// Context object bound to the session for the duration of one proxied call.
///
/// Carries the execution-context id used to scope session reuse, plus
/// correlation and deadline metadata that session implementations may honor.
/// The id is always supplied explicitly here; in shared-context mode the
/// envelope ignores it and uses the shared id.
///
/// # Example
///
/// ```
/// use txwrap::domain::foundation::{CallContext, ExecutionContextId};
///
/// let ctx = CallContext::for_context(ExecutionContextId::new(7))
///     .with_correlation_id("req-123")
///     .with_deadline(std::time::Duration::from_secs(5));
/// assert_eq!(ctx.execution_context().as_u64(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Logical calling unit this invocation belongs to.
    execution_context: ExecutionContextId,

    /// Links related operations across a single request.
    /// Generated on demand if not provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Upper bound the session may apply to begin/commit/rollback work.
    /// Opaque to this crate; interpreted by the session implementation.
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<Duration>,

    /// Source of this call (e.g. "api", "scheduler"), for audit logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CallContext {
    /// Creates a context resolving to the shared execution-context id.
    pub fn shared() -> Self {
        Self::for_context(ExecutionContextId::SHARED)
    }

    /// Creates a context for an explicit execution-context id.
    pub fn for_context(id: ExecutionContextId) -> Self {
        Self {
            execution_context: id,
            correlation_id: None,
            deadline: None,
            source: None,
        }
    }

    /// Builder: add a correlation id for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: add a deadline for the session to honor.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder: add a source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the execution-context id carried by this call.
    pub fn execution_context(&self) -> ExecutionContextId {
        self.execution_context
    }

    /// Returns the correlation id, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the correlation id only if explicitly set.
    pub fn correlation_id_opt(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns the deadline if set.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_context_uses_shared_id() {
        let ctx = CallContext::shared();
        assert!(ctx.execution_context().is_shared());
        assert!(ctx.correlation_id_opt().is_none());
    }

    #[test]
    fn builder_chain_sets_all_fields() {
        let ctx = CallContext::for_context(ExecutionContextId::new(3))
            .with_correlation_id("corr-1")
            .with_deadline(Duration::from_millis(250))
            .with_source("api");

        assert_eq!(ctx.execution_context().as_u64(), 3);
        assert_eq!(ctx.correlation_id_opt(), Some("corr-1"));
        assert_eq!(ctx.deadline(), Some(Duration::from_millis(250)));
        assert_eq!(ctx.source(), Some("api"));
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        let ctx = CallContext::shared();
        assert!(!ctx.correlation_id().is_empty());
    }

    #[test]
    fn correlation_id_returns_set_value() {
        let ctx = CallContext::shared().with_correlation_id("my-id");
        assert_eq!(ctx.correlation_id(), "my-id");
    }

    #[test]
    fn serialization_skips_none_fields() {
        let ctx = CallContext::shared();
        let json = serde_json::to_string(&ctx).unwrap();

        assert!(json.contains("execution_context"));
        assert!(!json.contains("correlation_id"));
        assert!(!json.contains("deadline"));
        assert!(!json.contains("source"));
    }

    #[test]
    fn serialization_round_trip() {
        let ctx = CallContext::for_context(ExecutionContextId::new(11))
            .with_correlation_id("rt")
            .with_source("scheduler");

        let json = serde_json::to_string(&ctx).unwrap();
        let restored: CallContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, restored);
    }
}
