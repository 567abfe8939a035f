//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the logical calling unit used to scope session reuse.
///
/// The value is supplied by the caller through [`CallContext`]; this crate
/// never infers it from runtime introspection. In shared-context mode every
/// call resolves to [`ExecutionContextId::SHARED`].
///
/// [`CallContext`]: super::CallContext
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionContextId(u64);

impl ExecutionContextId {
    /// The id shared by all callers in shared-context mode.
    pub const SHARED: ExecutionContextId = ExecutionContextId(0);

    /// Creates an id from a caller-supplied value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the inner value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether this is the shared id.
    pub fn is_shared(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExecutionContextId {
    fn default() -> Self {
        Self::SHARED
    }
}

impl fmt::Display for ExecutionContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ExecutionContextId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_id_is_zero() {
        assert_eq!(ExecutionContextId::SHARED.as_u64(), 0);
        assert!(ExecutionContextId::SHARED.is_shared());
    }

    #[test]
    fn default_is_shared() {
        assert_eq!(ExecutionContextId::default(), ExecutionContextId::SHARED);
    }

    #[test]
    fn new_preserves_value() {
        let id = ExecutionContextId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert!(!id.is_shared());
    }

    #[test]
    fn displays_inner_value() {
        assert_eq!(format!("{}", ExecutionContextId::new(7)), "7");
    }

    #[test]
    fn serializes_transparently() {
        let id = ExecutionContextId::new(9);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "9");
    }
}
