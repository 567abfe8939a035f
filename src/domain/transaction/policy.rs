//! Per-method transaction configuration.

use serde::{Deserialize, Serialize};

use super::Propagation;

/// Explicit configuration record attached to a method at registration time.
///
/// Replaces free-form declarative annotations: the propagation mode and the
/// rollback marker are typed fields, set through the proxy's method builder.
/// Both are optional; their absence changes envelope behavior:
///
/// - no `propagation`: the call begins with the session's last-begun mode,
///   joining the caller's logical transaction;
/// - no `rollback_marker`: returned values never force a rollback, only an
///   abrupt failure does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodPolicy {
    /// Mode to begin with. `None` inherits the session's last-begun mode.
    pub propagation: Option<Propagation>,

    /// Marker matched against error-like returned values to force rollback
    /// without an abrupt failure.
    pub rollback_marker: Option<String>,
}

impl MethodPolicy {
    /// Policy with no explicit mode and no rollback marker.
    pub fn inherit() -> Self {
        Self::default()
    }

    /// Builder: set the explicit propagation mode.
    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = Some(propagation);
        self
    }

    /// Builder: set the rollback marker. An empty marker would match every
    /// error text and is treated as absent.
    pub fn with_rollback_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        self.rollback_marker = if marker.is_empty() { None } else { Some(marker) };
        self
    }

    /// Mode this call begins with, falling back to the session's
    /// last-begun mode when none was declared.
    pub fn effective_propagation(&self, last_begun: Propagation) -> Propagation {
        self.propagation.unwrap_or(last_begun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_has_no_mode_and_no_marker() {
        let policy = MethodPolicy::inherit();
        assert!(policy.propagation.is_none());
        assert!(policy.rollback_marker.is_none());
    }

    #[test]
    fn explicit_mode_wins_over_last_begun() {
        let policy = MethodPolicy::inherit().with_propagation(Propagation::RequiresNew);
        assert_eq!(
            policy.effective_propagation(Propagation::Required),
            Propagation::RequiresNew
        );
    }

    #[test]
    fn untagged_method_inherits_last_begun_mode() {
        let policy = MethodPolicy::inherit();
        assert_eq!(
            policy.effective_propagation(Propagation::Required),
            Propagation::Required
        );
        assert_eq!(
            policy.effective_propagation(Propagation::Never),
            Propagation::Never
        );
    }

    #[test]
    fn empty_marker_is_treated_as_absent() {
        let policy = MethodPolicy::inherit().with_rollback_marker("");
        assert!(policy.rollback_marker.is_none());
    }

    #[test]
    fn marker_is_stored() {
        let policy = MethodPolicy::inherit().with_rollback_marker("MyError");
        assert_eq!(policy.rollback_marker.as_deref(), Some("MyError"));
    }
}
