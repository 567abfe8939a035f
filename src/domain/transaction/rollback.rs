//! Rollback detection on returned values.
//!
//! A method may declare a rollback marker: a string matched against the
//! textual form of an error-like returned value. When it matches, the
//! envelope rolls the transaction back even though the call completed
//! without an abrupt failure, and still hands the returned value to the
//! caller.

use std::fmt;

/// Outcome of a delegate call, as seen by the rollback predicate.
///
/// Only the error channel of an outcome is inspected: success payloads can
/// never trigger a rollback, which keeps an incidental marker substring in
/// ordinary data from being mistaken for a failure.
pub trait TxOutcome {
    /// Textual form of the error-like value carried by this outcome, if any.
    fn failure_text(&self) -> Option<String>;
}

impl<T, E: fmt::Display> TxOutcome for Result<T, E> {
    fn failure_text(&self) -> Option<String> {
        self.as_ref().err().map(|e| e.to_string())
    }
}

/// Methods returning nothing can never match a marker.
impl TxOutcome for () {
    fn failure_text(&self) -> Option<String> {
        None
    }
}

/// Decides whether a completed call must be rolled back.
#[derive(Debug, Clone, Default)]
pub struct RollbackPredicate {
    marker: Option<String>,
}

impl RollbackPredicate {
    /// Predicate for a declared marker. `None` never matches.
    pub fn new(marker: Option<String>) -> Self {
        Self { marker }
    }

    /// True iff a marker was declared and the outcome carries an error
    /// whose text contains the marker as a substring.
    pub fn matches<R: TxOutcome>(&self, outcome: &R) -> bool {
        match (&self.marker, outcome.failure_text()) {
            (Some(marker), Some(text)) => text.contains(marker.as_str()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn err(text: &str) -> Result<u32, String> {
        Err(text.to_string())
    }

    #[test]
    fn matches_when_error_text_contains_marker() {
        let predicate = RollbackPredicate::new(Some("MyError".to_string()));
        assert!(predicate.matches(&err("MyError: insufficient funds")));
    }

    #[test]
    fn no_match_without_declared_marker() {
        let predicate = RollbackPredicate::new(None);
        assert!(!predicate.matches(&err("MyError: insufficient funds")));
    }

    #[test]
    fn no_match_on_success_outcome() {
        let predicate = RollbackPredicate::new(Some("MyError".to_string()));
        assert!(!predicate.matches(&Ok::<u32, String>(5)));
    }

    #[test]
    fn no_match_on_unit_outcome() {
        let predicate = RollbackPredicate::new(Some("MyError".to_string()));
        assert!(!predicate.matches(&()));
    }

    #[test]
    fn no_match_when_marker_absent_from_text() {
        let predicate = RollbackPredicate::new(Some("MyError".to_string()));
        assert!(!predicate.matches(&err("OtherError: out of stock")));
    }

    #[test]
    fn success_payload_containing_marker_does_not_match() {
        let predicate = RollbackPredicate::new(Some("MyError".to_string()));
        let outcome: Result<String, String> = Ok("log line mentioning MyError".to_string());
        assert!(!predicate.matches(&outcome));
    }

    proptest! {
        #[test]
        fn undeclared_marker_never_matches(text in ".*") {
            let predicate = RollbackPredicate::new(None);
            prop_assert!(!predicate.matches(&err(&text)));
        }

        #[test]
        fn error_containing_marker_always_matches(
            prefix in "[a-z]{0,8}",
            suffix in "[a-z]{0,8}",
        ) {
            let predicate = RollbackPredicate::new(Some("MARK".to_string()));
            let text = format!("{prefix}MARK{suffix}");
            prop_assert!(predicate.matches(&err(&text)));
        }
    }
}
