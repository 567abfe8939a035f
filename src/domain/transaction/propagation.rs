//! Transaction propagation modes and token parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy governing whether a call starts a new transaction, joins an
/// existing one, or refuses to run without one.
///
/// The token set mirrors the declarative annotations accepted at method
/// registration. A method registered without an explicit mode inherits the
/// mode last begun on the active session, which is how untagged nested calls
/// participate in the caller's logical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    /// Join the current transaction, or start one if none exists.
    Required,
    /// Join the current transaction if present, otherwise run untransacted.
    Supports,
    /// Require a caller-managed transaction; never start one here.
    Mandatory,
    /// Always start a standalone transaction, suspending any current one.
    RequiresNew,
    /// Run untransacted, suspending any current transaction.
    NotSupported,
    /// Never start a transaction implicitly. The default for untagged
    /// methods on a fresh session.
    #[default]
    Never,
    /// Run nested inside the current transaction if one exists.
    Nested,
}

impl Propagation {
    /// Parses a declarative token. Unknown or empty tokens fall back to
    /// [`Propagation::Never`], matching the behavior for untagged methods
    /// when no session mode exists yet to inherit.
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "required" => Propagation::Required,
            "supports" => Propagation::Supports,
            "mandatory" => Propagation::Mandatory,
            "requires_new" | "required_new" => Propagation::RequiresNew,
            "not_supported" => Propagation::NotSupported,
            "never" => Propagation::Never,
            "nested" => Propagation::Nested,
            _ => Propagation::Never,
        }
    }

    /// Token form of this mode.
    pub fn as_token(&self) -> &'static str {
        match self {
            Propagation::Required => "required",
            Propagation::Supports => "supports",
            Propagation::Mandatory => "mandatory",
            Propagation::RequiresNew => "requires_new",
            Propagation::NotSupported => "not_supported",
            Propagation::Never => "never",
            Propagation::Nested => "nested",
        }
    }

    /// Whether this mode demands an active transaction for the call.
    pub fn requires_transaction(&self) -> bool {
        matches!(
            self,
            Propagation::Required
                | Propagation::Mandatory
                | Propagation::RequiresNew
                | Propagation::Nested
        )
    }

    /// Whether this mode joins a transaction already open on the session
    /// rather than demanding a standalone one.
    pub fn joins_existing(&self) -> bool {
        matches!(
            self,
            Propagation::Required | Propagation::Supports | Propagation::Mandatory
        )
    }

    /// Whether this mode runs as a nested scope inside the caller's
    /// transaction.
    pub fn is_nested(&self) -> bool {
        matches!(self, Propagation::Nested)
    }
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_never() {
        assert_eq!(Propagation::default(), Propagation::Never);
    }

    #[test]
    fn parses_every_token() {
        let cases = [
            ("required", Propagation::Required),
            ("supports", Propagation::Supports),
            ("mandatory", Propagation::Mandatory),
            ("requires_new", Propagation::RequiresNew),
            ("not_supported", Propagation::NotSupported),
            ("never", Propagation::Never),
            ("nested", Propagation::Nested),
        ];
        for (token, expected) in cases {
            assert_eq!(Propagation::parse(token), expected, "token {token}");
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(Propagation::parse("  REQUIRED "), Propagation::Required);
        assert_eq!(Propagation::parse("Requires_New"), Propagation::RequiresNew);
    }

    #[test]
    fn unknown_and_empty_tokens_default_to_never() {
        assert_eq!(Propagation::parse(""), Propagation::Never);
        assert_eq!(Propagation::parse("bogus"), Propagation::Never);
    }

    #[test]
    fn token_round_trips_through_parse() {
        for mode in [
            Propagation::Required,
            Propagation::Supports,
            Propagation::Mandatory,
            Propagation::RequiresNew,
            Propagation::NotSupported,
            Propagation::Never,
            Propagation::Nested,
        ] {
            assert_eq!(Propagation::parse(mode.as_token()), mode);
        }
    }

    #[test]
    fn semantics_accessors() {
        assert!(Propagation::Required.requires_transaction());
        assert!(Propagation::Required.joins_existing());
        assert!(!Propagation::Never.requires_transaction());
        assert!(!Propagation::RequiresNew.joins_existing());
        assert!(Propagation::Nested.is_nested());
        assert!(!Propagation::Required.is_nested());
    }

    #[test]
    fn display_matches_token() {
        assert_eq!(format!("{}", Propagation::RequiresNew), "requires_new");
    }
}
