//! Execution-context resolution mode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the envelope resolves the execution-context id of a call.
///
/// In `Shared` mode (the default) every caller maps to
/// [`ExecutionContextId::SHARED`], so all concurrent callers share one
/// session and one logical transaction. Callers that need isolation across
/// concurrent units must serialize externally or use `PerContext` mode, in
/// which each calling unit supplies its own id through the call context and
/// gets its own session.
///
/// [`ExecutionContextId::SHARED`]: super::ExecutionContextId::SHARED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    #[default]
    Shared,
    PerContext,
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextMode::Shared => write!(f, "shared"),
            ContextMode::PerContext => write!(f, "per_context"),
        }
    }
}
