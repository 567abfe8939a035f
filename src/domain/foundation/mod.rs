//! Foundation value objects shared across the crate.

mod call_context;
mod context_mode;
mod ids;

pub use call_context::CallContext;
pub use context_mode::ContextMode;
pub use ids::ExecutionContextId;
