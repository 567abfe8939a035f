//! Ports - contracts for the external transactional collaborators.
//!
//! Following hexagonal architecture, ports define what the envelope needs
//! from the outside world; adapters (or the host application) implement them.
//!
//! - `Session` - one open transactional scope against the underlying store
//! - `SessionEngine` - opens sessions and owns the registry and context mode
//! - `SessionRegistry` - maps execution-context ids to active sessions

mod session;
mod session_engine;
mod session_registry;

pub use session::Session;
pub use session_engine::SessionEngine;
pub use session_registry::SessionRegistry;
