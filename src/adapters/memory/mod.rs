//! In-memory adapters.

mod recording;
mod session_registry;

pub use recording::{RecordingEngine, RecordingSession};
pub use session_registry::InMemorySessionRegistry;
