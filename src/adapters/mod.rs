//! Adapters - implementations of the collaborator ports.
//!
//! Only in-memory adapters ship with this crate: a registry satisfying the
//! concurrency contract for single-process use, and recording session/engine
//! fakes for tests. Store-backed engines live in the host application.

pub mod memory;

pub use memory::{InMemorySessionRegistry, RecordingEngine, RecordingSession};
