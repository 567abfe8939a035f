//! txwrap - Transactional envelope for application service methods.
//!
//! This crate wraps already-built service methods in a database transaction:
//! begin before the method body runs, commit on normal completion, roll back
//! on abrupt failure or on a declared rollback marker, and release the
//! session afterward. The concrete transactional session, its registry
//! storage, and the execution-context identity source are external
//! collaborators behind ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
