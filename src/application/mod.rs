//! Application layer - proxy construction and the per-call envelope.
//!
//! `ServiceProxy` builds one transactional decorator per service method at
//! registration time; `TransactionEnvelope` is the runtime state machine
//! each decorated call runs through.

mod envelope;
mod proxy;

pub use envelope::TransactionEnvelope;
pub use proxy::{MethodBuilder, ServiceProxy, TxMethod};
