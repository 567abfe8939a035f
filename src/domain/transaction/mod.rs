//! Transaction policy types: propagation modes, per-method configuration,
//! the rollback predicate, and the error taxonomy of the envelope.

mod errors;
mod policy;
mod propagation;
mod rollback;

pub use errors::{SessionError, TxError};
pub use policy::MethodPolicy;
pub use propagation::Propagation;
pub use rollback::{RollbackPredicate, TxOutcome};
