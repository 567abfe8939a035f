//! Domain layer - pure transaction-policy types.
//!
//! Nothing here performs I/O. The foundation module holds the identity and
//! call-context value objects; the transaction module holds propagation
//! policy, per-method configuration, and the rollback predicate.

pub mod foundation;
pub mod transaction;
