//! Access request accumulator.
//!
//! The [`AccessRequest`] is created once the target database is known, handed
//! from flow to flow while the interview runs, and serialized exactly once by
//! the submission step.

mod justification;
mod request;

pub use justification::Justification;
pub use request::{AccessRequest, DataSet, ServicePrincipalBinding};
