//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, closed vocabularies, answer parsing, errors)
//! - `access_request` - The request record accumulated over an interview
//! - `dialog` - Stack-based dialog engine (definitions, frames, runner)

pub mod access_request;
pub mod dialog;
pub mod foundation;
