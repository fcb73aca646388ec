//! Ticketing adapters.
//!
//! - `HttpTicketingService` - REST client for the ticketing backend
//! - `MockTicketingService` - Records tickets in memory, with error injection

mod http;
mod mock;

pub use http::{HttpTicketingConfig, HttpTicketingService};
pub use mock::{MockTicketingService, StoredAttachment};
