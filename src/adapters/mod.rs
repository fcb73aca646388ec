//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the interview flows to external systems:
//! - `approvals` - Approval record stores (file system, in-memory)
//! - `directory` - Directory lookups (static table)
//! - `lookup` - Analytics catalog (seeded in-memory)
//! - `storage` - Interview stack storage (in-memory)
//! - `ticketing` - Ticketing backend (HTTP, mock)

pub mod approvals;
pub mod directory;
pub mod lookup;
pub mod storage;
pub mod ticketing;

pub use approvals::{FileApprovalStore, InMemoryApprovalStore};
pub use directory::StaticDirectory;
pub use lookup::InMemoryAnalyticsLookup;
pub use storage::InMemoryInterviewStore;
pub use ticketing::{HttpTicketingConfig, HttpTicketingService, MockTicketingService};
