//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the interview flows and the outside world. Adapters implement these ports.
//!
//! ## Lookup Ports
//!
//! - `DirectoryService` - Resolves chat members to principal names
//! - `AnalyticsLookup` - Service tree, table, organization, and management chain queries
//!
//! ## Submission Ports
//!
//! - `TicketingService` - Ticket creation and attachment upload
//! - `ApprovalStore` - Approval record upload
//!
//! ## Conversation State
//!
//! - `InterviewStore` - One dialog stack per conversation, checked out per turn

mod analytics_lookup;
mod approval_store;
mod directory_service;
mod interview_store;
mod ticketing_service;

pub use analytics_lookup::{AnalyticsLookup, LookupError, ServiceTreeMatch};
pub use approval_store::{ApprovalStore, ApprovalStoreError};
pub use directory_service::{DirectoryError, DirectoryService};
pub use interview_store::{InterviewStore, InterviewStoreError};
pub use ticketing_service::{DescriptionEntry, TicketRecord, TicketingService, TicketingError};
