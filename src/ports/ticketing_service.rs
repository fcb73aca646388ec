//! Ticketing Service Port - Files access requests as tickets.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::TicketId;

/// Errors from the ticketing backend
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TicketingError {
    #[error("Ticketing backend rejected the request: {0}")]
    Rejected(String),

    #[error("Ticketing backend unavailable: {0}")]
    Unavailable(String),

    #[error("Ticketing request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Invalid ticketing response: {0}")]
    InvalidResponse(String),
}

/// A description entry on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionEntry {
    pub text: String,
    pub date: String,
    pub author: String,
}

/// The ticket filed for one access request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub title: String,
    pub description_entries: Vec<DescriptionEntry>,
    pub routing_id: String,
    pub severity: u8,
    pub keywords: String,
    pub monitor_id: String,
    pub source: String,
}

/// Port for the ticketing backend.
#[async_trait]
pub trait TicketingService: Send + Sync {
    /// Creates a ticket and returns its id.
    async fn create_ticket(&self, record: TicketRecord) -> Result<TicketId, TicketingError>;

    /// Attaches a text document to an existing ticket.
    async fn upload_attachment(
        &self,
        ticket_id: TicketId,
        file_name: &str,
        content: &str,
    ) -> Result<(), TicketingError>;
}
