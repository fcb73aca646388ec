//! Mock Ticketing Service for testing.
//!
//! Records created tickets and uploaded attachments so tests can assert on
//! what an interview submitted. Failures can be injected per operation.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::TicketId;
use crate::ports::{TicketRecord, TicketingError, TicketingService};

/// An attachment uploaded to a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    pub ticket_id: TicketId,
    pub file_name: String,
    pub content: String,
}

/// In-memory ticketing backend.
#[derive(Debug, Clone)]
pub struct MockTicketingService {
    next_id: Arc<AtomicI64>,
    tickets: Arc<RwLock<Vec<(TicketId, TicketRecord)>>>,
    attachments: Arc<RwLock<Vec<StoredAttachment>>>,
    create_failure: Option<TicketingError>,
    attachment_failure: Option<TicketingError>,
}

impl Default for MockTicketingService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketingService {
    /// Creates a mock whose first ticket id is 1000.
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicI64::new(1000)),
            tickets: Arc::new(RwLock::new(Vec::new())),
            attachments: Arc::new(RwLock::new(Vec::new())),
            create_failure: None,
            attachment_failure: None,
        }
    }

    /// Makes ticket creation fail.
    pub fn failing_create(mut self, error: TicketingError) -> Self {
        self.create_failure = Some(error);
        self
    }

    /// Makes attachment upload fail.
    pub fn failing_attachment(mut self, error: TicketingError) -> Self {
        self.attachment_failure = Some(error);
        self
    }

    /// Tickets created so far, in order.
    pub async fn tickets(&self) -> Vec<(TicketId, TicketRecord)> {
        self.tickets.read().await.clone()
    }

    /// Attachments uploaded so far, in order.
    pub async fn attachments(&self) -> Vec<StoredAttachment> {
        self.attachments.read().await.clone()
    }
}

#[async_trait]
impl TicketingService for MockTicketingService {
    async fn create_ticket(&self, record: TicketRecord) -> Result<TicketId, TicketingError> {
        if let Some(error) = &self.create_failure {
            return Err(error.clone());
        }

        let id = TicketId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tickets.write().await.push((id, record));
        Ok(id)
    }

    async fn upload_attachment(
        &self,
        ticket_id: TicketId,
        file_name: &str,
        content: &str,
    ) -> Result<(), TicketingError> {
        if let Some(error) = &self.attachment_failure {
            return Err(error.clone());
        }

        self.attachments.write().await.push(StoredAttachment {
            ticket_id,
            file_name: file_name.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}
