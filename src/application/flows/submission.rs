//! Filing a completed request: ticket, attachment, approval record.

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::{FlowServices, TicketTemplate};
use crate::domain::access_request::AccessRequest;
use crate::domain::foundation::TicketId;
use crate::ports::{
    ApprovalStore, ApprovalStoreError, DescriptionEntry, TicketRecord, TicketingError,
    TicketingService,
};

/// Name of the request snapshot attached to every ticket.
pub const SNAPSHOT_FILE_NAME: &str = "AccessRequest.json";

/// Why a submission failed.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Failed to serialize request: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Ticketing failed: {0}")]
    Ticketing(#[from] TicketingError),

    #[error("Failed to stage approval record: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Approval record upload failed: {0}")]
    Approval(#[from] ApprovalStoreError),
}

/// Files access requests with the ticketing backend and the approval store.
#[derive(Clone)]
pub struct Submitter {
    ticketing: Arc<dyn TicketingService>,
    approvals: Arc<dyn ApprovalStore>,
    template: TicketTemplate,
    principal_domain: String,
}

impl Submitter {
    pub fn new(
        ticketing: Arc<dyn TicketingService>,
        approvals: Arc<dyn ApprovalStore>,
        template: TicketTemplate,
        principal_domain: impl Into<String>,
    ) -> Self {
        Self {
            ticketing,
            approvals,
            template,
            principal_domain: principal_domain.into(),
        }
    }

    pub fn from_services(services: &FlowServices) -> Self {
        Self::new(
            services.ticketing.clone(),
            services.approvals.clone(),
            services.settings.ticket.clone(),
            services.settings.principal_domain.clone(),
        )
    }

    /// Builds the ticket for `request`.
    pub fn ticket_record(&self, request: &AccessRequest) -> Result<TicketRecord, SubmissionError> {
        Ok(TicketRecord {
            title: format!(
                "App Access Request {}/{}",
                request.data_visibility(),
                request.requester()
            ),
            description_entries: vec![DescriptionEntry {
                text: request.to_pretty_snapshot()?,
                date: Utc::now().to_rfc3339(),
                author: self.template.author.clone(),
            }],
            routing_id: self.template.routing_id.clone(),
            severity: self.template.severity,
            keywords: self.template.keywords.clone(),
            monitor_id: self.template.monitor_id.clone(),
            source: self.template.source_name.clone(),
        })
    }

    /// Approval record linking the requester to the ticket.
    pub fn approval_record(&self, request: &AccessRequest, ticket_id: TicketId) -> serde_json::Value {
        json!({
            "userPrincipalName": format!("{}@{}", request.requester(), self.principal_domain),
            "ticketId": ticket_id.to_string(),
        })
    }

    /// Files the request and returns the new ticket id.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage. A ticket may already exist when the
    /// attachment or approval upload fails.
    pub async fn submit(&self, request: &AccessRequest) -> Result<TicketId, SubmissionError> {
        let record = self.ticket_record(request)?;
        let snapshot = request.to_snapshot()?;

        let ticket_id = self.ticketing.create_ticket(record).await?;
        info!(ticket_id = %ticket_id, requester = request.requester(), "Ticket created");

        self.ticketing
            .upload_attachment(ticket_id, SNAPSHOT_FILE_NAME, &snapshot)
            .await?;

        let mut staged = NamedTempFile::new()?;
        staged.write_all(self.approval_record(request, ticket_id).to_string().as_bytes())?;
        staged.flush()?;

        let key = Uuid::new_v4().to_string();
        self.approvals
            .upload_approval_record(&key, staged.path())
            .await?;
        info!(ticket_id = %ticket_id, approval_key = %key, "Approval record uploaded");

        if let Err(error) = staged.close() {
            warn!(error = %error, "Failed to remove staged approval record");
        }
        Ok(ticket_id)
    }

    /// Confirmation sent once the request is filed.
    pub fn confirmation(&self, ticket_id: TicketId) -> String {
        format!(
            "Your request has been logged in our system. We have notified your manager for approval. \
The request will not proceed without manager approval. You will receive an update on the ticket \
when the approval is done. You can view the ticket through this link. Please monitor the ticket \
and respond to any comments on it, {}{}",
            self.template.portal_url, ticket_id
        )
    }
}
