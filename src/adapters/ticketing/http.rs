//! HTTP Ticketing Service - REST client for the incident ticketing backend.
//!
//! # Endpoints
//!
//! - `POST {base_url}/incidents` with a [`TicketRecord`] body, answering `{"id": <i64>}`
//! - `POST {base_url}/incidents/{id}/attachments` with `{"fileName", "content"}`
//!
//! Every request carries the configured bearer token.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::TicketId;
use crate::ports::{TicketRecord, TicketingError, TicketingService};

/// Configuration for the HTTP ticketing client.
#[derive(Debug, Clone)]
pub struct HttpTicketingConfig {
    api_token: Secret<String>,
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpTicketingConfig {
    pub fn new(base_url: impl Into<String>, api_token: Secret<String>) -> Self {
        Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// Ticketing backend client.
pub struct HttpTicketingService {
    config: HttpTicketingConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CreatedTicket {
    id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentBody<'a> {
    file_name: &'a str,
    content: &'a str,
}

impl HttpTicketingService {
    pub fn new(config: HttpTicketingConfig) -> Result<Self, TicketingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TicketingError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn incidents_url(&self) -> String {
        format!("{}/incidents", self.config.base_url)
    }

    fn attachments_url(&self, ticket_id: TicketId) -> String {
        format!("{}/incidents/{}/attachments", self.config.base_url, ticket_id)
    }

    async fn post<B: Serialize + ?Sized>(&self, url: String, body: &B) -> Result<Response, TicketingError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.config.api_token())
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, body))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> TicketingError {
        if error.is_timeout() {
            TicketingError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if error.is_connect() {
            TicketingError::Unavailable(format!("Connection failed: {}", error))
        } else {
            TicketingError::Unavailable(error.to_string())
        }
    }
}

fn map_status(status: StatusCode, body: String) -> TicketingError {
    match status.as_u16() {
        400..=499 => TicketingError::Rejected(format!("{}: {}", status, body)),
        500..=599 => TicketingError::Unavailable(format!("Server error {}: {}", status, body)),
        _ => TicketingError::InvalidResponse(format!("Unexpected status {}: {}", status, body)),
    }
}

#[async_trait]
impl TicketingService for HttpTicketingService {
    async fn create_ticket(&self, record: TicketRecord) -> Result<TicketId, TicketingError> {
        let response = self.post(self.incidents_url(), &record).await?;
        let created: CreatedTicket = response
            .json()
            .await
            .map_err(|e| TicketingError::InvalidResponse(e.to_string()))?;
        Ok(TicketId::new(created.id))
    }

    async fn upload_attachment(
        &self,
        ticket_id: TicketId,
        file_name: &str,
        content: &str,
    ) -> Result<(), TicketingError> {
        let body = AttachmentBody { file_name, content };
        self.post(self.attachments_url(ticket_id), &body).await?;
        Ok(())
    }
}
