//! Ticketing backend configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Ticketing backend and ticket template configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TicketingConfig {
    /// REST endpoint; the in-memory mock is used when unset
    pub base_url: Option<String>,

    /// Bearer token for the REST endpoint
    pub api_token: Option<Secret<String>>,

    /// Queue the ticket is routed to
    #[serde(default = "default_routing_id")]
    pub routing_id: String,

    /// Ticket severity (1 = highest, 4 = lowest)
    #[serde(default = "default_severity")]
    pub severity: u8,

    #[serde(default = "default_keywords")]
    pub keywords: String,

    #[serde(default = "default_monitor_id")]
    pub monitor_id: String,

    /// Source system name recorded on the ticket
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Author of the description entry
    #[serde(default = "default_author")]
    pub author: String,

    /// Prefix of the ticket link sent to the user; the ticket id is appended
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TicketingConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the REST backend is configured
    pub fn has_backend(&self) -> bool {
        self.base_url.as_ref().is_some_and(|url| !url.is_empty())
    }

    /// Validate ticketing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=4).contains(&self.severity) {
            return Err(ValidationError::InvalidSeverity(self.severity));
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout("ticketing"));
        }

        if let Some(url) = self.base_url.as_deref().filter(|url| !url.is_empty()) {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ValidationError::InvalidUrl("ticketing.base_url"));
            }
            if self.api_token.is_none() {
                return Err(ValidationError::MissingRequired("TICKETING__API_TOKEN"));
            }
        }

        if !self.portal_url.starts_with("https://") && !self.portal_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("ticketing.portal_url"));
        }

        Ok(())
    }
}

impl Default for TicketingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            routing_id: default_routing_id(),
            severity: default_severity(),
            keywords: default_keywords(),
            monitor_id: default_monitor_id(),
            source_name: default_source_name(),
            author: default_author(),
            portal_url: default_portal_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_routing_id() -> String {
    "DataAccess/AppRegistration".to_string()
}

fn default_severity() -> u8 {
    4
}

fn default_keywords() -> String {
    "App Registration".to_string()
}

fn default_monitor_id() -> String {
    "Access Request Bot".to_string()
}

fn default_source_name() -> String {
    "AccessRequestBot".to_string()
}

fn default_author() -> String {
    "accessrequestbot".to_string()
}

fn default_portal_url() -> String {
    "https://tickets.example.com/incidents/details/".to_string()
}

fn default_timeout() -> u64 {
    30
}
