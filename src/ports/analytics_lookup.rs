//! Analytics Lookup Port - Read-only queries against the data catalog.
//!
//! The interview validates answers against this port: service tree ids,
//! table names for a visibility scope, organization names, and the
//! management chain used by the diagnostics flow.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::DataVisibility;

/// Errors from analytics queries
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum LookupError {
    #[error("Lookup service unavailable: {0}")]
    Unavailable(String),

    #[error("Lookup timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Invalid lookup response: {0}")]
    InvalidResponse(String),
}

/// A service tree entry matching a queried id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTreeMatch {
    pub id: Uuid,
    pub service_name: String,
}

impl ServiceTreeMatch {
    pub fn new(id: Uuid, service_name: impl Into<String>) -> Self {
        Self {
            id,
            service_name: service_name.into(),
        }
    }
}

/// Port for catalog queries.
#[async_trait]
pub trait AnalyticsLookup: Send + Sync {
    /// Management chain of an alias, top-most manager first.
    async fn management_chain(&self, alias: &str) -> Result<Vec<String>, LookupError>;

    /// Service tree entries matching `id`.
    ///
    /// An empty result means not found; more than one means ambiguous.
    async fn validate_service_tree_id(&self, id: Uuid) -> Result<Vec<ServiceTreeMatch>, LookupError>;

    /// Tables that can be requested under the given visibility scope.
    async fn list_tables(&self, visibility: DataVisibility) -> Result<Vec<String>, LookupError>;

    /// Returns true when an organization with this name exists.
    async fn organization_exists(&self, name: &str) -> Result<bool, LookupError>;
}
