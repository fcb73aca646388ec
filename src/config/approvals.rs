//! Approval store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where approval records go and how requesters are addressed in them
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalsConfig {
    /// Directory the file store writes records into
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Domain appended to the requester alias in approval records
    #[serde(default = "default_principal_domain")]
    pub principal_domain: String,
}

impl ApprovalsConfig {
    /// Validate approvals configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.directory.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("APPROVALS__DIRECTORY"));
        }
        if self.principal_domain.trim().is_empty() || self.principal_domain.contains('@') {
            return Err(ValidationError::MissingRequired("APPROVALS__PRINCIPAL_DOMAIN"));
        }
        Ok(())
    }
}

impl Default for ApprovalsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            principal_domain: default_principal_domain(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./data/approvals")
}

fn default_principal_domain() -> String {
    "microsoft.com".to_string()
}
