//! Approval Store Port - Blob storage read by the approval workflow.

use async_trait::async_trait;
use std::path::Path;

/// Errors from the approval store
#[derive(Debug, thiserror::Error)]
pub enum ApprovalStoreError {
    #[error("Failed to read staged approval record: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Approval store rejected upload of {key}: {reason}")]
    UploadFailed { key: String, reason: String },
}

/// Port for uploading approval records.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    /// Uploads the staged file at `staged` under `key`.
    async fn upload_approval_record(&self, key: &str, staged: &Path) -> Result<(), ApprovalStoreError>;
}
