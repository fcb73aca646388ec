//! File Approval Store
//!
//! Copies staged approval records into a local directory as `{key}.json`.
//! Stands in for blob storage in local runs; the approval workflow reads the
//! directory the same way it would list a container.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::ports::{ApprovalStore, ApprovalStoreError};

/// Directory-backed approval store.
#[derive(Debug, Clone)]
pub struct FileApprovalStore {
    directory: PathBuf,
}

impl FileApprovalStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Path a record with `key` is stored under.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

#[async_trait]
impl ApprovalStore for FileApprovalStore {
    async fn upload_approval_record(&self, key: &str, staged: &Path) -> Result<(), ApprovalStoreError> {
        if key.is_empty() || key.contains(|c: char| c == '/' || c == '\\') || key.contains("..") {
            return Err(ApprovalStoreError::UploadFailed {
                key: key.to_string(),
                reason: "invalid key".to_string(),
            });
        }

        let content = fs::read(staged).await?;
        fs::create_dir_all(&self.directory).await?;

        let target = self.record_path(key);
        fs::write(&target, content).await?;

        debug!(key = %key, path = %target.display(), "Approval record stored");
        Ok(())
    }
}
