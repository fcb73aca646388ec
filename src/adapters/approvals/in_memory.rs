//! In-Memory Approval Store
//!
//! Reads each staged record and keeps its content by key. Useful for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{ApprovalStore, ApprovalStoreError};

/// Approval store that keeps uploaded records in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApprovalStore {
    records: Arc<RwLock<HashMap<String, String>>>,
    failure: Option<String>,
}

impl InMemoryApprovalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every upload fail with `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Uploaded records by key.
    pub async fn records(&self) -> HashMap<String, String> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl ApprovalStore for InMemoryApprovalStore {
    async fn upload_approval_record(&self, key: &str, staged: &Path) -> Result<(), ApprovalStoreError> {
        if let Some(reason) = &self.failure {
            return Err(ApprovalStoreError::UploadFailed {
                key: key.to_string(),
                reason: reason.clone(),
            });
        }

        let content = tokio::fs::read_to_string(staged).await?;
        self.records.write().await.insert(key.to_string(), content);
        Ok(())
    }
}
