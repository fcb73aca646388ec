//! Directory Service Port - Resolves chat members to directory identities.

use async_trait::async_trait;

use crate::domain::foundation::MemberId;

/// Errors from directory lookups
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum DirectoryError {
    #[error("Member not found in directory: {0}")]
    NotFound(MemberId),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    #[error("Directory lookup timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl DirectoryError {
    /// Whether asking again later may succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, DirectoryError::NotFound(_))
    }
}

/// Port for identity lookups against the organization directory.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Returns the user principal name (`alias@domain`) of a chat member.
    async fn user_principal_name(&self, member_id: &MemberId) -> Result<String, DirectoryError>;
}
