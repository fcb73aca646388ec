//! Static Directory Adapter
//!
//! Resolves members from a fixed table. Used by tests and the console binary.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::foundation::MemberId;
use crate::ports::{DirectoryError, DirectoryService};

/// Directory backed by a fixed member table.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    principals: HashMap<MemberId, String>,
    unavailable: Option<String>,
    outages: Arc<AtomicUsize>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, member_id: MemberId, principal_name: impl Into<String>) -> Self {
        self.principals.insert(member_id, principal_name.into());
        self
    }

    /// Makes every lookup fail as if the directory were down.
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    /// Makes the next `lookups` lookups fail as unavailable, then recovers.
    pub fn unavailable_for(self, lookups: usize) -> Self {
        self.outages.store(lookups, Ordering::SeqCst);
        self
    }

    fn take_outage(&self) -> bool {
        self.outages
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl DirectoryService for StaticDirectory {
    async fn user_principal_name(&self, member_id: &MemberId) -> Result<String, DirectoryError> {
        if let Some(reason) = &self.unavailable {
            return Err(DirectoryError::Unavailable(reason.clone()));
        }
        if self.take_outage() {
            return Err(DirectoryError::Unavailable("temporary outage".to_string()));
        }
        self.principals
            .get(member_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(member_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_member_resolves() {
        let member = MemberId::new("29:abc").unwrap();
        let directory = StaticDirectory::new().with_member(member.clone(), "jdoe@contoso.com");

        assert_eq!(
            directory.user_principal_name(&member).await.unwrap(),
            "jdoe@contoso.com"
        );
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let member = MemberId::new("29:zzz").unwrap();
        let result = StaticDirectory::new().user_principal_name(&member).await;
        assert_eq!(result, Err(DirectoryError::NotFound(member)));
    }

    #[tokio::test]
    async fn unavailable_directory_fails() {
        let member = MemberId::new("29:abc").unwrap();
        let directory = StaticDirectory::new()
            .with_member(member.clone(), "jdoe@contoso.com")
            .unavailable("maintenance");

        assert!(matches!(
            directory.user_principal_name(&member).await,
            Err(DirectoryError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn outage_ends_after_given_lookups() {
        let member = MemberId::new("29:abc").unwrap();
        let directory = StaticDirectory::new()
            .with_member(member.clone(), "jdoe@contoso.com")
            .unavailable_for(1);

        let first = directory.user_principal_name(&member).await;
        assert!(matches!(first, Err(ref error) if error.is_transient()));
        assert_eq!(
            directory.user_principal_name(&member).await.unwrap(),
            "jdoe@contoso.com"
        );
    }

    #[test]
    fn missing_member_is_not_transient() {
        let member = MemberId::new("29:abc").unwrap();
        assert!(!DirectoryError::NotFound(member).is_transient());
        assert!(DirectoryError::Timeout { timeout_secs: 5 }.is_transient());
    }
}
