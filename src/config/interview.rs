//! Interview behavior configuration

use serde::Deserialize;
use uuid::Uuid;

use super::error::ValidationError;

/// Feature flags and fixed texts of the interview
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Ask requesters to confirm they own the app before collecting details
    #[serde(default)]
    pub confirm_app_ownership: bool,

    /// Where users without an app identity request access groups
    #[serde(default = "default_access_groups_url")]
    pub access_groups_url: String,

    /// Principal name the console transport speaks as
    #[serde(default = "default_console_principal")]
    pub console_principal: String,

    /// Alias whose management chain the diagnostics flow looks up
    pub diagnostics_alias: Option<String>,

    /// Service tree id the diagnostics flow validates
    pub diagnostics_service_tree_id: Option<String>,
}

impl InterviewConfig {
    /// Parsed diagnostics service tree id, if configured
    pub fn diagnostics_service_tree(&self) -> Option<Uuid> {
        self.diagnostics_service_tree_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
    }

    /// Validate interview configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.access_groups_url.starts_with("https://") && !self.access_groups_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("interview.access_groups_url"));
        }
        if !self.console_principal.contains('@') {
            return Err(ValidationError::MissingRequired("INTERVIEW__CONSOLE_PRINCIPAL"));
        }
        if let Some(raw) = &self.diagnostics_service_tree_id {
            if self.diagnostics_service_tree().is_none() {
                return Err(ValidationError::InvalidServiceTreeId(raw.clone()));
            }
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            confirm_app_ownership: false,
            access_groups_url: default_access_groups_url(),
            console_principal: default_console_principal(),
            diagnostics_alias: None,
            diagnostics_service_tree_id: None,
        }
    }
}

fn default_access_groups_url() -> String {
    "https://access.example.com/data-access".to_string()
}

fn default_console_principal() -> String {
    "requester@microsoft.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interview_defaults() {
        let config = InterviewConfig::default();
        assert!(!config.confirm_app_ownership);
        assert!(config.diagnostics_service_tree().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_diagnostics_service_tree_parsed() {
        let config = InterviewConfig {
            diagnostics_service_tree_id: Some("11111111-1111-1111-1111-111111111111".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.diagnostics_service_tree(),
            Some(Uuid::from_u128(0x1111_1111_1111_1111_1111_1111_1111_1111))
        );
    }

    #[test]
    fn test_invalid_diagnostics_service_tree_rejected() {
        let config = InterviewConfig {
            diagnostics_service_tree_id: Some("not-a-guid".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidServiceTreeId("not-a-guid".to_string()))
        );
    }
}
