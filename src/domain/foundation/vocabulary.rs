//! The closed answer sets of the access request interview.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ClosedChoice;

/// Data-visibility classification of the requested data.
///
/// `Private` and `CrossOrganization` are the restricted scopes that require
/// explicit table selection and extra justification; only `CrossOrganization`
/// additionally asks for organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataVisibility {
    #[serde(rename = "G")]
    General,
    #[default]
    #[serde(rename = "D")]
    Internal,
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "X")]
    CrossOrganization,
}

impl DataVisibility {
    /// Returns true when tables and the justification follow-ups must be captured.
    pub fn requires_table_selection(&self) -> bool {
        matches!(self, DataVisibility::Private | DataVisibility::CrossOrganization)
    }

    /// Returns true when the organizations question must be asked.
    pub fn requires_organizations(&self) -> bool {
        matches!(self, DataVisibility::CrossOrganization)
    }
}

impl ClosedChoice for DataVisibility {
    const ALL: &'static [Self] = &[
        DataVisibility::General,
        DataVisibility::Internal,
        DataVisibility::Private,
        DataVisibility::CrossOrganization,
    ];

    fn label(&self) -> &'static str {
        match self {
            DataVisibility::General => "G",
            DataVisibility::Internal => "D",
            DataVisibility::Private => "P",
            DataVisibility::CrossOrganization => "X",
        }
    }
}

impl fmt::Display for DataVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Target database of a data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetDatabase {
    AzureActiveDirectory,
    AzureDevOps,
    GitHub,
    StackOverflowAtMicrosoft,
    #[serde(rename = "GitHub-EMU")]
    GitHubEmu,
}

impl TargetDatabase {
    /// Human friendly title used on choice cards.
    pub fn title(&self) -> &'static str {
        match self {
            TargetDatabase::AzureActiveDirectory => "Azure Active Directory",
            TargetDatabase::AzureDevOps => "Azure DevOps",
            TargetDatabase::GitHub => "GitHub",
            TargetDatabase::StackOverflowAtMicrosoft => "Stack Overflow @ MSFT",
            TargetDatabase::GitHubEmu => "GitHub-EMU",
        }
    }

    /// Returns true when the scope question must be asked for this database.
    pub fn has_scoped_visibility(&self) -> bool {
        matches!(self, TargetDatabase::AzureDevOps)
    }
}

impl ClosedChoice for TargetDatabase {
    const ALL: &'static [Self] = &[
        TargetDatabase::AzureActiveDirectory,
        TargetDatabase::AzureDevOps,
        TargetDatabase::GitHub,
        TargetDatabase::StackOverflowAtMicrosoft,
        TargetDatabase::GitHubEmu,
    ];

    fn label(&self) -> &'static str {
        match self {
            TargetDatabase::AzureActiveDirectory => "AzureActiveDirectory",
            TargetDatabase::AzureDevOps => "AzureDevOps",
            TargetDatabase::GitHub => "GitHub",
            TargetDatabase::StackOverflowAtMicrosoft => "StackOverflowAtMicrosoft",
            TargetDatabase::GitHubEmu => "GitHub-EMU",
        }
    }
}

impl fmt::Display for TargetDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How the requester intends to access the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityType {
    ScAlt,
    AadApp,
    ServiceAccount,
    CorporateAccount,
    Other,
}

impl ClosedChoice for IdentityType {
    const ALL: &'static [Self] = &[
        IdentityType::ScAlt,
        IdentityType::AadApp,
        IdentityType::ServiceAccount,
        IdentityType::CorporateAccount,
        IdentityType::Other,
    ];

    fn label(&self) -> &'static str {
        match self {
            IdentityType::ScAlt => "SC-Alt",
            IdentityType::AadApp => "AAD App/MSI",
            IdentityType::ServiceAccount => "Service Account",
            IdentityType::CorporateAccount => "@microsoft.com Account",
            IdentityType::Other => "Other",
        }
    }
}

/// Tenant an application registration lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenantName {
    #[serde(rename = "MSIT")]
    Msit,
    #[serde(rename = "AME")]
    Ame,
    #[serde(rename = "PME")]
    Pme,
    Torus,
}

impl ClosedChoice for TenantName {
    const ALL: &'static [Self] = &[
        TenantName::Msit,
        TenantName::Ame,
        TenantName::Pme,
        TenantName::Torus,
    ];

    fn label(&self) -> &'static str {
        match self {
            TenantName::Msit => "MSIT",
            TenantName::Ame => "AME",
            TenantName::Pme => "PME",
            TenantName::Torus => "Torus",
        }
    }
}

impl fmt::Display for TenantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Yes/No confirmation answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl ClosedChoice for YesNo {
    const ALL: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn label(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_private_and_cross_org_require_tables() {
        assert!(!DataVisibility::General.requires_table_selection());
        assert!(!DataVisibility::Internal.requires_table_selection());
        assert!(DataVisibility::Private.requires_table_selection());
        assert!(DataVisibility::CrossOrganization.requires_table_selection());
    }

    #[test]
    fn only_cross_org_requires_organizations() {
        for visibility in DataVisibility::ALL {
            assert_eq!(
                visibility.requires_organizations(),
                *visibility == DataVisibility::CrossOrganization
            );
        }
    }

    #[test]
    fn visibility_defaults_to_internal() {
        assert_eq!(DataVisibility::default(), DataVisibility::Internal);
    }

    #[test]
    fn visibility_labels_parse_case_insensitively() {
        assert_eq!(DataVisibility::from_label("p"), Some(DataVisibility::Private));
        assert_eq!(DataVisibility::from_label(" X "), Some(DataVisibility::CrossOrganization));
        assert_eq!(DataVisibility::from_label("Q"), None);
    }

    #[test]
    fn visibility_serializes_as_code() {
        let json = serde_json::to_string(&DataVisibility::CrossOrganization).unwrap();
        assert_eq!(json, "\"X\"");
    }

    #[test]
    fn database_serializes_with_label() {
        let json = serde_json::to_string(&TargetDatabase::GitHubEmu).unwrap();
        assert_eq!(json, "\"GitHub-EMU\"");
        assert_eq!(TargetDatabase::from_label("github-emu"), Some(TargetDatabase::GitHubEmu));
    }

    #[test]
    fn only_azure_devops_has_scoped_visibility() {
        let scoped: Vec<_> = TargetDatabase::ALL
            .iter()
            .filter(|db| db.has_scoped_visibility())
            .collect();
        assert_eq!(scoped, vec![&TargetDatabase::AzureDevOps]);
    }

    #[test]
    fn identity_type_matches_source_labels() {
        assert_eq!(IdentityType::from_label("aad app/msi"), Some(IdentityType::AadApp));
        assert_eq!(
            IdentityType::from_label("@MICROSOFT.COM ACCOUNT"),
            Some(IdentityType::CorporateAccount)
        );
        assert_eq!(IdentityType::labels().len(), 5);
    }

    #[test]
    fn tenant_round_trips_through_json() {
        let json = serde_json::to_string(&TenantName::Msit).unwrap();
        assert_eq!(json, "\"MSIT\"");
        let parsed: TenantName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, TenantName::Msit);
    }
}
