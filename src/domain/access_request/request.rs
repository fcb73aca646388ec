//! AccessRequest aggregate and its parts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::Justification;
use crate::domain::foundation::{DataVisibility, TargetDatabase, TenantName};

/// The data a request targets: one database plus its table/organization scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataSet {
    pub database: TargetDatabase,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub organizations: BTreeSet<String>,
}

impl DataSet {
    pub fn new(database: TargetDatabase) -> Self {
        Self {
            database,
            tables: Vec::new(),
            organizations: BTreeSet::new(),
        }
    }
}

/// Application IDs registered in one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServicePrincipalBinding {
    pub tenant: TenantName,
    pub app_ids: Vec<Uuid>,
}

impl ServicePrincipalBinding {
    pub fn new(tenant: TenantName, app_ids: Vec<Uuid>) -> Self {
        Self { tenant, app_ids }
    }
}

/// The request record accumulated over the whole interview.
///
/// Exactly one data set is active at a time; it is stored as a single value
/// and serialized as the one-element `DataSets` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessRequest {
    requester: String,
    data_visibility: DataVisibility,
    #[serde(rename = "DataSets", with = "single_data_set")]
    data_set: DataSet,
    service_principals: Vec<ServicePrincipalBinding>,
    business_justification: Justification,
    downstream_data_consumers: u32,
    contact_email: String,
    service_tree_id: Option<Uuid>,
}

impl AccessRequest {
    /// Starts a request for the given database with default visibility.
    pub fn new(database: TargetDatabase) -> Self {
        Self {
            requester: String::new(),
            data_visibility: DataVisibility::default(),
            data_set: DataSet::new(database),
            service_principals: Vec::new(),
            business_justification: Justification::new(),
            downstream_data_consumers: 0,
            contact_email: String::new(),
            service_tree_id: None,
        }
    }

    pub fn requester(&self) -> &str {
        &self.requester
    }

    pub fn set_requester(&mut self, requester: impl Into<String>) {
        self.requester = requester.into();
    }

    pub fn data_visibility(&self) -> DataVisibility {
        self.data_visibility
    }

    pub fn set_data_visibility(&mut self, visibility: DataVisibility) {
        self.data_visibility = visibility;
    }

    pub fn data_set(&self) -> &DataSet {
        &self.data_set
    }

    pub fn data_set_mut(&mut self) -> &mut DataSet {
        &mut self.data_set
    }

    /// Discards the active data set and starts a fresh one for `database`.
    pub fn reseed_data_set(&mut self, database: TargetDatabase) {
        self.data_set = DataSet::new(database);
    }

    pub fn service_principals(&self) -> &[ServicePrincipalBinding] {
        &self.service_principals
    }

    pub fn replace_service_principals(&mut self, bindings: Vec<ServicePrincipalBinding>) {
        self.service_principals = bindings;
    }

    pub fn justification(&self) -> &Justification {
        &self.business_justification
    }

    pub fn justification_mut(&mut self) -> &mut Justification {
        &mut self.business_justification
    }

    pub fn downstream_data_consumers(&self) -> u32 {
        self.downstream_data_consumers
    }

    pub fn set_downstream_data_consumers(&mut self, count: u32) {
        self.downstream_data_consumers = count;
    }

    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    pub fn set_contact_email(&mut self, email: impl Into<String>) {
        self.contact_email = email.into();
    }

    pub fn service_tree_id(&self) -> Option<Uuid> {
        self.service_tree_id
    }

    pub fn set_service_tree_id(&mut self, id: Uuid) {
        self.service_tree_id = Some(id);
    }

    /// Compact JSON snapshot, as uploaded next to the ticket.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON snapshot, as embedded in the ticket description.
    pub fn to_pretty_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

mod single_data_set {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::DataSet;

    pub fn serialize<S: Serializer>(data_set: &DataSet, serializer: S) -> Result<S::Ok, S::Error> {
        std::slice::from_ref(data_set).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DataSet, D::Error> {
        let mut data_sets = Vec::<DataSet>::deserialize(deserializer)?;
        if data_sets.len() != 1 {
            return Err(D::Error::custom(format!(
                "expected exactly one data set, found {}",
                data_sets.len()
            )));
        }
        Ok(data_sets.remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> AccessRequest {
        let mut request = AccessRequest::new(TargetDatabase::AzureDevOps);
        request.set_requester("jdoe");
        request.set_data_visibility(DataVisibility::Private);
        request.data_set_mut().tables = vec!["TableA".to_string(), "TableB".to_string()];
        request.replace_service_principals(vec![ServicePrincipalBinding::new(
            TenantName::Msit,
            vec![Uuid::from_u128(0x2222)],
        )]);
        request.justification_mut().set_primary("Metrics");
        request
            .justification_mut()
            .push_labelled("Business Objective", "faster reviews");
        request
            .justification_mut()
            .push_labelled("Data Handling", "aggregated weekly");
        request.set_downstream_data_consumers(5);
        request.set_contact_email("team@contoso.com");
        request.set_service_tree_id(Uuid::from_u128(0x1111));
        request
    }

    #[test]
    fn new_request_has_one_data_set_and_default_visibility() {
        let request = AccessRequest::new(TargetDatabase::GitHub);
        assert_eq!(request.data_set().database, TargetDatabase::GitHub);
        assert_eq!(request.data_visibility(), DataVisibility::Internal);
        assert!(request.service_tree_id().is_none());
    }

    #[test]
    fn reseed_clears_tables_and_organizations() {
        let mut request = sample_request();
        request.data_set_mut().organizations.insert("Contoso".to_string());

        request.reseed_data_set(TargetDatabase::GitHub);

        assert_eq!(request.data_set(), &DataSet::new(TargetDatabase::GitHub));
    }

    #[test]
    fn snapshot_uses_pascal_case_fields() {
        let value: serde_json::Value =
            serde_json::from_str(&sample_request().to_snapshot().unwrap()).unwrap();

        assert_eq!(value["Requester"], json!("jdoe"));
        assert_eq!(value["DataVisibility"], json!("P"));
        assert_eq!(value["DataSets"][0]["Database"], json!("AzureDevOps"));
        assert_eq!(value["DataSets"][0]["Tables"], json!(["TableA", "TableB"]));
        assert_eq!(value["ServicePrincipals"][0]["Tenant"], json!("MSIT"));
        assert_eq!(value["DownstreamDataConsumers"], json!(5));
    }

    #[test]
    fn pretty_snapshot_has_same_content() {
        let request = sample_request();
        let compact: serde_json::Value = serde_json::from_str(&request.to_snapshot().unwrap()).unwrap();
        let pretty: serde_json::Value =
            serde_json::from_str(&request.to_pretty_snapshot().unwrap()).unwrap();
        assert_eq!(compact, pretty);

        assert_eq!(
            compact["BusinessJustification"],
            json!("Metrics - Business Objective: faster reviews - Data Handling: aggregated weekly")
        );

        let reparsed: AccessRequest = serde_json::from_value(pretty).unwrap();
        assert_eq!(reparsed, request);
    }

    #[test]
    fn deserialize_rejects_multiple_data_sets() {
        let mut value = serde_json::to_value(sample_request()).unwrap();
        value["DataSets"] = json!([
            { "Database": "GitHub" },
            { "Database": "AzureDevOps" }
        ]);
        assert!(serde_json::from_value::<AccessRequest>(value).is_err());
    }
}
