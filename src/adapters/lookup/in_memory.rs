//! In-Memory Analytics Lookup Adapter
//!
//! Serves catalog queries from seeded data. Used by tests and the console
//! binary; supports simulated latency and error injection.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

use crate::domain::foundation::DataVisibility;
use crate::ports::{AnalyticsLookup, LookupError, ServiceTreeMatch};

/// Seeded analytics catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnalyticsLookup {
    service_trees: Vec<ServiceTreeMatch>,
    tables: HashMap<DataVisibility, Vec<String>>,
    organizations: HashSet<String>,
    management_chains: HashMap<String, Vec<String>>,
    failure: Option<LookupError>,
    transient_failures: Arc<Mutex<VecDeque<LookupError>>>,
    delay: Duration,
}

impl InMemoryAnalyticsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small catalog for local runs.
    pub fn sample() -> Self {
        Self::new()
            .with_service_tree(
                Uuid::from_u128(0x1111_1111_1111_1111_1111_1111_1111_1111),
                "Engineering Insights",
            )
            .with_tables(
                DataVisibility::Private,
                ["PullRequests", "WorkItems", "Builds"],
            )
            .with_tables(
                DataVisibility::CrossOrganization,
                ["PullRequests", "WorkItems", "Builds", "Repositories"],
            )
            .with_organization("Contoso")
            .with_organization("Fabrikam")
    }

    /// Adds a service tree entry. Adding the same id twice makes it ambiguous.
    pub fn with_service_tree(mut self, id: Uuid, service_name: impl Into<String>) -> Self {
        self.service_trees.push(ServiceTreeMatch::new(id, service_name));
        self
    }

    pub fn with_tables<I, S>(mut self, visibility: DataVisibility, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(visibility)
            .or_default()
            .extend(tables.into_iter().map(Into::into));
        self
    }

    /// Adds an organization. Existence checks ignore case.
    pub fn with_organization(mut self, name: impl AsRef<str>) -> Self {
        self.organizations.insert(name.as_ref().to_lowercase());
        self
    }

    pub fn with_management_chain<I, S>(mut self, alias: impl Into<String>, chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.management_chains
            .insert(alias.into(), chain.into_iter().map(Into::into).collect());
        self
    }

    /// Makes every query fail with `error`.
    pub fn with_failure(mut self, error: LookupError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Makes the next query fail with `error`. Queued failures are used up in order.
    pub fn with_transient_failure(self, error: LookupError) -> Self {
        match self.transient_failures.lock() {
            Ok(mut queue) => queue.push_back(error),
            Err(poisoned) => poisoned.into_inner().push_back(error),
        }
        self
    }

    fn next_transient_failure(&self) -> Option<LookupError> {
        match self.transient_failures.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        }
    }

    /// Delays every query, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn simulate(&self) -> Result<(), LookupError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if let Some(error) = self.next_transient_failure() {
            return Err(error);
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AnalyticsLookup for InMemoryAnalyticsLookup {
    async fn management_chain(&self, alias: &str) -> Result<Vec<String>, LookupError> {
        self.simulate().await?;
        Ok(self.management_chains.get(alias).cloned().unwrap_or_default())
    }

    async fn validate_service_tree_id(&self, id: Uuid) -> Result<Vec<ServiceTreeMatch>, LookupError> {
        self.simulate().await?;
        Ok(self
            .service_trees
            .iter()
            .filter(|entry| entry.id == id)
            .cloned()
            .collect())
    }

    async fn list_tables(&self, visibility: DataVisibility) -> Result<Vec<String>, LookupError> {
        self.simulate().await?;
        Ok(self.tables.get(&visibility).cloned().unwrap_or_default())
    }

    async fn organization_exists(&self, name: &str) -> Result<bool, LookupError> {
        self.simulate().await?;
        Ok(self.organizations.contains(&name.trim().to_lowercase()))
    }
}
