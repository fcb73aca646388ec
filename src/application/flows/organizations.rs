//! Organization existence filtering.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::warn;

use super::bounded_lookup;
use crate::ports::{AnalyticsLookup, LookupError};

/// Outcome of checking a list of candidate organizations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationFilter {
    /// Organizations that exist, de-duplicated.
    pub found: BTreeSet<String>,
    /// Candidates that could not be found, in input order.
    pub missing: Vec<String>,
}

impl OrganizationFilter {
    /// Messages telling the user what was kept and what was dropped.
    pub fn report(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .missing
            .iter()
            .map(|org| {
                format!(
                    "'{}' could not be found. I will continue to check your other organizations.",
                    org
                )
            })
            .collect();
        if !self.found.is_empty() {
            let found: Vec<&str> = self.found.iter().map(String::as_str).collect();
            messages.push(format!("Found organizations: {}", found.join(", ")));
        }
        messages
    }
}

/// Checks each candidate independently and keeps the ones that exist.
///
/// Candidates are trimmed and empties dropped. Any lookup failure fails the
/// whole check so the caller can ask again.
pub async fn filter_organizations<I, S>(
    lookup: &dyn AnalyticsLookup,
    timeout: Duration,
    candidates: I,
) -> Result<OrganizationFilter, LookupError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut filter = OrganizationFilter::default();
    for candidate in candidates {
        let candidate = candidate.as_ref().trim();
        if candidate.is_empty() || filter.found.contains(candidate) {
            continue;
        }

        if bounded_lookup(timeout, lookup.organization_exists(candidate)).await? {
            filter.found.insert(candidate.to_string());
        } else {
            warn!(organization = candidate, "Organization not found");
            if !filter.missing.iter().any(|m| m == candidate) {
                filter.missing.push(candidate.to_string());
            }
        }
    }
    Ok(filter)
}
