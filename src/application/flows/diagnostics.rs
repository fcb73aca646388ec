//! Backend connectivity check.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{bounded_lookup, step_at, FlowServices};
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogValue, StepContext, StepInput, Turn,
};

#[derive(Debug, Clone, Copy)]
enum Step {
    Run,
}

const STEPS: &[Step] = &[Step::Run];

/// Runs the configured catalog checks and reports each result.
///
/// Completes with a [`DialogValue::Text`] summary line per check.
pub struct DiagnosticsDialog {
    services: Arc<FlowServices>,
}

impl DiagnosticsDialog {
    pub fn new(services: Arc<FlowServices>) -> Self {
        Self { services }
    }

    async fn check_management_chain(&self, alias: &str) -> String {
        let settings = &self.services.settings;
        match bounded_lookup(settings.lookup_timeout, self.services.lookup.management_chain(alias)).await {
            Ok(chain) if chain.is_empty() => format!("No management chain found for {}.", alias),
            Ok(chain) => format!("Management chain for {}: {}", alias, chain.join(", ")),
            Err(error) => {
                warn!(alias, error = %error, "Management chain check failed");
                format!("Management chain lookup failed: {}", error)
            }
        }
    }

    async fn check_service_tree(&self, id: uuid::Uuid) -> String {
        let settings = &self.services.settings;
        match bounded_lookup(
            settings.lookup_timeout,
            self.services.lookup.validate_service_tree_id(id),
        )
        .await
        {
            Ok(matches) => match matches.as_slice() {
                [single] => format!("Service tree {} resolves to {}.", id, single.service_name),
                [] => format!("Service tree {} was not found.", id),
                many => format!("Service tree {} matches {} services.", id, many.len()),
            },
            Err(error) => {
                warn!(service_tree_id = %id, error = %error, "Service tree check failed");
                format!("Service tree lookup failed: {}", error)
            }
        }
    }
}

#[async_trait]
impl Dialog for DiagnosticsDialog {
    fn id(&self) -> DialogId {
        DialogId::Diagnostics
    }

    fn step_count(&self) -> usize {
        STEPS.len()
    }

    async fn run_step(
        &self,
        index: usize,
        ctx: &mut StepContext<'_>,
        _input: StepInput,
    ) -> Result<Turn, DialogError> {
        match step_at(STEPS, self.id(), index)? {
            Step::Run => {
                let settings = &self.services.settings;
                let mut report = Vec::new();
                if let Some(alias) = &settings.diagnostics_alias {
                    report.push(self.check_management_chain(alias).await);
                }
                if let Some(id) = settings.diagnostics_service_tree_id {
                    report.push(self.check_service_tree(id).await);
                }
                if report.is_empty() {
                    report.push("Diagnostics are not configured.".to_string());
                }

                info!(
                    conversation_id = %ctx.conversation().conversation_id,
                    checks = report.len(),
                    "Diagnostics finished"
                );
                for line in &report {
                    ctx.send(line.clone());
                }
                Ok(Turn::complete(DialogValue::Text(report.join("\n"))))
            }
        }
    }
}
