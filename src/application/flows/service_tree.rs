//! Service tree id capture, validated against the analytics catalog.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{bounded_lookup, expect_answer, step_at};
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogValue, Prompt, StepContext, StepInput, Turn,
};
use crate::domain::foundation::parsing::parse_uuid;
use crate::ports::AnalyticsLookup;

pub(crate) const SERVICE_TREE_QUESTION: &str = "Please provide your ServiceTree Id:";

#[derive(Debug, Clone, Copy)]
enum Step {
    Ask,
    Validate,
}

const STEPS: &[Step] = &[Step::Ask, Step::Validate];

/// Completes with [`DialogValue::ServiceTreeId`] once the id resolves to
/// exactly one service. Any other outcome restarts the dialog.
pub struct ServiceTreeDialog {
    lookup: Arc<dyn AnalyticsLookup>,
    timeout: Duration,
}

impl ServiceTreeDialog {
    pub fn new(lookup: Arc<dyn AnalyticsLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }
}

#[async_trait]
impl Dialog for ServiceTreeDialog {
    fn id(&self) -> DialogId {
        DialogId::ServiceTree
    }

    fn step_count(&self) -> usize {
        STEPS.len()
    }

    async fn run_step(
        &self,
        index: usize,
        ctx: &mut StepContext<'_>,
        input: StepInput,
    ) -> Result<Turn, DialogError> {
        match step_at(STEPS, self.id(), index)? {
            Step::Ask => Ok(Turn::Prompt(Prompt::text(SERVICE_TREE_QUESTION))),

            Step::Validate => {
                let answer = expect_answer(ctx, index, input)?;
                let id = match parse_uuid("ServiceTree Id", answer.text_or_empty()) {
                    Ok(id) => id,
                    Err(_) => {
                        ctx.send("Please enter a valid ServiceTree Id.");
                        return Ok(Turn::replace(DialogId::ServiceTree, None));
                    }
                };

                let matches =
                    bounded_lookup(self.timeout, self.lookup.validate_service_tree_id(id)).await;
                match matches.as_deref() {
                    Ok([single]) => {
                        ctx.send(format!("Service name is {}.", single.service_name));
                        Ok(Turn::complete(DialogValue::ServiceTreeId(id)))
                    }
                    Ok([]) => {
                        warn!(service_tree_id = %id, "Service tree id not found");
                        ctx.send(format!("ServiceTree Id {} could not be found.", id));
                        Ok(Turn::replace(DialogId::ServiceTree, None))
                    }
                    Ok(_) => {
                        warn!(service_tree_id = %id, "Service tree id is ambiguous");
                        ctx.send(format!(
                            "ServiceTree Id {} matches more than one service. Please check the id.",
                            id
                        ));
                        Ok(Turn::replace(DialogId::ServiceTree, None))
                    }
                    Err(error) => {
                        warn!(service_tree_id = %id, error = %error, "Service tree lookup failed");
                        ctx.send("We could not validate the ServiceTree Id right now. Please try again.");
                        Ok(Turn::replace(DialogId::ServiceTree, None))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryAnalyticsLookup;
    use crate::application::flows::testing::{runner, services, stack, texts};
    use crate::application::flows::{FlowServices, FlowSettings};
    use crate::domain::dialog::{DialogResult, TurnStatus, UserInput};
    use crate::ports::LookupError;
    use uuid::Uuid;

    const TREE: &str = "11111111-1111-1111-1111-111111111111";

    async fn answer(lookup: InMemoryAnalyticsLookup, text: &str) -> crate::domain::dialog::TurnOutput {
        let runner = runner(services(lookup));
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::ServiceTree, None).await.unwrap();
        runner
            .continue_turn(&mut stack, UserInput::text(text))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn single_match_completes_with_id() {
        let output = answer(InMemoryAnalyticsLookup::sample(), TREE).await;

        assert_eq!(
            output.status,
            TurnStatus::Complete(DialogResult::Completed(DialogValue::ServiceTreeId(
                Uuid::parse_str(TREE).unwrap()
            )))
        );
        assert_eq!(texts(&output), vec!["Service name is Engineering Insights."]);
    }

    #[tokio::test]
    async fn malformed_id_restarts_capture() {
        let output = answer(InMemoryAnalyticsLookup::sample(), "not-a-guid").await;

        assert_eq!(output.status, TurnStatus::Waiting);
        assert_eq!(
            texts(&output),
            vec!["Please enter a valid ServiceTree Id.", SERVICE_TREE_QUESTION]
        );
    }

    #[tokio::test]
    async fn unknown_id_restarts_capture() {
        let output = answer(InMemoryAnalyticsLookup::new(), TREE).await;

        assert_eq!(output.status, TurnStatus::Waiting);
        assert!(texts(&output)[0].contains("could not be found"));
    }

    #[tokio::test]
    async fn ambiguous_id_restarts_capture() {
        let id = Uuid::parse_str(TREE).unwrap();
        let lookup = InMemoryAnalyticsLookup::new()
            .with_service_tree(id, "First")
            .with_service_tree(id, "Second");

        let output = answer(lookup, TREE).await;

        assert_eq!(output.status, TurnStatus::Waiting);
        assert!(texts(&output)[0].contains("more than one service"));
    }

    #[tokio::test]
    async fn lookup_failure_restarts_capture() {
        let lookup = InMemoryAnalyticsLookup::sample()
            .with_failure(LookupError::Unavailable("kusto down".to_string()));

        let output = answer(lookup, TREE).await;

        assert_eq!(output.status, TurnStatus::Waiting);
        assert_eq!(texts(&output).last().unwrap(), SERVICE_TREE_QUESTION);
    }

    #[tokio::test]
    async fn slow_lookup_times_out_and_restarts() {
        let lookup = InMemoryAnalyticsLookup::sample().with_delay(Duration::from_millis(200));
        let mut services: FlowServices = services(lookup);
        services.settings = FlowSettings {
            lookup_timeout: Duration::from_millis(10),
            ..FlowSettings::default()
        };
        let runner = runner(services);
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::ServiceTree, None).await.unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::text(TREE))
            .await
            .unwrap();

        assert_eq!(output.status, TurnStatus::Waiting);
        assert!(texts(&output)[0].starts_with("We could not validate"));
    }
}
