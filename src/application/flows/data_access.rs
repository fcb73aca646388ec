//! Entry flow: identity type, target database, and visibility scope.

use async_trait::async_trait;
use tracing::info;

use super::{expect_answer, expect_child, step_at};
use crate::domain::access_request::AccessRequest;
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogResult, Prompt, StepContext, StepInput, Turn, ValueKey,
};
use crate::domain::foundation::{ClosedChoice, IdentityType};

pub(crate) const IDENTITY_QUESTION: &str =
    "You are requesting access to our data. How would you like to access it?";
pub(crate) const PREPARATION_NOTICE: &str =
    "Please ensure you have a valid ServiceTree ID, Tenant Name, and App IDs before you proceed.";
pub(crate) const SERVICE_ACCOUNT_NOTICE: &str = "We do not grant permissions to service accounts. \
Create an AAD App and give your service account access to the AAD App.";
pub(crate) const RESTRICTED_SCOPE_NOTICE: &str = "Before proceeding, ensure you have valid table names \
for X and P access. If requesting X, please prepare organization names as well.";
const SCOPE_FAILED: &str = "We could not process the selected scope.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AskIdentity,
    ProcessIdentity,
    ProcessDatabase,
    ProcessScope,
    Finish,
}

const STEPS: &[Step] = &[
    Step::AskIdentity,
    Step::ProcessIdentity,
    Step::ProcessDatabase,
    Step::ProcessScope,
    Step::Finish,
];

/// Root dialog of the interview.
///
/// Only AAD app identities continue into database selection; every other
/// identity ends the interview with a notice.
pub struct DataAccessDialog {
    access_groups_url: String,
}

impl DataAccessDialog {
    pub fn new(access_groups_url: impl Into<String>) -> Self {
        Self {
            access_groups_url: access_groups_url.into(),
        }
    }
}

#[async_trait]
impl Dialog for DataAccessDialog {
    fn id(&self) -> DialogId {
        DialogId::DataAccess
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
            Step::AskIdentity => Ok(Turn::Prompt(Prompt::choice(
                IDENTITY_QUESTION,
                IdentityType::labels(),
            ))),

            Step::ProcessIdentity => {
                let answer = expect_answer(ctx, index, input)?;
                match IdentityType::from_label(answer.text_or_empty()) {
                    Some(IdentityType::AadApp) => {
                        ctx.send(PREPARATION_NOTICE);
                        Ok(Turn::begin(DialogId::SelectDatabase, None))
                    }
                    Some(IdentityType::ServiceAccount) => {
                        ctx.send(SERVICE_ACCOUNT_NOTICE);
                        Ok(Turn::abort())
                    }
                    Some(identity) => {
                        info!(identity = identity.label(), "Identity routed to access groups");
                        ctx.send(format!(
                            "Apply for the required access group(s) here: {}.",
                            self.access_groups_url
                        ));
                        Ok(Turn::abort())
                    }
                    None => Ok(Turn::reprompt_with("Please choose one of the listed options.")),
                }
            }

            Step::ProcessDatabase => match expect_child(ctx, index, input)? {
                DialogResult::Completed(value) => {
                    let database = value
                        .into_database()
                        .ok_or_else(|| ctx.unexpected(index, "a database"))?;
                    ctx.set_value(ValueKey::Request, AccessRequest::new(database).into());

                    if database.has_scoped_visibility() {
                        Ok(Turn::begin(DialogId::SelectScope, None))
                    } else {
                        Ok(Turn::Next(StepInput::Skipped))
                    }
                }
                DialogResult::Aborted => Ok(Turn::abort()),
            },

            Step::ProcessScope => {
                match input {
                    StepInput::Skipped => {}
                    StepInput::Child(DialogResult::Completed(value)) => {
                        let visibility = value
                            .into_visibility()
                            .ok_or_else(|| ctx.unexpected(index, "a visibility"))?;
                        ctx.request_mut()?.set_data_visibility(visibility);
                        if visibility.requires_table_selection() {
                            ctx.send(RESTRICTED_SCOPE_NOTICE);
                        }
                    }
                    StepInput::Child(DialogResult::Aborted) => {
                        ctx.send(SCOPE_FAILED);
                        return Ok(Turn::abort());
                    }
                    _ => return Err(ctx.unexpected(index, "a scope or skip")),
                }

                let request = ctx
                    .take_value(ValueKey::Request)
                    .ok_or_else(|| ctx.missing(ValueKey::Request))?;
                Ok(Turn::begin(DialogId::AppAccess, Some(request)))
            }

            Step::Finish => Ok(Turn::End(expect_child(ctx, index, input)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryAnalyticsLookup;
    use crate::application::flows::testing::{runner, services, stack, texts};
    use crate::domain::dialog::{TurnStatus, UserInput};
    use serde_json::json;

    #[tokio::test]
    async fn first_question_offers_identity_types() {
        let runner = runner(services(InMemoryAnalyticsLookup::new()));
        let mut stack = stack();

        let output = runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();

        assert_eq!(texts(&output), vec![IDENTITY_QUESTION.to_string()]);
    }

    #[tokio::test]
    async fn service_account_ends_with_notice() {
        let runner = runner(services(InMemoryAnalyticsLookup::new()));
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::text("service account"))
            .await
            .unwrap();

        assert_eq!(output.status, TurnStatus::Complete(DialogResult::Aborted));
        assert_eq!(texts(&output), vec![SERVICE_ACCOUNT_NOTICE.to_string()]);
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn other_identities_get_access_group_link() {
        for label in ["SC-Alt", "@microsoft.com Account", "Other"] {
            let runner = runner(services(InMemoryAnalyticsLookup::new()));
            let mut stack = stack();
            runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();

            let output = runner
                .continue_turn(&mut stack, UserInput::text(label))
                .await
                .unwrap();

            assert_eq!(output.status, TurnStatus::Complete(DialogResult::Aborted));
            assert!(texts(&output)[0].starts_with("Apply for the required access group(s) here: https://"));
        }
    }

    #[tokio::test]
    async fn unknown_identity_reprompts() {
        let runner = runner(services(InMemoryAnalyticsLookup::new()));
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::text("robot"))
            .await
            .unwrap();

        assert_eq!(output.status, TurnStatus::Waiting);
        assert_eq!(texts(&output).last().unwrap(), IDENTITY_QUESTION);
        assert_eq!(stack.dialogs(), vec![DialogId::DataAccess]);
    }

    #[tokio::test]
    async fn unscoped_database_skips_scope_question() {
        let runner = runner(services(InMemoryAnalyticsLookup::new()));
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();
        runner
            .continue_turn(&mut stack, UserInput::text("AAD App/MSI"))
            .await
            .unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::card(json!({ "ignored": "x" })))
            .await
            .unwrap();
        assert!(texts(&output).contains(&"Please select a valid option.".to_string()));

        let output = runner
            .continue_turn(&mut stack, UserInput::text("GitHub"))
            .await
            .unwrap();

        assert_eq!(
            stack.dialogs(),
            vec![DialogId::DataAccess, DialogId::AppAccess, DialogId::ServiceTree]
        );
        assert_eq!(texts(&output).last().unwrap(), "Please provide your ServiceTree Id:");
    }

    #[tokio::test]
    async fn azure_devops_asks_scope_and_sends_notice_for_restricted() {
        let runner = runner(services(InMemoryAnalyticsLookup::new()));
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();
        runner
            .continue_turn(&mut stack, UserInput::text("AAD App/MSI"))
            .await
            .unwrap();

        runner
            .continue_turn(&mut stack, UserInput::text("AzureDevOps"))
            .await
            .unwrap();
        assert_eq!(
            stack.dialogs(),
            vec![DialogId::DataAccess, DialogId::SelectScope]
        );

        let output = runner
            .continue_turn(&mut stack, UserInput::text("p"))
            .await
            .unwrap();

        assert!(texts(&output).contains(&RESTRICTED_SCOPE_NOTICE.to_string()));
        let app_access = stack.dialogs();
        assert_eq!(app_access[1], DialogId::AppAccess);
    }
}
