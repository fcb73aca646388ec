//! Tenant and app id capture, one tenant per activation.

use async_trait::async_trait;
use tracing::warn;

use super::{expect_answer, step_at};
use crate::domain::access_request::ServicePrincipalBinding;
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogValue, Prompt, StepContext, StepInput, Turn, ValueKey,
};
use crate::domain::foundation::parsing::parse_uuid_list;
use crate::domain::foundation::{ClosedChoice, TenantName, YesNo};

pub(crate) const TENANT_QUESTION: &str = "Which tenant does your app reside in?";
pub(crate) const APP_IDS_QUESTION: &str = "Provide your App IDs in a comma-separated list. \
If you have additional App IDs in another tenant, you will be given an option to add them next.";
pub(crate) const INVALID_APP_ID: &str = "Please enter a valid App ID.";
pub(crate) const ANOTHER_TENANT_QUESTION: &str = "Do you have additional App IDs for another tenant?";

#[derive(Debug, Clone, Copy)]
enum Step {
    AskTenant,
    ReadTenant,
    ReadAppIds,
    ReadAnotherTenant,
}

const STEPS: &[Step] = &[
    Step::AskTenant,
    Step::ReadTenant,
    Step::ReadAppIds,
    Step::ReadAnotherTenant,
];

/// Completes with [`DialogValue::Bindings`].
///
/// The argument carries bindings accepted by earlier activations. A rejected
/// batch restarts the dialog with that argument unchanged; another tenant
/// restarts it with the new binding appended.
pub struct AppDetailsDialog;

fn bindings_of(ctx: &StepContext<'_>) -> Result<Vec<ServicePrincipalBinding>, DialogError> {
    match ctx.value(ValueKey::Bindings) {
        Some(DialogValue::Bindings(bindings)) => Ok(bindings.clone()),
        _ => Err(ctx.missing(ValueKey::Bindings)),
    }
}

#[async_trait]
impl Dialog for AppDetailsDialog {
    fn id(&self) -> DialogId {
        DialogId::AppDetails
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
            Step::AskTenant => {
                let accepted = match input {
                    StepInput::Start(Some(DialogValue::Bindings(bindings))) => bindings,
                    StepInput::Start(None) => Vec::new(),
                    _ => return Err(ctx.unexpected(index, "prior bindings")),
                };
                ctx.set_value(ValueKey::Bindings, DialogValue::Bindings(accepted));
                Ok(Turn::Prompt(Prompt::choice(TENANT_QUESTION, TenantName::labels())))
            }

            Step::ReadTenant => {
                let answer = expect_answer(ctx, index, input)?;
                match TenantName::from_label(answer.text_or_empty()) {
                    Some(tenant) => {
                        ctx.set_value(ValueKey::Tenant, DialogValue::Tenant(tenant));
                        Ok(Turn::Prompt(Prompt::text(APP_IDS_QUESTION)))
                    }
                    None => Ok(Turn::reprompt_with("Please choose one of the listed tenants.")),
                }
            }

            Step::ReadAppIds => {
                let answer = expect_answer(ctx, index, input)?;
                let app_ids = match parse_uuid_list("App IDs", answer.text_or_empty()) {
                    Ok(app_ids) => app_ids,
                    Err(error) => {
                        warn!(
                            conversation_id = %ctx.conversation().conversation_id,
                            error = %error,
                            "Rejected app id batch"
                        );
                        ctx.send(INVALID_APP_ID);
                        let restart = ctx.argument().cloned();
                        return Ok(Turn::replace(DialogId::AppDetails, restart));
                    }
                };

                let tenant = match ctx.value(ValueKey::Tenant) {
                    Some(DialogValue::Tenant(tenant)) => *tenant,
                    _ => return Err(ctx.missing(ValueKey::Tenant)),
                };
                let mut bindings = bindings_of(ctx)?;
                bindings.push(ServicePrincipalBinding::new(tenant, app_ids));
                ctx.set_value(ValueKey::Bindings, DialogValue::Bindings(bindings));

                Ok(Turn::Prompt(Prompt::choice(
                    ANOTHER_TENANT_QUESTION,
                    YesNo::labels(),
                )))
            }

            Step::ReadAnotherTenant => {
                let answer = expect_answer(ctx, index, input)?;
                match YesNo::from_label(answer.text_or_empty()) {
                    Some(YesNo::Yes) => {
                        let bindings = bindings_of(ctx)?;
                        Ok(Turn::replace(
                            DialogId::AppDetails,
                            Some(DialogValue::Bindings(bindings)),
                        ))
                    }
                    Some(YesNo::No) => Ok(Turn::complete(DialogValue::Bindings(bindings_of(ctx)?))),
                    None => Ok(Turn::reprompt_with("Please answer Yes or No.")),
                }
            }
        }
    }
}
