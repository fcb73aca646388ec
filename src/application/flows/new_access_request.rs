//! Request details and submission.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::organizations::filter_organizations;
use super::submission::Submitter;
use super::{answer_retry, expect_answer, expect_child, offer_retry, step_at, FlowServices};
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogResult, DialogValue, Prompt, StepContext, StepInput, Turn,
    ValueKey,
};
use crate::domain::foundation::parsing::{alias_from_principal, split_comma_list};
use crate::domain::foundation::{ClosedChoice, MemberId, YesNo};
use crate::ports::DirectoryError;

pub(crate) const OWNERSHIP_QUESTION: &str =
    "Are you one of the owners of the App(s) or managed service identities (MSI)?";
pub(crate) const OWNERSHIP_NOTICE: &str = "You need to be an owner of an AAD app to request access.";
pub(crate) const JUSTIFICATION_QUESTION: &str = "Please provide a business justification for this \
request. Describe its purpose, scope and expected benefits, the data processing methods, how the \
results are stored and secured, and how the work contributes to the business.";
pub(crate) const ORGANIZATIONS_QUESTION: &str =
    "Please provide the organizations you would like access to as a comma separated list.";
pub(crate) const REQUESTER_UNAVAILABLE: &str = "We could not look up your account right now.";
pub(crate) const REQUESTER_UNKNOWN: &str =
    "We could not find your account in the directory. Please contact support.";
pub(crate) const SUBMISSION_FAILED: &str =
    "Access request failed - we appreciate your patience while we work to resolve this error.";

/// Follow-up questions asked for restricted scopes, as `(label, question)`.
pub(crate) const FOLLOW_UPS: [(&str, &str); 3] = [
    (
        "Business Objective",
        "What is the business objective? Describe the problem you are solving, its scope and \
impact, and the data required.",
    ),
    ("Data Handling", "How will the data accessed be processed and used?"),
    (
        "Data Results",
        "What do the results of this data processing look like and how will the resulting data \
sets/reports be handled and stored?",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    ResolveRequester,
    AskOwnership,
    ConfirmOwnership,
    RecordBindings,
    ReadJustification,
    RecordConsumerCount,
    RecordContactEmail,
    RecordTables,
    ReadFollowUp(usize),
    ReadOrganizations,
}

const STEPS: &[Step] = &[
    Step::ResolveRequester,
    Step::AskOwnership,
    Step::ConfirmOwnership,
    Step::RecordBindings,
    Step::ReadJustification,
    Step::RecordConsumerCount,
    Step::RecordContactEmail,
    Step::RecordTables,
    Step::ReadFollowUp(0),
    Step::ReadFollowUp(1),
    Step::ReadFollowUp(2),
    Step::ReadOrganizations,
];

/// Collects the remaining request fields and files the request.
///
/// Takes the request as its argument and completes with
/// [`DialogValue::TicketId`]. Table selection and the follow-up questions
/// only run for scopes that require table selection; the organization
/// question only for cross-organization scope.
pub struct NewAccessRequestDialog {
    services: Arc<FlowServices>,
    submitter: Submitter,
}

impl NewAccessRequestDialog {
    pub fn new(services: Arc<FlowServices>) -> Self {
        let submitter = Submitter::from_services(&services);
        Self {
            services,
            submitter,
        }
    }

    /// The requester's alias from the directory, bounded by the lookup timeout.
    async fn resolve_requester(&self, member_id: &MemberId) -> Result<String, DirectoryError> {
        let timeout = self.services.settings.lookup_timeout;
        let principal = tokio::time::timeout(
            timeout,
            self.services.directory.user_principal_name(member_id),
        )
        .await
        .unwrap_or(Err(DirectoryError::Timeout {
            timeout_secs: timeout.as_secs(),
        }))?;
        Ok(alias_from_principal(&principal))
    }

    fn ask_follow_up_or_organizations(&self, ctx: &StepContext<'_>, next: usize) -> Result<Turn, DialogError> {
        let visibility = ctx.request()?.data_visibility();
        if !visibility.requires_table_selection() {
            return Ok(Turn::Next(StepInput::Skipped));
        }
        match FOLLOW_UPS.get(next) {
            Some((_, question)) => Ok(Turn::Prompt(Prompt::text(*question))),
            None if visibility.requires_organizations() => {
                Ok(Turn::Prompt(Prompt::text(ORGANIZATIONS_QUESTION)))
            }
            None => Ok(Turn::Next(StepInput::Skipped)),
        }
    }

    async fn submit(&self, ctx: &mut StepContext<'_>) -> Result<Turn, DialogError> {
        let request = ctx.request()?;
        match self.submitter.submit(request).await {
            Ok(ticket_id) => {
                info!(
                    conversation_id = %ctx.conversation().conversation_id,
                    ticket_id = %ticket_id,
                    "Access request submitted"
                );
                let confirmation = self.submitter.confirmation(ticket_id);
                ctx.send(confirmation);
                Ok(Turn::complete(DialogValue::TicketId(ticket_id)))
            }
            Err(err) => {
                error!(
                    conversation_id = %ctx.conversation().conversation_id,
                    error = %err,
                    "Access request submission failed"
                );
                ctx.send(SUBMISSION_FAILED);
                Ok(Turn::abort())
            }
        }
    }
}

#[async_trait]
impl Dialog for NewAccessRequestDialog {
    fn id(&self) -> DialogId {
        DialogId::NewAccessRequest
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
            Step::ResolveRequester => {
                let request = match input {
                    StepInput::Start(Some(request @ DialogValue::Request(_))) => request,
                    _ => return Err(ctx.unexpected(index, "a request argument")),
                };
                ctx.set_value(ValueKey::Request, request);

                let member_id = ctx.conversation().member_id.clone();
                match self.resolve_requester(&member_id).await {
                    Ok(alias) => {
                        ctx.request_mut()?.set_requester(alias);
                        Ok(Turn::Next(StepInput::Skipped))
                    }
                    Err(error) if error.is_transient() => {
                        warn!(member_id = %member_id, error = %error, "Directory lookup failed");
                        ctx.send(REQUESTER_UNAVAILABLE);
                        Ok(offer_retry())
                    }
                    Err(error) => {
                        warn!(member_id = %member_id, error = %error, "Requester not in directory");
                        ctx.send(REQUESTER_UNKNOWN);
                        Ok(Turn::abort())
                    }
                }
            }

            Step::AskOwnership => {
                match input {
                    StepInput::Skipped => {}
                    StepInput::Answer(answer) => return Ok(answer_retry(ctx, &answer)),
                    _ => return Err(ctx.unexpected(index, "a resolved requester or a retry answer")),
                }
                if self.services.settings.confirm_app_ownership {
                    Ok(Turn::Prompt(Prompt::choice(OWNERSHIP_QUESTION, YesNo::labels())))
                } else {
                    Ok(Turn::Next(StepInput::Skipped))
                }
            }

            Step::ConfirmOwnership => {
                match input {
                    StepInput::Skipped => {}
                    StepInput::Answer(answer) => match YesNo::from_label(answer.text_or_empty()) {
                        Some(YesNo::Yes) => {}
                        Some(YesNo::No) => {
                            ctx.send(OWNERSHIP_NOTICE);
                            return Ok(Turn::abort());
                        }
                        None => return Ok(Turn::reprompt_with("Please answer Yes or No.")),
                    },
                    _ => return Err(ctx.unexpected(index, "an ownership answer or skip")),
                }
                Ok(Turn::begin(DialogId::AppDetails, None))
            }

            Step::RecordBindings => match expect_child(ctx, index, input)? {
                DialogResult::Completed(value) => {
                    let bindings = value
                        .into_bindings()
                        .ok_or_else(|| ctx.unexpected(index, "bindings"))?;
                    ctx.request_mut()?.replace_service_principals(bindings);
                    Ok(Turn::Prompt(Prompt::text(JUSTIFICATION_QUESTION)))
                }
                DialogResult::Aborted => Ok(Turn::abort()),
            },

            Step::ReadJustification => {
                let answer = expect_answer(ctx, index, input)?;
                let text = answer.text_or_empty().trim();
                if text.is_empty() {
                    return Ok(Turn::reprompt_with("Please provide a business justification."));
                }
                ctx.request_mut()?.justification_mut().set_primary(text);
                Ok(Turn::begin(DialogId::ConsumerCount, None))
            }

            Step::RecordConsumerCount => match expect_child(ctx, index, input)? {
                DialogResult::Completed(value) => {
                    let count = value
                        .into_count()
                        .ok_or_else(|| ctx.unexpected(index, "a count"))?;
                    ctx.request_mut()?.set_downstream_data_consumers(count);
                    Ok(Turn::begin(DialogId::ContactEmail, None))
                }
                DialogResult::Aborted => Ok(Turn::abort()),
            },

            Step::RecordContactEmail => match expect_child(ctx, index, input)? {
                DialogResult::Completed(value) => {
                    let email = value
                        .into_email()
                        .ok_or_else(|| ctx.unexpected(index, "an e-mail"))?;
                    let request = ctx.request_mut()?;
                    request.set_contact_email(email);

                    let visibility = request.data_visibility();
                    if visibility.requires_table_selection() {
                        Ok(Turn::begin(
                            DialogId::SelectTables,
                            Some(DialogValue::Visibility(visibility)),
                        ))
                    } else {
                        Ok(Turn::Next(StepInput::Skipped))
                    }
                }
                DialogResult::Aborted => Ok(Turn::abort()),
            },

            Step::RecordTables => {
                match input {
                    StepInput::Skipped => {}
                    StepInput::Child(DialogResult::Completed(value)) => {
                        let tables = value
                            .into_tables()
                            .ok_or_else(|| ctx.unexpected(index, "tables"))?;
                        ctx.request_mut()?.data_set_mut().tables = tables;
                    }
                    StepInput::Child(DialogResult::Aborted) => return Ok(Turn::abort()),
                    _ => return Err(ctx.unexpected(index, "tables or skip")),
                }
                self.ask_follow_up_or_organizations(ctx, 0)
            }

            Step::ReadFollowUp(position) => {
                match input {
                    StepInput::Skipped => return Ok(Turn::Next(StepInput::Skipped)),
                    StepInput::Answer(answer) => {
                        let text = answer.text_or_empty().trim().to_string();
                        if text.is_empty() {
                            return Ok(Turn::reprompt_with("Please provide an answer."));
                        }
                        let (label, _) = FOLLOW_UPS
                            .get(position)
                            .ok_or(DialogError::StepOutOfRange {
                                dialog: self.id(),
                                index,
                            })?;
                        ctx.request_mut()?.justification_mut().push_labelled(*label, text);
                    }
                    _ => return Err(ctx.unexpected(index, "a follow-up answer or skip")),
                }
                self.ask_follow_up_or_organizations(ctx, position + 1)
            }

            Step::ReadOrganizations => {
                let answer = match input {
                    StepInput::Skipped => return self.submit(ctx).await,
                    StepInput::Answer(answer) => answer,
                    _ => return Err(ctx.unexpected(index, "organizations or skip")),
                };

                let candidates = split_comma_list(answer.text_or_empty());
                if candidates.is_empty() {
                    return Ok(Turn::reprompt_with("Please provide at least one organization."));
                }

                let filter = match filter_organizations(
                    self.services.lookup.as_ref(),
                    self.services.settings.lookup_timeout,
                    candidates,
                )
                .await
                {
                    Ok(filter) => filter,
                    Err(err) => {
                        warn!(error = %err, "Organization lookup failed");
                        return Ok(Turn::reprompt_with(
                            "We could not check the organizations right now. Please try again.",
                        ));
                    }
                };

                for message in filter.report() {
                    ctx.send(message);
                }
                if filter.found.is_empty() {
                    return Ok(Turn::reprompt_with("None of the organizations could be found."));
                }

                ctx.request_mut()?.data_set_mut().organizations = filter.found;
                self.submit(ctx).await
            }
        }
    }
}
