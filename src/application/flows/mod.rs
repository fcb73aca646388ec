//! Interview flows.
//!
//! The concrete dialogs of the data access interview, wired to the ports they
//! query. [`register_flows`] builds the [`DialogSet`] the runner drives.
//!
//! ## Dialogs
//! - `DataAccess` - Entry: identity type, database, scope
//! - `SelectDatabase` / `SelectScope` - Database card and scope choice
//! - `AppAccess` - Service tree capture, then hand-off to submission
//! - `ServiceTree` - Service tree id capture with catalog validation
//! - `NewAccessRequest` - App details, justification, tables, organizations, submission
//! - `AppDetails` - Tenant and app id capture loop
//! - `ConsumerCount` / `ContactEmail` - Single validated answers
//! - `SelectTables` - Table card for restricted scopes
//! - `Diagnostics` - Backend connectivity check

mod app_access;
mod app_details;
mod consumer_count;
mod contact_email;
mod data_access;
mod diagnostics;
mod new_access_request;
mod organizations;
mod select_database;
mod select_scope;
mod select_tables;
mod service_tree;
mod submission;

pub use app_access::AppAccessDialog;
pub use app_details::AppDetailsDialog;
pub use consumer_count::ConsumerCountDialog;
pub use contact_email::ContactEmailDialog;
pub use data_access::DataAccessDialog;
pub use diagnostics::DiagnosticsDialog;
pub use new_access_request::NewAccessRequestDialog;
pub use organizations::{filter_organizations, OrganizationFilter};
pub use select_database::SelectDatabaseDialog;
pub use select_scope::SelectScopeDialog;
pub use select_tables::SelectTablesDialog;
pub use service_tree::ServiceTreeDialog;
pub use submission::{SubmissionError, Submitter};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::dialog::{
    DialogError, DialogId, DialogResult, DialogSet, Prompt, StepContext, StepInput, Turn, UserInput,
};
use crate::domain::foundation::{ClosedChoice, YesNo};
use crate::ports::{AnalyticsLookup, ApprovalStore, DirectoryService, LookupError, TicketingService};

/// Fixed fields of every filed ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTemplate {
    pub routing_id: String,
    pub severity: u8,
    pub keywords: String,
    pub monitor_id: String,
    pub source_name: String,
    pub author: String,
    pub portal_url: String,
}

/// Settings the flows read at run time.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub lookup_timeout: Duration,
    pub confirm_app_ownership: bool,
    pub access_groups_url: String,
    pub principal_domain: String,
    pub diagnostics_alias: Option<String>,
    pub diagnostics_service_tree_id: Option<Uuid>,
    pub ticket: TicketTemplate,
}

impl FlowSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let ticketing = &config.ticketing;
        Self {
            lookup_timeout: config.lookup.timeout(),
            confirm_app_ownership: config.interview.confirm_app_ownership,
            access_groups_url: config.interview.access_groups_url.clone(),
            principal_domain: config.approvals.principal_domain.clone(),
            diagnostics_alias: config.interview.diagnostics_alias.clone(),
            diagnostics_service_tree_id: config.interview.diagnostics_service_tree(),
            ticket: TicketTemplate {
                routing_id: ticketing.routing_id.clone(),
                severity: ticketing.severity,
                keywords: ticketing.keywords.clone(),
                monitor_id: ticketing.monitor_id.clone(),
                source_name: ticketing.source_name.clone(),
                author: ticketing.author.clone(),
                portal_url: ticketing.portal_url.clone(),
            },
        }
    }
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Backends shared by all interviews.
#[derive(Clone)]
pub struct FlowServices {
    pub directory: Arc<dyn DirectoryService>,
    pub lookup: Arc<dyn AnalyticsLookup>,
    pub ticketing: Arc<dyn TicketingService>,
    pub approvals: Arc<dyn ApprovalStore>,
    pub settings: FlowSettings,
}

/// Builds the dialog registry for the interview.
pub fn register_flows(services: FlowServices) -> DialogSet {
    let services = Arc::new(services);
    DialogSet::new()
        .with(Arc::new(DataAccessDialog::new(services.settings.access_groups_url.clone())))
        .with(Arc::new(SelectDatabaseDialog))
        .with(Arc::new(SelectScopeDialog))
        .with(Arc::new(AppAccessDialog))
        .with(Arc::new(ServiceTreeDialog::new(
            services.lookup.clone(),
            services.settings.lookup_timeout,
        )))
        .with(Arc::new(NewAccessRequestDialog::new(services.clone())))
        .with(Arc::new(AppDetailsDialog))
        .with(Arc::new(ConsumerCountDialog))
        .with(Arc::new(ContactEmailDialog))
        .with(Arc::new(SelectTablesDialog::new(
            services.lookup.clone(),
            services.settings.lookup_timeout,
        )))
        .with(Arc::new(DiagnosticsDialog::new(services)))
}

/// Runs a catalog query under the lookup timeout.
pub(crate) async fn bounded_lookup<T, F>(timeout: Duration, query: F) -> Result<T, LookupError>
where
    F: Future<Output = Result<T, LookupError>>,
{
    tokio::time::timeout(timeout, query)
        .await
        .unwrap_or(Err(LookupError::Timeout {
            timeout_secs: timeout.as_secs(),
        }))
}

pub(crate) const RETRY_QUESTION: &str = "Would you like to try again?";

/// Asks whether a failed lookup should be retried.
pub(crate) fn offer_retry() -> Turn {
    Turn::Prompt(Prompt::choice(RETRY_QUESTION, YesNo::labels()))
}

/// "Yes" restarts the current activation with its original argument, "No" aborts it.
pub(crate) fn answer_retry(ctx: &StepContext<'_>, answer: &UserInput) -> Turn {
    match YesNo::from_label(answer.text_or_empty()) {
        Some(YesNo::Yes) => Turn::replace(ctx.dialog(), ctx.argument().cloned()),
        Some(YesNo::No) => Turn::abort(),
        None => Turn::reprompt_with("Please answer Yes or No."),
    }
}

/// Maps a step index onto the dialog's step enum.
pub(crate) fn step_at<S: Copy>(steps: &[S], dialog: DialogId, index: usize) -> Result<S, DialogError> {
    steps
        .get(index)
        .copied()
        .ok_or(DialogError::StepOutOfRange { dialog, index })
}

/// The user's answer, or a contract error when the step received something else.
pub(crate) fn expect_answer(
    ctx: &StepContext<'_>,
    index: usize,
    input: StepInput,
) -> Result<UserInput, DialogError> {
    input
        .into_answer()
        .ok_or_else(|| ctx.unexpected(index, "an answer"))
}

/// The child's result, or a contract error when the step received something else.
pub(crate) fn expect_child(
    ctx: &StepContext<'_>,
    index: usize,
    input: StepInput,
) -> Result<DialogResult, DialogError> {
    match input {
        StepInput::Child(result) => Ok(result),
        _ => Err(ctx.unexpected(index, "a child result")),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers for driving single dialogs in unit tests.

    use super::*;
    use crate::adapters::{InMemoryAnalyticsLookup, InMemoryApprovalStore, MockTicketingService, StaticDirectory};
    use crate::domain::dialog::{ConversationInfo, DialogRunner, DialogStack, Reply, TurnOutput};
    use crate::domain::foundation::{ConversationId, MemberId};

    pub const MEMBER: &str = "29:member";

    pub fn services(lookup: InMemoryAnalyticsLookup) -> FlowServices {
        FlowServices {
            directory: Arc::new(
                StaticDirectory::new().with_member(MemberId::new(MEMBER).unwrap(), "jdoe@contoso.com"),
            ),
            lookup: Arc::new(lookup),
            ticketing: Arc::new(MockTicketingService::new()),
            approvals: Arc::new(InMemoryApprovalStore::new()),
            settings: FlowSettings::default(),
        }
    }

    pub fn runner(services: FlowServices) -> DialogRunner {
        DialogRunner::new(Arc::new(register_flows(services)))
    }

    pub fn stack() -> DialogStack {
        DialogStack::new(ConversationInfo::new(
            ConversationId::new("conv-test").unwrap(),
            MemberId::new(MEMBER).unwrap(),
        ))
    }

    pub fn texts(output: &TurnOutput) -> Vec<String> {
        output.replies.iter().map(|r| r.text().to_string()).collect()
    }

    pub fn last_prompt(output: &TurnOutput) -> Option<&crate::domain::dialog::Prompt> {
        output.replies.iter().rev().find_map(|reply| match reply {
            Reply::Prompt(prompt) => Some(prompt),
            Reply::Message(_) => None,
        })
    }
}
