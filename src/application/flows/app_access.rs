//! Service tree capture ahead of the submission flow.

use async_trait::async_trait;

use super::{expect_child, step_at};
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogResult, DialogValue, StepContext, StepInput, Turn,
    ValueKey,
};

#[derive(Debug, Clone, Copy)]
enum Step {
    Start,
    RecordServiceTree,
    Finish,
}

const STEPS: &[Step] = &[Step::Start, Step::RecordServiceTree, Step::Finish];

/// Takes the request as its argument, records the validated service tree id
/// on it, then hands it to [`DialogId::NewAccessRequest`].
pub struct AppAccessDialog;

#[async_trait]
impl Dialog for AppAccessDialog {
    fn id(&self) -> DialogId {
        DialogId::AppAccess
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
            Step::Start => {
                let mut request = match input {
                    StepInput::Start(Some(DialogValue::Request(request))) => request,
                    _ => return Err(ctx.unexpected(index, "a request argument")),
                };
                let database = request.data_set().database;
                request.reseed_data_set(database);
                ctx.set_value(ValueKey::Request, DialogValue::Request(request));
                Ok(Turn::begin(DialogId::ServiceTree, None))
            }

            Step::RecordServiceTree => match expect_child(ctx, index, input)? {
                DialogResult::Completed(value) => {
                    let id = value
                        .into_service_tree_id()
                        .ok_or_else(|| ctx.unexpected(index, "a service tree id"))?;
                    ctx.request_mut()?.set_service_tree_id(id);
                    let request = ctx
                        .take_value(ValueKey::Request)
                        .ok_or_else(|| ctx.missing(ValueKey::Request))?;
                    Ok(Turn::begin(DialogId::NewAccessRequest, Some(request)))
                }
                DialogResult::Aborted => Ok(Turn::abort()),
            },

            Step::Finish => Ok(Turn::End(expect_child(ctx, index, input)?)),
        }
    }
}
