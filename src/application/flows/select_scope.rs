//! Data scope question for databases with classified data.

use async_trait::async_trait;

use super::{expect_answer, step_at};
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogValue, Prompt, StepContext, StepInput, Turn,
};
use crate::domain::foundation::{ClosedChoice, DataVisibility};

pub(crate) const SCOPE_QUESTION: &str = "What data scope do you want to get access for?";

#[derive(Debug, Clone, Copy)]
enum Step {
    Ask,
    Read,
}

const STEPS: &[Step] = &[Step::Ask, Step::Read];

/// Completes with [`DialogValue::Visibility`].
pub struct SelectScopeDialog;

#[async_trait]
impl Dialog for SelectScopeDialog {
    fn id(&self) -> DialogId {
        DialogId::SelectScope
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
            Step::Ask => Ok(Turn::Prompt(Prompt::choice(
                SCOPE_QUESTION,
                DataVisibility::labels(),
            ))),
            Step::Read => {
                let answer = expect_answer(ctx, index, input)?;
                match DataVisibility::from_label(answer.text_or_empty()) {
                    Some(visibility) => Ok(Turn::complete(DialogValue::Visibility(visibility))),
                    None => Ok(Turn::reprompt_with("Please choose one of the listed scopes.")),
                }
            }
        }
    }
}
