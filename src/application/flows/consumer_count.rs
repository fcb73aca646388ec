//! Downstream consumer count.

use async_trait::async_trait;

use super::{expect_answer, step_at};
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogValue, Prompt, StepContext, StepInput, Turn,
};
use crate::domain::foundation::parsing::parse_count;

pub(crate) const CONSUMER_COUNT_QUESTION: &str =
    "What is the estimated number of downstream data consumers?";
pub(crate) const INVALID_NUMBER: &str = "Please enter a valid number.";

#[derive(Debug, Clone, Copy)]
enum Step {
    Ask,
    Read,
}

const STEPS: &[Step] = &[Step::Ask, Step::Read];

/// Completes with [`DialogValue::Count`]; restarts on anything that is not a
/// non-negative integer.
pub struct ConsumerCountDialog;

#[async_trait]
impl Dialog for ConsumerCountDialog {
    fn id(&self) -> DialogId {
        DialogId::ConsumerCount
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
            Step::Ask => Ok(Turn::Prompt(Prompt::text(CONSUMER_COUNT_QUESTION))),
            Step::Read => {
                let answer = expect_answer(ctx, index, input)?;
                match parse_count("consumer count", answer.text_or_empty()) {
                    Ok(count) => Ok(Turn::complete(DialogValue::Count(count))),
                    Err(_) => {
                        ctx.send(INVALID_NUMBER);
                        Ok(Turn::replace(DialogId::ConsumerCount, None))
                    }
                }
            }
        }
    }
}
