//! Contact e-mail for the request.

use async_trait::async_trait;

use super::{expect_answer, step_at};
use crate::domain::dialog::{
    Dialog, DialogError, DialogId, DialogValue, Prompt, StepContext, StepInput, Turn,
};
use crate::domain::foundation::parsing::parse_email;

pub(crate) const CONTACT_EMAIL_QUESTION: &str =
    "Please provide a contact e-mail address for this request.";

#[derive(Debug, Clone, Copy)]
enum Step {
    Ask,
    Read,
}

const STEPS: &[Step] = &[Step::Ask, Step::Read];

/// Completes with [`DialogValue::Email`].
pub struct ContactEmailDialog;

#[async_trait]
impl Dialog for ContactEmailDialog {
    fn id(&self) -> DialogId {
        DialogId::ContactEmail
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
            Step::Ask => Ok(Turn::Prompt(Prompt::text(CONTACT_EMAIL_QUESTION))),
            Step::Read => {
                let answer = expect_answer(ctx, index, input)?;
                match parse_email("contact e-mail", answer.text_or_empty()) {
                    Ok(email) => Ok(Turn::complete(DialogValue::Email(email))),
                    Err(_) => Ok(Turn::reprompt_with("Please enter a valid e-mail address.")),
                }
            }
        }
    }
}
