//! Single-select database card.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{expect_answer, step_at};
use crate::domain::dialog::{
    CardChoice, ChoiceCard, Dialog, DialogError, DialogId, DialogValue, Prompt, StepContext,
    StepInput, Turn, ValueKey,
};
use crate::domain::foundation::{ClosedChoice, TargetDatabase};

pub(crate) const DATABASE_HEADING: &str = "Which databases would you like access to? Select ONE";
pub(crate) const INVALID_OPTION: &str = "Please select a valid option.";

#[derive(Debug, Clone, Copy)]
enum Step {
    ShowCard,
    ReadSelection,
}

const STEPS: &[Step] = &[Step::ShowCard, Step::ReadSelection];

/// Completes with [`DialogValue::Database`].
///
/// Each activation renders its card under a fresh input id so a stale card
/// submitted from earlier in the chat is never read as the current answer.
pub struct SelectDatabaseDialog;

fn database_card(input_id: String) -> ChoiceCard {
    ChoiceCard {
        input_id,
        heading: DATABASE_HEADING.to_string(),
        multi_select: false,
        choices: TargetDatabase::ALL
            .iter()
            .map(|db| CardChoice::new(db.title(), db.label()))
            .collect(),
    }
}

fn match_database(selected: &str) -> Option<TargetDatabase> {
    let selected = selected.trim();
    TargetDatabase::from_label(selected).or_else(|| {
        TargetDatabase::ALL
            .iter()
            .copied()
            .find(|db| db.title().eq_ignore_ascii_case(selected))
    })
}

#[async_trait]
impl Dialog for SelectDatabaseDialog {
    fn id(&self) -> DialogId {
        DialogId::SelectDatabase
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
            Step::ShowCard => {
                let input_id = Uuid::new_v4().to_string();
                ctx.set_value(ValueKey::CardInputId, DialogValue::Text(input_id.clone()));
                Ok(Turn::Prompt(Prompt::card(database_card(input_id))))
            }

            Step::ReadSelection => {
                let answer = expect_answer(ctx, index, input)?;
                let input_id = match ctx.value(ValueKey::CardInputId) {
                    Some(DialogValue::Text(id)) => id.clone(),
                    _ => return Err(ctx.missing(ValueKey::CardInputId)),
                };

                let selection = answer.card_selection(&input_id);
                let database = match selection.as_slice() {
                    [single] => match_database(single),
                    _ => None,
                };

                match database {
                    Some(database) => {
                        debug!(database = %database, "Database selected");
                        ctx.send(format!("You selected {}.", database.title()));
                        Ok(Turn::complete(DialogValue::Database(database)))
                    }
                    None => {
                        ctx.send(INVALID_OPTION);
                        Ok(Turn::replace(DialogId::SelectDatabase, None))
                    }
                }
            }
        }
    }
}
