//! Multi-select table card for restricted scopes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{answer_retry, bounded_lookup, expect_answer, offer_retry, step_at};
use crate::domain::dialog::{
    CardChoice, ChoiceCard, Dialog, DialogError, DialogId, DialogValue, Prompt, StepContext,
    StepInput, Turn, ValueKey,
};
use crate::ports::AnalyticsLookup;

pub(crate) const TABLE_HEADING: &str = "Please select desired tables.";
pub(crate) const TABLE_INPUT_ID: &str = "tableName";
pub(crate) const INVALID_TABLES: &str = "Please select at least one table from the list.";
pub(crate) const LISTING_FAILED: &str = "We could not load the list of tables right now.";

#[derive(Debug, Clone, Copy)]
enum Step {
    LoadTables,
    ShowCard,
    ReadSelection,
}

const STEPS: &[Step] = &[Step::LoadTables, Step::ShowCard, Step::ReadSelection];

/// Takes a [`DialogValue::Visibility`] argument and completes with
/// [`DialogValue::Tables`], using the catalog's spelling of each name.
///
/// A failed or empty listing offers a retry; only a "No" aborts.
pub struct SelectTablesDialog {
    lookup: Arc<dyn AnalyticsLookup>,
    timeout: Duration,
}

impl SelectTablesDialog {
    pub fn new(lookup: Arc<dyn AnalyticsLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }
}

/// Maps each selected name onto the offered one; `None` if any is unknown.
fn resolve_selection(offered: &[String], selected: &[String]) -> Option<Vec<String>> {
    let mut resolved: Vec<String> = Vec::with_capacity(selected.len());
    for name in selected {
        let canonical = offered.iter().find(|t| t.eq_ignore_ascii_case(name.trim()))?;
        if !resolved.contains(canonical) {
            resolved.push(canonical.clone());
        }
    }
    Some(resolved)
}

#[async_trait]
impl Dialog for SelectTablesDialog {
    fn id(&self) -> DialogId {
        DialogId::SelectTables
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
            Step::LoadTables => {
                let visibility = match input {
                    StepInput::Start(Some(DialogValue::Visibility(visibility))) => visibility,
                    _ => return Err(ctx.unexpected(index, "a visibility argument")),
                };

                let tables =
                    match bounded_lookup(self.timeout, self.lookup.list_tables(visibility)).await {
                        Ok(tables) => tables,
                        Err(error) => {
                            warn!(visibility = %visibility, error = %error, "Table listing failed");
                            ctx.send(LISTING_FAILED);
                            return Ok(offer_retry());
                        }
                    };
                if tables.is_empty() {
                    warn!(visibility = %visibility, "No tables offered for scope");
                    ctx.send(format!("No tables are available for scope {}.", visibility));
                    return Ok(offer_retry());
                }

                ctx.set_value(ValueKey::TableOptions, DialogValue::Tables(tables));
                Ok(Turn::Next(StepInput::Skipped))
            }

            Step::ShowCard => {
                match input {
                    StepInput::Skipped => {}
                    StepInput::Answer(answer) => return Ok(answer_retry(ctx, &answer)),
                    _ => return Err(ctx.unexpected(index, "loaded tables or a retry answer")),
                }
                let tables = match ctx.value(ValueKey::TableOptions) {
                    Some(DialogValue::Tables(tables)) => tables,
                    _ => return Err(ctx.missing(ValueKey::TableOptions)),
                };

                let card = ChoiceCard {
                    input_id: TABLE_INPUT_ID.to_string(),
                    heading: TABLE_HEADING.to_string(),
                    multi_select: true,
                    choices: tables
                        .iter()
                        .map(|table| CardChoice::new(table.clone(), table.clone()))
                        .collect(),
                };
                Ok(Turn::Prompt(Prompt::card(card)))
            }

            Step::ReadSelection => {
                let answer = expect_answer(ctx, index, input)?;
                let offered = match ctx.value(ValueKey::TableOptions) {
                    Some(DialogValue::Tables(tables)) => tables.clone(),
                    _ => return Err(ctx.missing(ValueKey::TableOptions)),
                };

                let selected = answer.card_selection(TABLE_INPUT_ID);
                match resolve_selection(&offered, &selected) {
                    Some(tables) if !tables.is_empty() => {
                        Ok(Turn::complete(DialogValue::Tables(tables)))
                    }
                    _ => {
                        ctx.send(INVALID_TABLES);
                        let restart = ctx.argument().cloned();
                        Ok(Turn::replace(DialogId::SelectTables, restart))
                    }
                }
            }
        }
    }
}
