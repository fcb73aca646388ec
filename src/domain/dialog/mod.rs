//! Dialog Engine Domain Module
//!
//! A stack-based conversation engine. Each [`Dialog`] is an ordered list of
//! steps; a [`DialogStack`] holds the activations of one conversation and the
//! [`DialogRunner`] routes every answer to the step waiting on top of it.
//!
//! # Architecture
//!
//! - **DialogSet**: registry from [`DialogId`] to dialog definition
//! - **DialogFrame**: one activation (step index, private values, argument)
//! - **Turn**: what a step asks the runner to do next (prompt, advance,
//!   begin a child, replace itself, reprompt, end)
//! - **DialogResult**: two-case completion, a value or an aborted branch
//!
//! # Example
//!
//! ```ignore
//! let runner = DialogRunner::new(Arc::new(dialogs));
//! let mut stack = DialogStack::new(conversation);
//!
//! let output = runner.begin(&mut stack, DialogId::DataAccess, None).await?;
//! let output = runner.continue_turn(&mut stack, UserInput::text("AAD App/MSI")).await?;
//! ```

mod definition;
mod errors;
mod frame;
mod prompt;
mod runner;
mod value;

pub use definition::{Dialog, DialogId, DialogSet};
pub use errors::DialogError;
pub use frame::{ConversationInfo, DialogFrame, DialogStack};
pub use prompt::{CardChoice, ChoiceCard, Expectation, Prompt, Reply, UserInput};
pub use runner::{DialogRunner, StepContext, TurnOutput, TurnStatus};
pub use value::{DialogResult, DialogValue, StepInput, Turn, ValueKey};
