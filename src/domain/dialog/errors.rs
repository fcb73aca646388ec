//! Error types for the dialog engine.
//!
//! Every variant is an engine contract violation: a flow or host asked the
//! engine for something its dialogs never promised. User mistakes are never
//! reported through this type.

use super::{DialogId, ValueKey};

/// Dialog engine errors
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum DialogError {
    #[error("Dialog {0:?} is not registered")]
    UnknownDialog(DialogId),

    #[error("No dialog is active")]
    EmptyStack,

    #[error("Dialog {dialog:?} has no step {index}")]
    StepOutOfRange { dialog: DialogId, index: usize },

    #[error("Dialog {0:?} asked to reprompt before prompting")]
    NoPromptToRepeat(DialogId),

    #[error("Dialog {dialog:?} expected {expected} at step {index}")]
    UnexpectedInput {
        dialog: DialogId,
        index: usize,
        expected: &'static str,
    },

    #[error("Dialog {dialog:?} is missing value {key:?}")]
    MissingValue { dialog: DialogId, key: ValueKey },

    #[error("Turn exceeded {limit} transitions without waiting for input")]
    RunawayTurn { limit: usize },
}
