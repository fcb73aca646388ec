//! Interview Command Handlers
//!
//! Drive one conversation's dialog stack through the interview store.
//!
//! ## Commands
//! - `StartInterview` - Reserve the conversation and begin the root dialog
//! - `ContinueInterview` - Deliver one answer (or a repeat request) to the waiting step

mod continue_interview;
mod start_interview;

pub use continue_interview::{
    ContinueInterviewCommand, ContinueInterviewError, ContinueInterviewHandler, TurnInput,
};
pub use start_interview::{StartInterviewCommand, StartInterviewError, StartInterviewHandler};

use crate::domain::dialog::{DialogResult, Reply, TurnOutput, TurnStatus};

/// Apology sent when the interview hit an internal error and was dropped.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "Sorry, something went wrong on our side. Please start a new request.";

/// What one turn of an interview produced.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewTurn {
    /// Replies to send, in order.
    pub replies: Vec<Reply>,
    /// Set when the interview ended during this turn.
    pub finished: Option<DialogResult>,
}

impl InterviewTurn {
    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }
}

impl From<TurnOutput> for InterviewTurn {
    fn from(output: TurnOutput) -> Self {
        let finished = match output.status {
            TurnStatus::Waiting => None,
            TurnStatus::Complete(result) => Some(result),
        };
        Self {
            replies: output.replies,
            finished,
        }
    }
}
