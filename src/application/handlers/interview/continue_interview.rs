//! ContinueInterviewHandler - Deliver one user message to a running interview

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use super::{InterviewTurn, INTERNAL_ERROR_MESSAGE};
use crate::domain::dialog::{DialogError, DialogRunner, UserInput};
use crate::domain::foundation::ConversationId;
use crate::ports::{InterviewStore, InterviewStoreError};

/// What the user sent.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnInput {
    /// An answer to the waiting question.
    Answer(UserInput),
    /// A message the transport cannot hand to a step (attachment, sticker);
    /// the waiting question is asked again.
    Unsupported,
}

/// Command to continue an interview
#[derive(Debug, Clone)]
pub struct ContinueInterviewCommand {
    pub conversation_id: ConversationId,
    pub input: TurnInput,
}

/// Error type for continuing interviews
#[derive(Debug, Error)]
pub enum ContinueInterviewError {
    #[error("Interview store error: {0}")]
    Store(#[from] InterviewStoreError),

    #[error("Dialog error: {0}")]
    Dialog(#[from] DialogError),

    #[error("Interview turn task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ContinueInterviewError {
    /// Text to show the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ContinueInterviewError::Store(InterviewStoreError::TurnInProgress(_)) => {
                "I'm still working on your previous message."
            }
            ContinueInterviewError::Store(InterviewStoreError::NotFound(_)) => {
                "There is no request in progress. Send any message to start one."
            }
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

/// Handler for continuing interviews
pub struct ContinueInterviewHandler {
    store: Arc<dyn InterviewStore>,
    runner: DialogRunner,
}

impl ContinueInterviewHandler {
    pub fn new(store: Arc<dyn InterviewStore>, runner: DialogRunner) -> Self {
        Self { store, runner }
    }

    /// Runs the turn on its own task, so the stack goes back to the store
    /// even when the caller stops waiting.
    pub async fn handle(
        &self,
        cmd: ContinueInterviewCommand,
    ) -> Result<InterviewTurn, ContinueInterviewError> {
        let turn = tokio::spawn(run_turn(self.store.clone(), self.runner.clone(), cmd));
        turn.await?
    }
}

async fn run_turn(
    store: Arc<dyn InterviewStore>,
    runner: DialogRunner,
    cmd: ContinueInterviewCommand,
) -> Result<InterviewTurn, ContinueInterviewError> {
    // 1. Check the stack out; a concurrent turn fails here
    let mut stack = store.begin_turn(&cmd.conversation_id).await?;

    // 2. Run the turn
    let result = match cmd.input {
        TurnInput::Answer(input) => runner.continue_turn(&mut stack, input).await,
        TurnInput::Unsupported => {
            debug!(conversation_id = %cmd.conversation_id, "Repeating question");
            runner.reprompt(&stack)
        }
    };

    let output = match result {
        Ok(output) => output,
        Err(err) => {
            error!(
                conversation_id = %cmd.conversation_id,
                dialogs = ?stack.dialogs(),
                error = %err,
                "Interview turn failed, discarding interview"
            );
            store.discard(&cmd.conversation_id).await?;
            return Err(err.into());
        }
    };

    // 3. Return the stack, or drop it when the interview ended
    let turn = InterviewTurn::from(output);
    if turn.is_finished() {
        info!(
            conversation_id = %cmd.conversation_id,
            result = ?turn.finished,
            "Interview finished"
        );
        store.end_turn(&cmd.conversation_id, None).await?;
    } else {
        store.end_turn(&cmd.conversation_id, Some(stack)).await?;
    }
    Ok(turn)
}
