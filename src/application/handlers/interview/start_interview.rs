//! StartInterviewHandler - Begin an interview for a conversation

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use super::{InterviewTurn, INTERNAL_ERROR_MESSAGE};
use crate::domain::dialog::{ConversationInfo, DialogError, DialogId, DialogRunner, DialogStack};
use crate::domain::foundation::{ConversationId, MemberId};
use crate::ports::{InterviewStore, InterviewStoreError};

/// Command to start an interview
#[derive(Debug, Clone)]
pub struct StartInterviewCommand {
    pub conversation_id: ConversationId,
    pub member_id: MemberId,
    pub dialog: DialogId,
}

/// Error type for starting interviews
#[derive(Debug, Error)]
pub enum StartInterviewError {
    #[error("Interview store error: {0}")]
    Store(#[from] InterviewStoreError),

    #[error("Dialog error: {0}")]
    Dialog(#[from] DialogError),

    #[error("Interview start task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StartInterviewError {
    /// Text to show the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            StartInterviewError::Store(InterviewStoreError::AlreadyActive(_)) => {
                "You already have a request in progress. Please answer the last question."
            }
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

/// Handler for starting interviews
pub struct StartInterviewHandler {
    store: Arc<dyn InterviewStore>,
    runner: DialogRunner,
}

impl StartInterviewHandler {
    pub fn new(store: Arc<dyn InterviewStore>, runner: DialogRunner) -> Self {
        Self { store, runner }
    }

    /// Runs on its own task, so the reserved conversation is released even
    /// when the caller stops waiting.
    pub async fn handle(&self, cmd: StartInterviewCommand) -> Result<InterviewTurn, StartInterviewError> {
        let start = tokio::spawn(start_interview(self.store.clone(), self.runner.clone(), cmd));
        start.await?
    }
}

async fn start_interview(
    store: Arc<dyn InterviewStore>,
    runner: DialogRunner,
    cmd: StartInterviewCommand,
) -> Result<InterviewTurn, StartInterviewError> {
    // 1. Reserve the conversation
    store.create(&cmd.conversation_id).await?;

    // 2. Run the root dialog up to its first question
    let mut stack = DialogStack::new(ConversationInfo::new(
        cmd.conversation_id.clone(),
        cmd.member_id,
    ));
    let output = match runner.begin(&mut stack, cmd.dialog, None).await {
        Ok(output) => output,
        Err(err) => {
            error!(
                conversation_id = %cmd.conversation_id,
                dialog = ?cmd.dialog,
                error = %err,
                "Interview failed to start"
            );
            store.discard(&cmd.conversation_id).await?;
            return Err(err.into());
        }
    };

    // 3. Hand the stack back, or drop it if the interview already ended
    let turn = InterviewTurn::from(output);
    let remaining = if turn.is_finished() { None } else { Some(stack) };
    store.end_turn(&cmd.conversation_id, remaining).await?;

    info!(
        conversation_id = %cmd.conversation_id,
        dialog = ?cmd.dialog,
        finished = turn.is_finished(),
        "Interview started"
    );
    Ok(turn)
}
