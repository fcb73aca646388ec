//! Interview Store Port - Holds one dialog stack per conversation.
//!
//! A stack is checked out for the duration of a turn. While it is checked
//! out, a second turn for the same conversation is rejected instead of
//! interleaving with the first.

use async_trait::async_trait;

use crate::domain::dialog::DialogStack;
use crate::domain::foundation::ConversationId;

/// Errors from the interview store
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum InterviewStoreError {
    #[error("No interview for conversation {0}")]
    NotFound(ConversationId),

    #[error("A turn is already in progress for conversation {0}")]
    TurnInProgress(ConversationId),

    #[error("An interview is already active for conversation {0}")]
    AlreadyActive(ConversationId),
}

/// Port for per-conversation dialog stack storage.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Reserves the conversation for a new interview, checked out to the caller.
    ///
    /// Fails with `AlreadyActive` when an interview exists.
    async fn create(&self, conversation_id: &ConversationId) -> Result<(), InterviewStoreError>;

    /// Checks the stack out for one turn.
    async fn begin_turn(&self, conversation_id: &ConversationId) -> Result<DialogStack, InterviewStoreError>;

    /// Returns the stack after a turn. `None` ends the interview.
    async fn end_turn(
        &self,
        conversation_id: &ConversationId,
        stack: Option<DialogStack>,
    ) -> Result<(), InterviewStoreError>;

    /// Drops the interview regardless of its state.
    async fn discard(&self, conversation_id: &ConversationId) -> Result<(), InterviewStoreError>;

    /// Returns true when an interview exists for the conversation.
    async fn is_active(&self, conversation_id: &ConversationId) -> Result<bool, InterviewStoreError>;
}
