//! In-Memory Interview Store Adapter
//!
//! Keeps each conversation's dialog stack in memory. A stack is either idle
//! (waiting for the next answer) or checked out by the turn in progress.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialog::DialogStack;
use crate::domain::foundation::ConversationId;
use crate::ports::{InterviewStore, InterviewStoreError};

#[derive(Debug)]
enum Slot {
    Idle(DialogStack),
    Busy,
}

/// In-memory storage for interview stacks
#[derive(Debug, Clone, Default)]
pub struct InMemoryInterviewStore {
    slots: Arc<RwLock<HashMap<ConversationId, Slot>>>,
}

impl InMemoryInterviewStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with an interview
    pub async fn interview_count(&self) -> usize {
        self.slots.read().await.len()
    }
}

#[async_trait]
impl InterviewStore for InMemoryInterviewStore {
    async fn create(&self, conversation_id: &ConversationId) -> Result<(), InterviewStoreError> {
        let mut slots = self.slots.write().await;
        if slots.contains_key(conversation_id) {
            return Err(InterviewStoreError::AlreadyActive(conversation_id.clone()));
        }
        slots.insert(conversation_id.clone(), Slot::Busy);
        Ok(())
    }

    async fn begin_turn(&self, conversation_id: &ConversationId) -> Result<DialogStack, InterviewStoreError> {
        let mut slots = self.slots.write().await;
        let slot = slots
            .get_mut(conversation_id)
            .ok_or_else(|| InterviewStoreError::NotFound(conversation_id.clone()))?;

        match std::mem::replace(slot, Slot::Busy) {
            Slot::Idle(stack) => Ok(stack),
            Slot::Busy => Err(InterviewStoreError::TurnInProgress(conversation_id.clone())),
        }
    }

    async fn end_turn(
        &self,
        conversation_id: &ConversationId,
        stack: Option<DialogStack>,
    ) -> Result<(), InterviewStoreError> {
        let mut slots = self.slots.write().await;
        if !slots.contains_key(conversation_id) {
            return Err(InterviewStoreError::NotFound(conversation_id.clone()));
        }

        match stack {
            Some(stack) => {
                slots.insert(conversation_id.clone(), Slot::Idle(stack));
            }
            None => {
                slots.remove(conversation_id);
            }
        }
        Ok(())
    }

    async fn discard(&self, conversation_id: &ConversationId) -> Result<(), InterviewStoreError> {
        self.slots
            .write()
            .await
            .remove(conversation_id)
            .map(|_| ())
            .ok_or_else(|| InterviewStoreError::NotFound(conversation_id.clone()))
    }

    async fn is_active(&self, conversation_id: &ConversationId) -> Result<bool, InterviewStoreError> {
        Ok(self.slots.read().await.contains_key(conversation_id))
    }
}
