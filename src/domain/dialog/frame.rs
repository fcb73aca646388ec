//! Dialog activations and the per-conversation stack.

use std::collections::HashMap;

use tracing::debug;

use super::{DialogId, DialogValue, Prompt, ValueKey};
use crate::domain::foundation::{ConversationId, MemberId};

/// Who the conversation is with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationInfo {
    pub conversation_id: ConversationId,
    pub member_id: MemberId,
}

impl ConversationInfo {
    pub fn new(conversation_id: ConversationId, member_id: MemberId) -> Self {
        Self {
            conversation_id,
            member_id,
        }
    }
}

/// One activation of a dialog.
#[derive(Debug, Clone)]
pub struct DialogFrame {
    dialog: DialogId,
    index: usize,
    values: HashMap<ValueKey, DialogValue>,
    argument: Option<DialogValue>,
    last_prompt: Option<Prompt>,
}

impl DialogFrame {
    pub fn new(dialog: DialogId, argument: Option<DialogValue>) -> Self {
        Self {
            dialog,
            index: 0,
            values: HashMap::new(),
            argument,
            last_prompt: None,
        }
    }

    pub fn dialog(&self) -> DialogId {
        self.dialog
    }

    /// Index of the step that runs next.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(super) fn advance(&mut self) -> usize {
        let current = self.index;
        self.index += 1;
        current
    }

    pub fn argument(&self) -> Option<&DialogValue> {
        self.argument.as_ref()
    }

    pub fn value(&self, key: ValueKey) -> Option<&DialogValue> {
        self.values.get(&key)
    }

    pub fn value_mut(&mut self, key: ValueKey) -> Option<&mut DialogValue> {
        self.values.get_mut(&key)
    }

    pub fn set_value(&mut self, key: ValueKey, value: DialogValue) {
        self.values.insert(key, value);
    }

    pub fn take_value(&mut self, key: ValueKey) -> Option<DialogValue> {
        self.values.remove(&key)
    }

    pub fn last_prompt(&self) -> Option<&Prompt> {
        self.last_prompt.as_ref()
    }

    pub(super) fn remember_prompt(&mut self, prompt: Prompt) {
        self.last_prompt = Some(prompt);
    }
}

/// The activations of one conversation, innermost last.
#[derive(Debug, Clone)]
pub struct DialogStack {
    conversation: ConversationInfo,
    frames: Vec<DialogFrame>,
}

impl DialogStack {
    pub fn new(conversation: ConversationInfo) -> Self {
        Self {
            conversation,
            frames: Vec::new(),
        }
    }

    pub fn conversation(&self) -> &ConversationInfo {
        &self.conversation
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&DialogFrame> {
        self.frames.last()
    }

    /// Dialog ids from outermost to innermost.
    pub fn dialogs(&self) -> Vec<DialogId> {
        self.frames.iter().map(DialogFrame::dialog).collect()
    }

    pub fn push(&mut self, frame: DialogFrame) {
        debug!(
            conversation_id = %self.conversation.conversation_id,
            dialog = ?frame.dialog(),
            depth = self.frames.len() + 1,
            "Dialog started"
        );
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<DialogFrame> {
        let frame = self.frames.pop()?;
        debug!(
            conversation_id = %self.conversation.conversation_id,
            dialog = ?frame.dialog(),
            depth = self.frames.len(),
            "Dialog ended"
        );
        Some(frame)
    }

    /// The top activation together with the conversation info.
    pub(super) fn split_top_mut(&mut self) -> Option<(&mut DialogFrame, &ConversationInfo)> {
        let conversation = &self.conversation;
        self.frames.last_mut().map(|frame| (frame, conversation))
    }
}
