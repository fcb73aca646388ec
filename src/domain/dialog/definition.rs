//! Dialog definitions and their registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DialogError, StepContext, StepInput, Turn};

/// Identifies a registered dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogId {
    DataAccess,
    SelectDatabase,
    SelectScope,
    AppAccess,
    ServiceTree,
    NewAccessRequest,
    AppDetails,
    ConsumerCount,
    ContactEmail,
    SelectTables,
    Diagnostics,
}

/// An ordered list of steps.
///
/// The runner calls [`Dialog::run_step`] with the index of the step that is
/// due and the input that reached it. Implementations are stateless; all
/// per-activation state lives in the [`StepContext`] frame.
#[async_trait]
pub trait Dialog: Send + Sync {
    fn id(&self) -> DialogId;

    /// Number of steps; indexes `0..step_count()` are valid.
    fn step_count(&self) -> usize;

    async fn run_step(
        &self,
        index: usize,
        ctx: &mut StepContext<'_>,
        input: StepInput,
    ) -> Result<Turn, DialogError>;
}

/// Registry of dialogs by id.
#[derive(Clone, Default)]
pub struct DialogSet {
    dialogs: HashMap<DialogId, Arc<dyn Dialog>>,
}

impl DialogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dialog, replacing any earlier one with the same id.
    pub fn add(&mut self, dialog: Arc<dyn Dialog>) -> &mut Self {
        self.dialogs.insert(dialog.id(), dialog);
        self
    }

    pub fn with(mut self, dialog: Arc<dyn Dialog>) -> Self {
        self.add(dialog);
        self
    }

    pub fn get(&self, id: DialogId) -> Result<Arc<dyn Dialog>, DialogError> {
        self.dialogs
            .get(&id)
            .cloned()
            .ok_or(DialogError::UnknownDialog(id))
    }

    pub fn contains(&self, id: DialogId) -> bool {
        self.dialogs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}

impl std::fmt::Debug for DialogSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogSet")
            .field("dialogs", &self.dialogs.keys().collect::<Vec<_>>())
            .finish()
    }
}
