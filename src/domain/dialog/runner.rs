//! The dialog runner: routes input to the waiting step and drives the stack
//! until a step waits for the user or the root dialog ends.

use std::sync::Arc;

use super::{
    ConversationInfo, DialogError, DialogFrame, DialogId, DialogResult, DialogSet, DialogStack,
    DialogValue, Reply, StepInput, Turn, UserInput, ValueKey,
};
use crate::domain::access_request::AccessRequest;

/// Transitions allowed within one turn before the runner gives up.
pub const DEFAULT_MAX_TRANSITIONS: usize = 256;

/// Where the conversation stands after a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnStatus {
    /// A step is waiting for the user's next answer.
    Waiting,
    /// The root dialog ended; the stack is empty.
    Complete(DialogResult),
}

/// Everything a turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    pub status: TurnStatus,
    pub replies: Vec<Reply>,
}

impl TurnOutput {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, TurnStatus::Complete(_))
    }
}

/// A step's view of its activation.
pub struct StepContext<'a> {
    frame: &'a mut DialogFrame,
    conversation: &'a ConversationInfo,
    replies: &'a mut Vec<Reply>,
}

impl<'a> StepContext<'a> {
    pub fn dialog(&self) -> DialogId {
        self.frame.dialog()
    }

    pub fn conversation(&self) -> &ConversationInfo {
        self.conversation
    }

    /// Queues a plain message for the user.
    pub fn send(&mut self, text: impl Into<String>) {
        self.replies.push(Reply::Message(text.into()));
    }

    pub fn argument(&self) -> Option<&DialogValue> {
        self.frame.argument()
    }

    pub fn value(&self, key: ValueKey) -> Option<&DialogValue> {
        self.frame.value(key)
    }

    pub fn set_value(&mut self, key: ValueKey, value: DialogValue) {
        self.frame.set_value(key, value);
    }

    pub fn take_value(&mut self, key: ValueKey) -> Option<DialogValue> {
        self.frame.take_value(key)
    }

    /// The request held under [`ValueKey::Request`].
    pub fn request(&self) -> Result<&AccessRequest, DialogError> {
        match self.frame.value(ValueKey::Request) {
            Some(DialogValue::Request(request)) => Ok(request),
            _ => Err(self.missing(ValueKey::Request)),
        }
    }

    /// Mutable access to the request held under [`ValueKey::Request`].
    pub fn request_mut(&mut self) -> Result<&mut AccessRequest, DialogError> {
        let dialog = self.frame.dialog();
        match self.frame.value_mut(ValueKey::Request) {
            Some(DialogValue::Request(request)) => Ok(request.as_mut()),
            _ => Err(DialogError::MissingValue {
                dialog,
                key: ValueKey::Request,
            }),
        }
    }

    pub fn missing(&self, key: ValueKey) -> DialogError {
        DialogError::MissingValue {
            dialog: self.frame.dialog(),
            key,
        }
    }

    pub fn unexpected(&self, index: usize, expected: &'static str) -> DialogError {
        DialogError::UnexpectedInput {
            dialog: self.frame.dialog(),
            index,
            expected,
        }
    }
}

/// Drives dialog stacks against a shared [`DialogSet`].
#[derive(Debug, Clone)]
pub struct DialogRunner {
    dialogs: Arc<DialogSet>,
    max_transitions: usize,
}

impl DialogRunner {
    pub fn new(dialogs: Arc<DialogSet>) -> Self {
        Self {
            dialogs,
            max_transitions: DEFAULT_MAX_TRANSITIONS,
        }
    }

    pub fn with_max_transitions(mut self, max_transitions: usize) -> Self {
        self.max_transitions = max_transitions;
        self
    }

    /// Pushes `dialog` and runs its first step.
    pub async fn begin(
        &self,
        stack: &mut DialogStack,
        dialog: DialogId,
        argument: Option<DialogValue>,
    ) -> Result<TurnOutput, DialogError> {
        self.dialogs.get(dialog)?;
        stack.push(DialogFrame::new(dialog, argument.clone()));

        let mut replies = Vec::new();
        let status = self
            .drive(stack, StepInput::Start(argument), &mut replies)
            .await?;
        Ok(TurnOutput { status, replies })
    }

    /// Hands the user's answer to the step waiting on top of the stack.
    pub async fn continue_turn(
        &self,
        stack: &mut DialogStack,
        input: UserInput,
    ) -> Result<TurnOutput, DialogError> {
        if stack.is_empty() {
            return Err(DialogError::EmptyStack);
        }

        let mut replies = Vec::new();
        let status = self
            .drive(stack, StepInput::Answer(input), &mut replies)
            .await?;
        Ok(TurnOutput { status, replies })
    }

    /// Re-sends the last prompt of the top activation.
    pub fn reprompt(&self, stack: &DialogStack) -> Result<TurnOutput, DialogError> {
        let frame = stack.top().ok_or(DialogError::EmptyStack)?;
        let prompt = frame
            .last_prompt()
            .cloned()
            .ok_or(DialogError::NoPromptToRepeat(frame.dialog()))?;

        Ok(TurnOutput {
            status: TurnStatus::Waiting,
            replies: vec![Reply::Prompt(prompt)],
        })
    }

    async fn drive(
        &self,
        stack: &mut DialogStack,
        mut input: StepInput,
        replies: &mut Vec<Reply>,
    ) -> Result<TurnStatus, DialogError> {
        for _ in 0..self.max_transitions {
            let (frame, conversation) = stack.split_top_mut().ok_or(DialogError::EmptyStack)?;
            let dialog = self.dialogs.get(frame.dialog())?;
            let index = frame.index();
            if index >= dialog.step_count() {
                return Err(DialogError::StepOutOfRange {
                    dialog: frame.dialog(),
                    index,
                });
            }

            let turn = {
                let mut ctx = StepContext {
                    frame,
                    conversation,
                    replies: &mut *replies,
                };
                dialog.run_step(index, &mut ctx, input).await?
            };

            input = match turn {
                Turn::Prompt(prompt) => {
                    let frame = top_frame(stack)?;
                    frame.advance();
                    frame.remember_prompt(prompt.clone());
                    replies.push(Reply::Prompt(prompt));
                    return Ok(TurnStatus::Waiting);
                }
                Turn::Next(next) => {
                    top_frame(stack)?.advance();
                    next
                }
                Turn::Begin { dialog, argument } => {
                    self.dialogs.get(dialog)?;
                    top_frame(stack)?.advance();
                    stack.push(DialogFrame::new(dialog, argument.clone()));
                    StepInput::Start(argument)
                }
                Turn::Replace { dialog, argument } => {
                    self.dialogs.get(dialog)?;
                    stack.pop();
                    stack.push(DialogFrame::new(dialog, argument.clone()));
                    StepInput::Start(argument)
                }
                Turn::Reprompt(message) => {
                    let frame = top_frame(stack)?;
                    let prompt = frame
                        .last_prompt()
                        .cloned()
                        .ok_or(DialogError::NoPromptToRepeat(frame.dialog()))?;
                    if let Some(message) = message {
                        replies.push(Reply::Message(message));
                    }
                    replies.push(Reply::Prompt(prompt));
                    return Ok(TurnStatus::Waiting);
                }
                Turn::End(result) => {
                    stack.pop();
                    if stack.is_empty() {
                        return Ok(TurnStatus::Complete(result));
                    }
                    StepInput::Child(result)
                }
            };
        }

        Err(DialogError::RunawayTurn {
            limit: self.max_transitions,
        })
    }
}

fn top_frame(stack: &mut DialogStack) -> Result<&mut DialogFrame, DialogError> {
    stack
        .split_top_mut()
        .map(|(frame, _)| frame)
        .ok_or(DialogError::EmptyStack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::{Dialog, Prompt};
    use crate::domain::foundation::{ConversationId, MemberId};
    use async_trait::async_trait;

    /// Asks for a name, then runs the counter child and combines both answers.
    struct Greeter;

    #[async_trait]
    impl Dialog for Greeter {
        fn id(&self) -> DialogId {
            DialogId::DataAccess
        }

        fn step_count(&self) -> usize {
            3
        }

        async fn run_step(
            &self,
            index: usize,
            ctx: &mut StepContext<'_>,
            input: StepInput,
        ) -> Result<Turn, DialogError> {
            match (index, input) {
                (0, StepInput::Start(_)) => Ok(Turn::Prompt(Prompt::text("Name?"))),
                (1, StepInput::Answer(answer)) => {
                    ctx.set_value(
                        ValueKey::CardInputId,
                        DialogValue::Text(answer.text_or_empty().to_string()),
                    );
                    Ok(Turn::begin(DialogId::ConsumerCount, None))
                }
                (2, StepInput::Child(DialogResult::Completed(DialogValue::Count(n)))) => {
                    let name = ctx
                        .take_value(ValueKey::CardInputId)
                        .and_then(DialogValue::into_text)
                        .ok_or_else(|| ctx.missing(ValueKey::CardInputId))?;
                    Ok(Turn::complete(DialogValue::Text(format!("{}:{}", name, n))))
                }
                (2, StepInput::Child(DialogResult::Aborted)) => Ok(Turn::abort()),
                (index, _) => Err(ctx.unexpected(index, "a known input")),
            }
        }
    }

    /// Asks for a number; restarts on garbage, aborts on zero.
    struct Counter;

    #[async_trait]
    impl Dialog for Counter {
        fn id(&self) -> DialogId {
            DialogId::ConsumerCount
        }

        fn step_count(&self) -> usize {
            2
        }

        async fn run_step(
            &self,
            index: usize,
            ctx: &mut StepContext<'_>,
            input: StepInput,
        ) -> Result<Turn, DialogError> {
            match index {
                0 => Ok(Turn::Prompt(Prompt::text("Count?"))),
                _ => {
                    let answer = input
                        .into_answer()
                        .ok_or_else(|| ctx.unexpected(index, "an answer"))?;
                    match answer.text_or_empty() {
                        "again" => Ok(Turn::reprompt_with("Once more.")),
                        "0" => Ok(Turn::abort()),
                        raw => match raw.parse::<u32>() {
                            Ok(n) => Ok(Turn::complete(DialogValue::Count(n))),
                            Err(_) => {
                                ctx.send("Not a number.");
                                Ok(Turn::replace(DialogId::ConsumerCount, None))
                            }
                        },
                    }
                }
            }
        }
    }

    /// Replaces itself forever.
    struct Looper;

    #[async_trait]
    impl Dialog for Looper {
        fn id(&self) -> DialogId {
            DialogId::Diagnostics
        }

        fn step_count(&self) -> usize {
            1
        }

        async fn run_step(
            &self,
            _index: usize,
            _ctx: &mut StepContext<'_>,
            _input: StepInput,
        ) -> Result<Turn, DialogError> {
            Ok(Turn::replace(DialogId::Diagnostics, None))
        }
    }

    fn runner() -> DialogRunner {
        let set = DialogSet::new()
            .with(Arc::new(Greeter))
            .with(Arc::new(Counter))
            .with(Arc::new(Looper));
        DialogRunner::new(Arc::new(set))
    }

    fn stack() -> DialogStack {
        DialogStack::new(ConversationInfo::new(
            ConversationId::new("conv-1").unwrap(),
            MemberId::new("member-1").unwrap(),
        ))
    }

    fn texts(output: &TurnOutput) -> Vec<&str> {
        output.replies.iter().map(Reply::text).collect()
    }

    #[tokio::test]
    async fn begin_runs_until_first_prompt() {
        let runner = runner();
        let mut stack = stack();

        let output = runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();

        assert_eq!(output.status, TurnStatus::Waiting);
        assert_eq!(texts(&output), vec!["Name?"]);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().index(), 1);
    }

    #[tokio::test]
    async fn child_result_flows_back_to_parent() {
        let runner = runner();
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::text("Ada"))
            .await
            .unwrap();
        assert_eq!(texts(&output), vec!["Count?"]);
        assert_eq!(stack.dialogs(), vec![DialogId::DataAccess, DialogId::ConsumerCount]);

        let output = runner
            .continue_turn(&mut stack, UserInput::text("3"))
            .await
            .unwrap();
        assert_eq!(
            output.status,
            TurnStatus::Complete(DialogResult::Completed(DialogValue::Text("Ada:3".to_string())))
        );
        assert!(output.replies.is_empty());
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn replace_restarts_the_activation() {
        let runner = runner();
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();
        runner.continue_turn(&mut stack, UserInput::text("Ada")).await.unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::text("many"))
            .await
            .unwrap();

        assert_eq!(texts(&output), vec!["Not a number.", "Count?"]);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().unwrap().index(), 1);
    }

    #[tokio::test]
    async fn reprompt_keeps_the_step_index() {
        let runner = runner();
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::ConsumerCount, None).await.unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::text("again"))
            .await
            .unwrap();
        assert_eq!(texts(&output), vec!["Once more.", "Count?"]);
        assert_eq!(stack.top().unwrap().index(), 1);

        let output = runner
            .continue_turn(&mut stack, UserInput::text("7"))
            .await
            .unwrap();
        assert_eq!(
            output.status,
            TurnStatus::Complete(DialogResult::Completed(DialogValue::Count(7)))
        );
    }

    #[tokio::test]
    async fn aborted_child_aborts_parent() {
        let runner = runner();
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();
        runner.continue_turn(&mut stack, UserInput::text("Ada")).await.unwrap();

        let output = runner
            .continue_turn(&mut stack, UserInput::text("0"))
            .await
            .unwrap();

        assert_eq!(output.status, TurnStatus::Complete(DialogResult::Aborted));
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn host_reprompt_resends_last_prompt() {
        let runner = runner();
        let mut stack = stack();
        runner.begin(&mut stack, DialogId::DataAccess, None).await.unwrap();

        let output = runner.reprompt(&stack).unwrap();
        assert_eq!(texts(&output), vec!["Name?"]);
        assert_eq!(stack.top().unwrap().index(), 1);
    }

    #[tokio::test]
    async fn runaway_turn_is_stopped() {
        let runner = runner().with_max_transitions(16);
        let mut stack = stack();

        let err = runner
            .begin(&mut stack, DialogId::Diagnostics, None)
            .await
            .unwrap_err();

        assert_eq!(err, DialogError::RunawayTurn { limit: 16 });
    }

    #[tokio::test]
    async fn continue_on_empty_stack_fails() {
        let runner = runner();
        let mut stack = stack();

        let err = runner
            .continue_turn(&mut stack, UserInput::text("hello"))
            .await
            .unwrap_err();
        assert_eq!(err, DialogError::EmptyStack);
        assert_eq!(runner.reprompt(&stack).unwrap_err(), DialogError::EmptyStack);
    }

    #[tokio::test]
    async fn unregistered_dialog_cannot_begin() {
        let runner = DialogRunner::new(Arc::new(DialogSet::new()));
        let mut stack = stack();

        let err = runner
            .begin(&mut stack, DialogId::SelectTables, None)
            .await
            .unwrap_err();
        assert_eq!(err, DialogError::UnknownDialog(DialogId::SelectTables));
        assert!(stack.is_empty());
    }
}
