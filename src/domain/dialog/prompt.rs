//! Prompts sent to the transport and answers received from it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::parsing::split_comma_list;

/// What kind of answer a prompt expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Any text.
    FreeText,
    /// One label from a fixed list.
    Choice { options: Vec<String> },
    /// A choice card rendered by the transport; the answer arrives as a
    /// structured value keyed by the card's input id.
    Card(ChoiceCard),
}

/// A choice-set card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceCard {
    pub input_id: String,
    pub heading: String,
    pub multi_select: bool,
    pub choices: Vec<CardChoice>,
}

/// One entry on a choice card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardChoice {
    pub title: String,
    pub value: String,
}

impl CardChoice {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// A question put to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub expect: Expectation,
}

impl Prompt {
    /// Free text question.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expect: Expectation::FreeText,
        }
    }

    /// Closed choice question.
    pub fn choice<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            expect: Expectation::Choice {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Choice card question.
    pub fn card(card: ChoiceCard) -> Self {
        Self {
            text: card.heading.clone(),
            expect: Expectation::Card(card),
        }
    }
}

/// Outbound activity produced during a turn, in send order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Reply {
    Message(String),
    Prompt(Prompt),
}

impl Reply {
    /// Text of the reply, whether message or prompt.
    pub fn text(&self) -> &str {
        match self {
            Reply::Message(text) => text,
            Reply::Prompt(prompt) => &prompt.text,
        }
    }
}

/// An inbound answer from the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    pub text: Option<String>,
    pub value: Option<Value>,
}

impl UserInput {
    /// A typed text answer.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            value: None,
        }
    }

    /// A card submission.
    pub fn card(value: Value) -> Self {
        Self {
            text: None,
            value: Some(value),
        }
    }

    /// The text answer, or empty when only a card value was submitted.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Values selected on the card input `input_id`.
    ///
    /// Card submissions carry either an array or a comma-joined string under
    /// the input id. Transports without card support send the selection as
    /// comma-separated text instead.
    pub fn card_selection(&self, input_id: &str) -> Vec<String> {
        if let Some(field) = self.value.as_ref().and_then(|v| v.get(input_id)) {
            return match field {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
                Value::String(joined) => split_comma_list(joined),
                _ => Vec::new(),
            };
        }
        self.text.as_deref().map(split_comma_list).unwrap_or_default()
    }
}
