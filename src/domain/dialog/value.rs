//! Values exchanged between steps, dialogs, and the runner.

use uuid::Uuid;

use super::{DialogId, Prompt, UserInput};
use crate::domain::access_request::{AccessRequest, ServicePrincipalBinding};
use crate::domain::foundation::{DataVisibility, TargetDatabase, TenantName, TicketId};

/// Keys of the per-activation value bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey {
    /// The request being accumulated.
    Request,
    /// Service principal bindings accepted so far.
    Bindings,
    /// Tenant chosen for the current batch of app ids.
    Tenant,
    /// Unique input id of the card currently on screen.
    CardInputId,
    /// Table names offered on the table card.
    TableOptions,
}

/// A value carried by a dialog argument, activation slot, or result.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogValue {
    Request(Box<AccessRequest>),
    ServiceTreeId(Uuid),
    Database(TargetDatabase),
    Visibility(DataVisibility),
    Bindings(Vec<ServicePrincipalBinding>),
    Tenant(TenantName),
    Count(u32),
    Email(String),
    Tables(Vec<String>),
    Text(String),
    TicketId(TicketId),
}

macro_rules! value_accessors {
    ($( $method:ident => $variant:ident($ty:ty) ),* $(,)?) => {
        impl DialogValue {
            $(
                #[doc = concat!("Returns the payload when this is `", stringify!($variant), "`.")]
                pub fn $method(self) -> Option<$ty> {
                    match self {
                        DialogValue::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            )*
        }
    };
}

value_accessors! {
    into_request => Request(Box<AccessRequest>),
    into_service_tree_id => ServiceTreeId(Uuid),
    into_database => Database(TargetDatabase),
    into_visibility => Visibility(DataVisibility),
    into_bindings => Bindings(Vec<ServicePrincipalBinding>),
    into_tenant => Tenant(TenantName),
    into_count => Count(u32),
    into_email => Email(String),
    into_tables => Tables(Vec<String>),
    into_text => Text(String),
    into_ticket_id => TicketId(TicketId),
}

impl From<AccessRequest> for DialogValue {
    fn from(request: AccessRequest) -> Self {
        DialogValue::Request(Box::new(request))
    }
}

/// How a dialog finished.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult {
    /// The dialog produced its value.
    Completed(DialogValue),
    /// The branch ended without a value (user declined, validation dead end,
    /// backend failure). Parents treat it as "stop".
    Aborted,
}

impl DialogResult {
    pub fn is_aborted(&self) -> bool {
        matches!(self, DialogResult::Aborted)
    }

    pub fn into_value(self) -> Option<DialogValue> {
        match self {
            DialogResult::Completed(value) => Some(value),
            DialogResult::Aborted => None,
        }
    }
}

/// The input handed to a step when it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum StepInput {
    /// First step of a fresh activation, with the activation argument.
    Start(Option<DialogValue>),
    /// The user's answer to the previous step's prompt.
    Answer(UserInput),
    /// The result of a child dialog started by the previous step.
    Child(DialogResult),
    /// The previous step deliberately skipped its question.
    Skipped,
}

impl StepInput {
    /// The user's answer, if this input is one.
    pub fn into_answer(self) -> Option<UserInput> {
        match self {
            StepInput::Answer(answer) => Some(answer),
            _ => None,
        }
    }
}

/// What a step asks the runner to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// Send the prompt and wait for the answer; it goes to the next step.
    Prompt(Prompt),
    /// Run the next step immediately with the given input.
    Next(StepInput),
    /// Start a child dialog; its result goes to the next step.
    Begin {
        dialog: DialogId,
        argument: Option<DialogValue>,
    },
    /// End this activation silently and start a fresh one in its place.
    Replace {
        dialog: DialogId,
        argument: Option<DialogValue>,
    },
    /// Send the optional message, then repeat the last prompt of this
    /// activation without moving the step index.
    Reprompt(Option<String>),
    /// Pop this activation, handing the result to the parent.
    End(DialogResult),
}

impl Turn {
    pub fn begin(dialog: DialogId, argument: Option<DialogValue>) -> Self {
        Turn::Begin { dialog, argument }
    }

    pub fn replace(dialog: DialogId, argument: Option<DialogValue>) -> Self {
        Turn::Replace { dialog, argument }
    }

    pub fn complete(value: DialogValue) -> Self {
        Turn::End(DialogResult::Completed(value))
    }

    pub fn abort() -> Self {
        Turn::End(DialogResult::Aborted)
    }

    pub fn reprompt_with(message: impl Into<String>) -> Self {
        Turn::Reprompt(Some(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_matching_payload_only() {
        assert_eq!(DialogValue::Count(5).into_count(), Some(5));
        assert_eq!(DialogValue::Count(5).into_email(), None);
        assert_eq!(
            DialogValue::Visibility(DataVisibility::Private).into_visibility(),
            Some(DataVisibility::Private)
        );
    }

    #[test]
    fn request_conversion_boxes_the_request() {
        let value = DialogValue::from(AccessRequest::new(TargetDatabase::GitHub));
        let request = value.into_request().unwrap();
        assert_eq!(request.data_set().database, TargetDatabase::GitHub);
    }

    #[test]
    fn aborted_result_has_no_value() {
        assert!(DialogResult::Aborted.is_aborted());
        assert_eq!(DialogResult::Aborted.into_value(), None);
        assert_eq!(
            DialogResult::Completed(DialogValue::Count(1)).into_value(),
            Some(DialogValue::Count(1))
        );
    }

    #[test]
    fn turn_helpers_build_expected_variants() {
        assert_eq!(
            Turn::begin(DialogId::ServiceTree, None),
            Turn::Begin {
                dialog: DialogId::ServiceTree,
                argument: None
            }
        );
        assert_eq!(
            Turn::replace(DialogId::ContactEmail, Some(DialogValue::Count(1))),
            Turn::Replace {
                dialog: DialogId::ContactEmail,
                argument: Some(DialogValue::Count(1))
            }
        );
        assert_eq!(Turn::abort(), Turn::End(DialogResult::Aborted));
    }
}
