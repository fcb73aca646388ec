//! Application layer - Interview flows and command handlers.
//!
//! `flows` holds the concrete dialogs of the access request interview and
//! the submission pipeline. `handlers` drive a conversation's stack one turn
//! at a time through the interview store.

pub mod flows;
pub mod handlers;

pub use flows::{register_flows, FlowServices, FlowSettings, Submitter, TicketTemplate};
pub use handlers::{
    ContinueInterviewCommand, ContinueInterviewError, ContinueInterviewHandler, InterviewTurn,
    StartInterviewCommand, StartInterviewError, StartInterviewHandler, TurnInput,
};
