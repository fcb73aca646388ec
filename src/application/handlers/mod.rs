//! Command handlers.
//!
//! Each handler takes a command struct and coordinates the dialog runner
//! with the interview store.

pub mod interview;

pub use interview::{
    ContinueInterviewCommand, ContinueInterviewError, ContinueInterviewHandler, InterviewTurn,
    StartInterviewCommand, StartInterviewError, StartInterviewHandler, TurnInput,
    INTERNAL_ERROR_MESSAGE,
};
