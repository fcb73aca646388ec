//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the closed answer vocabularies, raw-answer parsers and
//! error types that form the vocabulary of the access request domain.

mod choice;
mod errors;
mod ids;
pub mod parsing;
mod vocabulary;

pub use choice::ClosedChoice;
pub use errors::ValidationError;
pub use ids::{ConversationId, MemberId, TicketId};
pub use vocabulary::{DataVisibility, IdentityType, TargetDatabase, TenantName, YesNo};
