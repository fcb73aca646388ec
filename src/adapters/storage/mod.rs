//! Storage Adapters
//!
//! Implementations of the InterviewStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryInterviewStore** - Keeps dialog stacks in memory for the life of the process

mod in_memory_interview_store;

pub use in_memory_interview_store::InMemoryInterviewStore;
