//! Approval store adapters.

mod file_store;
mod in_memory;

pub use file_store::FileApprovalStore;
pub use in_memory::InMemoryApprovalStore;
