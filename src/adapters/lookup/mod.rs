//! Analytics lookup adapters.

mod in_memory;

pub use in_memory::InMemoryAnalyticsLookup;
