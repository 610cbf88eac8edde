//! Storage layer: abstraction traits plus the JSON key-value implementation.

pub mod json;
pub mod traits;

pub use json::JsonConnection;
pub use traits::{BudgetStorage, HistoryStorage, ItemStorage, PatternStorage, StatsStorage};
