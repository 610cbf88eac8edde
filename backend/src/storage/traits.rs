//! Storage abstraction traits. The store works against these so a different
//! backend (another file layout, browser localStorage behind a shim, an
//! in-memory double for tests) can slot in without touching domain logic.
//!
//! Every collection is loaded and saved whole; there is exactly one writer,
//! so no partial updates or transactions are needed.

use std::collections::HashMap;

use anyhow::Result;

use crate::domain::models::{
    BudgetAlert, ItemPurchaseHistory, PurchaseHistoryEntry, ShoppingItem, ShoppingPattern,
};

pub trait ItemStorage: Send + Sync {
    fn load_items(&self) -> Result<Vec<ShoppingItem>>;
    fn save_items(&self, items: &[ShoppingItem]) -> Result<()>;
}

pub trait BudgetStorage: Send + Sync {
    fn load_budget(&self) -> Result<BudgetAlert>;
    fn save_budget(&self, budget: &BudgetAlert) -> Result<()>;
}

pub trait HistoryStorage: Send + Sync {
    /// Entries ordered most-recent-first.
    fn load_history(&self) -> Result<Vec<PurchaseHistoryEntry>>;
    fn save_history(&self, entries: &[PurchaseHistoryEntry]) -> Result<()>;
}

pub trait PatternStorage: Send + Sync {
    fn load_patterns(&self) -> Result<Vec<ShoppingPattern>>;
    fn save_patterns(&self, patterns: &[ShoppingPattern]) -> Result<()>;
}

/// Per-item purchase frequency map, keyed by lowercased item name.
pub trait StatsStorage: Send + Sync {
    fn load_stats(&self) -> Result<HashMap<String, ItemPurchaseHistory>>;
    fn save_stats(&self, stats: &HashMap<String, ItemPurchaseHistory>) -> Result<()>;
}
