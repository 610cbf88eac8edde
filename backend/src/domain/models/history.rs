//! Purchase history models: frozen list snapshots and per-item purchase stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::ShoppingItem;

/// A frozen snapshot of shopping items, created when the list is cleared or a
/// day boundary is crossed. Immutable after creation except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseHistoryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub items: Vec<ShoppingItem>,
    /// Sum of price*quantity over `items`, computed at snapshot time.
    pub total_amount: f64,
}

impl PurchaseHistoryEntry {
    pub fn generate_id() -> String {
        format!("history::{}", Uuid::new_v4())
    }

    /// Snapshot a set of items into a new entry dated `date`.
    pub fn from_items(items: Vec<ShoppingItem>, date: DateTime<Utc>) -> Self {
        let total_amount = items.iter().map(|i| i.line_total()).sum();
        Self {
            id: Self::generate_id(),
            date,
            items,
            total_amount,
        }
    }
}

/// How often an item name has been marked as purchased, and when last.
/// Keyed by the lowercased item name in the store's stats map; feeds the
/// personalized co-purchase suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPurchaseHistory {
    pub frequency: u32,
    pub last_bought: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_computes_total() {
        let now = Utc::now();
        let items = vec![
            ShoppingItem::new("Leche", 1.5, 2, None, now),
            ShoppingItem::new("Pan", 0.9, 1, None, now),
        ];
        let entry = PurchaseHistoryEntry::from_items(items, now);
        assert!((entry.total_amount - 3.9).abs() < 1e-9);
        assert_eq!(entry.items.len(), 2);
    }

    #[test]
    fn test_empty_snapshot_has_zero_total() {
        let entry = PurchaseHistoryEntry::from_items(Vec::new(), Utc::now());
        assert_eq!(entry.total_amount, 0.0);
    }
}
