//! Domain model for a single shopping list row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel category for items the categorizer has not classified yet.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Minimum unit price accepted from any user-facing add operation.
pub const MIN_ITEM_PRICE: f64 = 0.1;

/// Names of the five permanent placeholder rows. The ids derived from these
/// names must exist in the collection at all times.
pub const PHANTOM_NAMES: [&str; 5] = ["1", "2", "3", "4", "5"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    /// Unit price, normalized to 2 decimal places before storage.
    pub price: f64,
    pub quantity: u32,
    pub completed: bool,
    pub date: DateTime<Utc>,
    pub category: String,
    /// Permanent placeholder row; excluded from totals, history and category views.
    pub phantom: bool,
}

impl ShoppingItem {
    /// Generate a unique id for a regular item
    pub fn generate_id() -> String {
        format!("item::{}", Uuid::new_v4())
    }

    /// Fixed id for a phantom row, derived from its name ("1".."5")
    pub fn phantom_id(name: &str) -> String {
        format!("phantom::{}", name)
    }

    pub fn new(
        name: &str,
        price: f64,
        quantity: u32,
        category: Option<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::generate_id(),
            name: name.trim().to_string(),
            price: normalize_price(price),
            quantity,
            completed: false,
            date,
            category: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            phantom: false,
        }
    }

    pub fn phantom(name: &str, date: DateTime<Utc>) -> Self {
        Self {
            id: Self::phantom_id(name),
            name: name.to_string(),
            price: 0.0,
            quantity: 1,
            completed: false,
            date,
            category: UNCATEGORIZED.to_string(),
            phantom: true,
        }
    }

    /// Price times quantity for this row.
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Case-insensitive name comparison used for merging and lookups.
    pub fn matches_name(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.trim().to_lowercase()
    }
}

/// Round a price to 2 decimal places to avoid floating-point drift in totals.
pub fn normalize_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Lowercase a name and strip everything that is not a letter. Used when
/// grouping near-identical products ("Leche entera" vs "leche-entera").
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ItemValidationError {
    #[error("Item name cannot be empty")]
    EmptyName,
    #[error("Price must be at least 0.10")]
    PriceTooLow,
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_price_rounds_to_two_decimals() {
        assert_eq!(normalize_price(1.005), 1.01);
        assert_eq!(normalize_price(1.504999), 1.5);
        assert_eq!(normalize_price(0.1), 0.1);
    }

    #[test]
    fn test_normalize_name_strips_non_letters() {
        assert_eq!(normalize_name("Leche entera 1L"), "lecheentera");
        assert_eq!(normalize_name("café-molido"), "cafémolido");
    }

    #[test]
    fn test_line_total() {
        let item = ShoppingItem::new("Leche", 1.5, 2, None, Utc::now());
        assert_eq!(item.line_total(), 3.0);
    }

    #[test]
    fn test_matches_name_is_case_insensitive() {
        let item = ShoppingItem::new("Leche", 1.5, 1, None, Utc::now());
        assert!(item.matches_name("leche"));
        assert!(item.matches_name("  LECHE "));
        assert!(!item.matches_name("pan"));
    }

    #[test]
    fn test_phantom_ids_are_stable() {
        let now = Utc::now();
        let p = ShoppingItem::phantom("5", now);
        assert_eq!(p.id, "phantom::5");
        assert!(p.phantom);
    }
}
