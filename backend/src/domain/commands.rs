//! Command and result structs for store operations.

use crate::domain::notifications::StoreNotification;

#[derive(Debug, Clone, PartialEq)]
pub struct AddItemCommand {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub category: Option<String>,
}

impl AddItemCommand {
    pub fn new(name: &str, price: f64) -> Self {
        Self {
            name: name.to_string(),
            price,
            quantity: 1,
            category: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

/// Outcome of an add: either a fresh row or a quantity merge, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct AddItemResult {
    pub item_id: String,
    pub merged: bool,
    /// Advisory notifications raised by the add (merge notice, forgotten-item
    /// suggestion, budget threshold crossings).
    pub notifications: Vec<StoreNotification>,
}

/// Partial budget update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBudgetCommand {
    pub enabled: Option<bool>,
    pub amount: Option<f64>,
    pub warning_threshold: Option<u8>,
}
