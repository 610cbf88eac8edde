//! Domain models owned by the shopping list store.

pub mod budget;
pub mod history;
pub mod item;
pub mod pattern;

pub use budget::{BudgetAlert, BudgetValidationError, MIN_BUDGET_AMOUNT};
pub use history::{ItemPurchaseHistory, PurchaseHistoryEntry};
pub use item::{
    normalize_name, normalize_price, ItemValidationError, ShoppingItem, MIN_ITEM_PRICE,
    PHANTOM_NAMES, UNCATEGORIZED,
};
pub use pattern::{default_patterns, ShoppingPattern};
