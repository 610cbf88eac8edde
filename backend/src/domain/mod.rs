//! Domain layer: the store, its models, and the pure services around it.

pub mod budget_service;
pub mod clock;
pub mod commands;
pub mod models;
pub mod notifications;
pub mod store;
pub mod suggestion_service;
pub mod views;
pub mod voice;

pub use clock::{Clock, FixedClock, SystemClock};
pub use commands::{AddItemCommand, AddItemResult, UpdateBudgetCommand};
pub use notifications::StoreNotification;
pub use store::ShoppingListStore;
pub use views::SortOrder;
