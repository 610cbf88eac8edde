//! Shopping list core: domain store and services, JSON storage, and the
//! external suggestion boundaries.

pub mod domain;
pub mod io;
pub mod storage;

pub use domain::{
    AddItemCommand, AddItemResult, ShoppingListStore, SortOrder, StoreNotification,
    UpdateBudgetCommand,
};
pub use storage::JsonConnection;
