//! JSON file-backed storage. One JSON document per logical key in a flat data
//! directory:
//!
//! ```text
//! data/
//! ├── items.json
//! ├── budget.json
//! ├── purchase_history.json
//! ├── patterns.json
//! ├── item_stats.json
//! └── settings.json
//! ```

pub mod budget_repository;
pub mod connection;
pub mod history_repository;
pub mod item_repository;
pub mod pattern_repository;
pub mod settings_repository;
pub mod stats_repository;

pub use budget_repository::BudgetRepository;
pub use connection::JsonConnection;
pub use history_repository::HistoryRepository;
pub use item_repository::ItemRepository;
pub use pattern_repository::PatternRepository;
pub use settings_repository::{AppSettings, SettingsRepository, SettingsStorage};
pub use stats_repository::StatsRepository;
