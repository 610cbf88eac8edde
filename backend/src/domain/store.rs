//! The shopping list store: owns every collection, persists each mutation
//! write-through, and raises advisory notifications. All operations are
//! synchronous and single-writer; persistence failures are logged and the
//! in-memory state stays authoritative for the session.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveTime;
use log::{error, info, warn};

use crate::domain::budget_service::{self, PrioritySplit, SavingSuggestion};
use crate::domain::clock::Clock;
use crate::domain::commands::{AddItemCommand, AddItemResult, UpdateBudgetCommand};
use crate::domain::models::{
    default_patterns, BudgetAlert, BudgetValidationError, ItemPurchaseHistory,
    ItemValidationError, PurchaseHistoryEntry, ShoppingItem, ShoppingPattern, MIN_BUDGET_AMOUNT,
    MIN_ITEM_PRICE, PHANTOM_NAMES,
};
use crate::domain::notifications::StoreNotification;
use crate::domain::suggestion_service;
use crate::domain::views::{self, SortOrder};
use crate::storage::json::{
    AppSettings, BudgetRepository, HistoryRepository, ItemRepository, JsonConnection,
    PatternRepository, SettingsRepository, SettingsStorage, StatsRepository,
};
use crate::storage::traits::{
    BudgetStorage, HistoryStorage, ItemStorage, PatternStorage, StatsStorage,
};

pub struct ShoppingListStore {
    items: Vec<ShoppingItem>,
    budget: BudgetAlert,
    history: Vec<PurchaseHistoryEntry>,
    patterns: Vec<ShoppingPattern>,
    stats: HashMap<String, ItemPurchaseHistory>,
    settings: AppSettings,
    item_repository: ItemRepository,
    budget_repository: BudgetRepository,
    history_repository: HistoryRepository,
    pattern_repository: PatternRepository,
    stats_repository: StatsRepository,
    settings_repository: SettingsRepository,
    clock: Arc<dyn Clock>,
}

impl ShoppingListStore {
    /// Build the store from persisted state. Any collection that fails to
    /// load starts empty; the phantom-item invariant and the day-boundary
    /// rollover are applied before the store is handed out.
    pub fn new(connection: Arc<JsonConnection>, clock: Arc<dyn Clock>) -> Result<Self> {
        let item_repository = ItemRepository::new(connection.clone());
        let budget_repository = BudgetRepository::new(connection.clone());
        let history_repository = HistoryRepository::new(connection.clone());
        let pattern_repository = PatternRepository::new(connection.clone());
        let stats_repository = StatsRepository::new(connection.clone());
        let settings_repository = SettingsRepository::new(connection);

        let items = item_repository.load_items().unwrap_or_else(|e| {
            warn!("Failed to load items, starting empty: {:#}", e);
            Vec::new()
        });
        let budget = budget_repository.load_budget().unwrap_or_else(|e| {
            warn!("Failed to load budget, using default: {:#}", e);
            BudgetAlert::default()
        });
        let history = history_repository.load_history().unwrap_or_else(|e| {
            warn!("Failed to load history, starting empty: {:#}", e);
            Vec::new()
        });
        let patterns = pattern_repository.load_patterns().unwrap_or_else(|e| {
            warn!("Failed to load patterns, starting empty: {:#}", e);
            Vec::new()
        });
        let stats = stats_repository.load_stats().unwrap_or_else(|e| {
            warn!("Failed to load item stats, starting empty: {:#}", e);
            HashMap::new()
        });
        let settings = settings_repository.load_settings().unwrap_or_else(|e| {
            warn!("Failed to load settings, using defaults: {:#}", e);
            AppSettings::default()
        });

        let mut store = Self {
            items,
            budget,
            history,
            patterns,
            stats,
            settings,
            item_repository,
            budget_repository,
            history_repository,
            pattern_repository,
            stats_repository,
            settings_repository,
            clock,
        };

        store.seed_on_first_launch();
        store.ensure_phantom_items();
        store.rollover_if_day_changed();

        let today = store.clock.now().date_naive();
        if store.settings.last_active_date != Some(today) {
            store.settings.last_active_date = Some(today);
            store.persist_settings();
        }

        Ok(store)
    }

    // ---- item CRUD ----

    /// Add an item, or merge into an existing uncompleted row with the same
    /// name (case-insensitive) and the same normalized price. Advisory side
    /// effects: one forgotten-item pattern check and the budget thresholds.
    pub fn add_item(&mut self, command: AddItemCommand) -> Result<AddItemResult> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(ItemValidationError::EmptyName.into());
        }
        if command.quantity == 0 {
            return Err(ItemValidationError::ZeroQuantity.into());
        }
        let price = crate::domain::models::normalize_price(command.price);
        if price < MIN_ITEM_PRICE {
            return Err(ItemValidationError::PriceTooLow.into());
        }

        let mut notifications = Vec::new();
        let added_total = price * command.quantity as f64;

        let existing_index = self.items.iter().position(|i| {
            !i.phantom && !i.completed && i.matches_name(&name) && (i.price - price).abs() < 0.005
        });

        let (item_id, merged) = match existing_index {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity += command.quantity;
                notifications.push(StoreNotification::QuantityUpdated {
                    name: item.name.clone(),
                    quantity: item.quantity,
                });
                (item.id.clone(), true)
            }
            None => {
                let item = ShoppingItem::new(
                    &name,
                    price,
                    command.quantity,
                    command.category,
                    self.clock.now(),
                );
                let item_id = item.id.clone();
                // Display quirk kept from the original app: new rows slot in
                // right after the phantom row named "5" when it exists.
                let position = self
                    .items
                    .iter()
                    .position(|i| i.id == ShoppingItem::phantom_id("5"))
                    .map(|p| p + 1);
                match position {
                    Some(p) if p < self.items.len() => self.items.insert(p, item),
                    _ => self.items.push(item),
                }
                notifications.push(StoreNotification::ItemAdded { name: name.clone() });
                (item_id, false)
            }
        };
        self.persist_items();

        if let Some(suggestion) = suggestion_service::check_for_forgotten_items(
            &name,
            &self.items,
            &mut self.patterns,
            self.clock.now(),
        ) {
            self.persist_patterns();
            notifications.push(suggestion);
        }

        let total = views::calculate_total(&self.items);
        notifications.extend(budget_service::check_after_adding(
            &self.budget,
            total - added_total,
            total,
        ));

        Ok(AddItemResult {
            item_id,
            merged,
            notifications,
        })
    }

    /// Delete an item. Phantom rows are permanent: deleting one is a no-op.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.phantom || i.id != item_id);
        let removed = self.items.len() != before;
        if removed {
            self.persist_items();
        }
        removed
    }

    /// Flip `completed`; marking an item purchased feeds its purchase stats.
    /// Returns the new state, or `None` for unknown/phantom ids.
    pub fn toggle_item_completion(&mut self, item_id: &str) -> Option<bool> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id && !i.phantom)?;
        let (completed, name) = {
            let item = &mut self.items[index];
            item.completed = !item.completed;
            (item.completed, item.name.clone())
        };
        if completed {
            let now = self.clock.now();
            let entry = self
                .stats
                .entry(name.to_lowercase())
                .or_insert(ItemPurchaseHistory {
                    frequency: 0,
                    last_bought: now,
                });
            entry.frequency += 1;
            entry.last_bought = now;
            self.persist_stats();
        }
        self.persist_items();
        Some(completed)
    }

    /// Set an item's quantity; zero or negative behaves as removal.
    pub fn update_item_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(item_id);
        }
        let updated = {
            match self
                .items
                .iter_mut()
                .find(|i| i.id == item_id && !i.phantom)
            {
                Some(item) => {
                    item.quantity = quantity as u32;
                    true
                }
                None => false,
            }
        };
        if updated {
            self.persist_items();
        }
        updated
    }

    /// Clear the list. Completed non-phantom items are snapshotted into a new
    /// history entry first; phantom rows survive untouched. Returns the id of
    /// the history entry, when one was created.
    pub fn clear_all_items(&mut self) -> Option<String> {
        let completed: Vec<ShoppingItem> = self
            .items
            .iter()
            .filter(|i| !i.phantom && i.completed)
            .cloned()
            .collect();

        let entry_id = if completed.is_empty() {
            None
        } else {
            let entry = PurchaseHistoryEntry::from_items(completed, self.clock.now());
            let id = entry.id.clone();
            info!(
                "Saving {} completed items to history entry {}",
                entry.items.len(),
                id
            );
            self.history.insert(0, entry);
            self.persist_history();
            Some(id)
        };

        self.items.retain(|i| i.phantom);
        self.persist_items();
        entry_id
    }

    /// Sum of price*quantity over non-completed, non-phantom items; pass a
    /// subset to total something other than the live collection.
    pub fn calculate_total(&self, subset: Option<&[ShoppingItem]>) -> f64 {
        views::calculate_total(subset.unwrap_or(&self.items))
    }

    // ---- derived views ----

    pub fn get_sorted_items(&self, order: SortOrder) -> Vec<ShoppingItem> {
        views::sorted_items(&self.items, order)
    }

    pub fn get_phantom_items(&self) -> Vec<ShoppingItem> {
        views::phantom_items(&self.items)
    }

    pub fn get_regular_items(&self) -> Vec<ShoppingItem> {
        views::regular_items(&self.items)
    }

    pub fn get_items_by_category(&self) -> BTreeMap<String, Vec<ShoppingItem>> {
        views::items_by_category(&self.items)
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    /// Set an item's category, typically from the asynchronous categorizer.
    pub fn set_item_category(&mut self, item_id: &str, category: &str) -> bool {
        let updated = {
            match self
                .items
                .iter_mut()
                .find(|i| i.id == item_id && !i.phantom)
            {
                Some(item) => {
                    item.category = category.to_string();
                    true
                }
                None => false,
            }
        };
        if updated {
            self.persist_items();
        }
        updated
    }

    // ---- budget ----

    pub fn budget(&self) -> &BudgetAlert {
        &self.budget
    }

    /// Merge a partial budget update. Enabling requires an amount of at least
    /// 0.10; violations reject the whole update without mutating state.
    pub fn update_budget(&mut self, command: UpdateBudgetCommand) -> Result<BudgetAlert> {
        let mut next = self.budget.clone();
        if let Some(amount) = command.amount {
            if amount < 0.0 {
                return Err(BudgetValidationError::NegativeAmount.into());
            }
            next.amount = amount;
        }
        if let Some(threshold) = command.warning_threshold {
            if !(10..=100).contains(&threshold) {
                return Err(BudgetValidationError::ThresholdOutOfRange.into());
            }
            next.warning_threshold = threshold;
        }
        if let Some(enabled) = command.enabled {
            next.enabled = enabled;
        }
        if next.enabled && next.amount < MIN_BUDGET_AMOUNT {
            return Err(BudgetValidationError::AmountTooLow.into());
        }
        self.budget = next.clone();
        self.persist_budget();
        Ok(next)
    }

    pub fn get_saving_suggestions(&self) -> Vec<SavingSuggestion> {
        budget_service::saving_suggestions(&self.items)
    }

    pub fn get_priority_items(&self, max_budget: f64) -> PrioritySplit {
        budget_service::priority_items(&self.items, max_budget)
    }

    // ---- history ----

    pub fn history(&self) -> &[PurchaseHistoryEntry] {
        &self.history
    }

    /// Snapshot all non-phantom items into a new history entry. No-op when
    /// only phantom rows remain.
    pub fn save_current_list_to_history(&mut self) -> Option<String> {
        let regular: Vec<ShoppingItem> = self
            .items
            .iter()
            .filter(|i| !i.phantom)
            .cloned()
            .collect();
        if regular.is_empty() {
            return None;
        }
        let entry = PurchaseHistoryEntry::from_items(regular, self.clock.now());
        let id = entry.id.clone();
        self.history.insert(0, entry);
        self.persist_history();
        Some(id)
    }

    /// Replace the current non-phantom items with copies of a history entry's
    /// items: fresh ids, uncompleted, dated now. Phantom rows are preserved.
    pub fn restore_list_from_history(&mut self, entry_id: &str) -> bool {
        let snapshot: Vec<ShoppingItem> = match self.history.iter().find(|e| e.id == entry_id) {
            Some(entry) => entry.items.clone(),
            None => return false,
        };
        let now = self.clock.now();
        let restored = snapshot.into_iter().map(|mut item| {
            item.id = ShoppingItem::generate_id();
            item.completed = false;
            item.date = now;
            item
        });
        self.items.retain(|i| i.phantom);
        self.items.extend(restored);
        self.persist_items();
        true
    }

    pub fn delete_history_entry(&mut self, entry_id: &str) -> bool {
        let before = self.history.len();
        self.history.retain(|e| e.id != entry_id);
        let removed = self.history.len() != before;
        if removed {
            self.persist_history();
        }
        removed
    }

    pub fn delete_all_history(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    // ---- suggestions ----

    pub fn patterns(&self) -> &[ShoppingPattern] {
        &self.patterns
    }

    /// Frequency-correlated co-purchase suggestion for a just-bought item.
    pub fn check_personalized_suggestions(&self, item_name: &str) -> Option<String> {
        suggestion_service::check_personalized_suggestions(item_name, &self.stats)
    }

    pub fn purchase_stats(&self) -> &HashMap<String, ItemPurchaseHistory> {
        &self.stats
    }

    // ---- preferences ----

    pub fn language(&self) -> &str {
        &self.settings.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.settings.language = language.to_string();
        self.persist_settings();
    }

    pub fn theme(&self) -> &str {
        &self.settings.theme
    }

    pub fn set_theme(&mut self, theme: &str) {
        self.settings.theme = theme.to_string();
        self.persist_settings();
    }

    // ---- internals ----

    /// Re-insert any missing phantom row without duplicating existing ones.
    fn ensure_phantom_items(&mut self) {
        let now = self.clock.now();
        let mut changed = false;
        for (index, name) in PHANTOM_NAMES.iter().enumerate() {
            let id = ShoppingItem::phantom_id(name);
            if !self.items.iter().any(|i| i.id == id) {
                let position = index.min(self.items.len());
                self.items.insert(position, ShoppingItem::phantom(name, now));
                changed = true;
            }
        }
        if changed {
            self.persist_items();
        }
    }

    /// The one implicit state transition: when the persisted active date is
    /// not today and stale non-phantom items remain, move them into a history
    /// entry dated at that previous date and start the day fresh.
    fn rollover_if_day_changed(&mut self) {
        let today = self.clock.now().date_naive();
        let last = match self.settings.last_active_date {
            Some(date) => date,
            None => return,
        };
        if last == today {
            return;
        }
        let stale: Vec<ShoppingItem> = self
            .items
            .iter()
            .filter(|i| !i.phantom)
            .cloned()
            .collect();
        if stale.is_empty() {
            return;
        }
        info!(
            "Day boundary crossed ({} -> {}), moving {} items to history",
            last,
            today,
            stale.len()
        );
        let entry_date = last.and_time(NaiveTime::MIN).and_utc();
        self.history
            .insert(0, PurchaseHistoryEntry::from_items(stale, entry_date));
        self.items.retain(|i| i.phantom);
        let now = self.clock.now();
        for item in &mut self.items {
            item.date = now;
            item.completed = false;
        }
        self.persist_history();
        self.persist_items();
    }

    fn seed_on_first_launch(&mut self) {
        if self.settings.first_launch_done {
            return;
        }
        if self.patterns.is_empty() {
            self.patterns = default_patterns();
            self.persist_patterns();
        }
        self.settings.first_launch_done = true;
        self.persist_settings();
    }

    fn persist_items(&self) {
        if let Err(e) = self.item_repository.save_items(&self.items) {
            error!("Failed to persist items, in-memory state kept: {:#}", e);
        }
    }

    fn persist_budget(&self) {
        if let Err(e) = self.budget_repository.save_budget(&self.budget) {
            error!("Failed to persist budget, in-memory state kept: {:#}", e);
        }
    }

    fn persist_history(&self) {
        if let Err(e) = self.history_repository.save_history(&self.history) {
            error!("Failed to persist history, in-memory state kept: {:#}", e);
        }
    }

    fn persist_patterns(&self) {
        if let Err(e) = self.pattern_repository.save_patterns(&self.patterns) {
            error!("Failed to persist patterns, in-memory state kept: {:#}", e);
        }
    }

    fn persist_stats(&self) {
        if let Err(e) = self.stats_repository.save_stats(&self.stats) {
            error!("Failed to persist item stats, in-memory state kept: {:#}", e);
        }
    }

    fn persist_settings(&self) {
        if let Err(e) = self.settings_repository.save_settings(&self.settings) {
            error!("Failed to persist settings, in-memory state kept: {:#}", e);
        }
    }
}
