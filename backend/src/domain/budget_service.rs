//! Budget checks and money-saving helpers. Everything here is stateless; the
//! store passes in the collections and the configured budget.

use std::collections::BTreeMap;

use crate::domain::models::{normalize_name, BudgetAlert, ShoppingItem};
use crate::domain::notifications::StoreNotification;

/// Relative price gap (against the expensive item's price) above which a
/// cheaper same-product alternative is worth suggesting.
const SAVINGS_THRESHOLD: f64 = 0.10;

/// A cheaper alternative found for a near-identical, more expensive item.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingSuggestion {
    pub cheaper: ShoppingItem,
    pub expensive: ShoppingItem,
    pub percent_savings: f64,
}

/// Greedy split of the pending items against a spending cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrioritySplit {
    pub within_budget: Vec<ShoppingItem>,
    pub outside_budget: Vec<ShoppingItem>,
}

/// Edge-triggered budget notifications for a single addition. `total_before`
/// is the running total without the added amount, `total_after` with it; a
/// notification fires only when the addition itself crosses a threshold.
pub fn check_after_adding(
    budget: &BudgetAlert,
    total_before: f64,
    total_after: f64,
) -> Vec<StoreNotification> {
    let mut notifications = Vec::new();
    if !budget.enabled || budget.amount <= 0.0 {
        return notifications;
    }

    let warning_level = budget.warning_level();
    if total_before < warning_level && total_after >= warning_level {
        notifications.push(StoreNotification::BudgetWarning {
            total: total_after,
            amount: budget.amount,
            warning_threshold: budget.warning_threshold,
        });
    }
    if total_before < budget.amount && total_after >= budget.amount {
        notifications.push(StoreNotification::BudgetExceeded {
            total: total_after,
            amount: budget.amount,
            audible: true,
        });
    }
    notifications
}

/// Group pending items by normalized name and, within any group with more
/// than one entry, pair every notably more expensive item with the cheapest
/// one in the group.
pub fn saving_suggestions(items: &[ShoppingItem]) -> Vec<SavingSuggestion> {
    let mut groups: BTreeMap<String, Vec<&ShoppingItem>> = BTreeMap::new();
    for item in items.iter().filter(|i| !i.phantom && !i.completed) {
        let key = normalize_name(&item.name);
        if key.is_empty() {
            continue;
        }
        groups.entry(key).or_default().push(item);
    }

    let mut suggestions = Vec::new();
    for (_, mut group) in groups {
        if group.len() < 2 {
            continue;
        }
        group.sort_by(|a, b| a.line_total().total_cmp(&b.line_total()));
        let cheapest = group[0];
        for expensive in &group[1..] {
            if expensive.price <= 0.0 {
                continue;
            }
            let gap = (expensive.price - cheapest.price) / expensive.price;
            if gap > SAVINGS_THRESHOLD {
                suggestions.push(SavingSuggestion {
                    cheaper: cheapest.clone(),
                    expensive: (*expensive).clone(),
                    percent_savings: gap * 100.0,
                });
            }
        }
    }
    suggestions
}

/// Greedily fill `within_budget` cheapest-unit-price-first while the running
/// total of price*quantity stays within `max_budget`. This is a knapsack
/// approximation, not an optimal allocation; items are whole, never split.
pub fn priority_items(items: &[ShoppingItem], max_budget: f64) -> PrioritySplit {
    let mut pending: Vec<&ShoppingItem> = items
        .iter()
        .filter(|i| !i.phantom && !i.completed)
        .collect();
    pending.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut split = PrioritySplit::default();
    let mut running = 0.0;
    for item in pending {
        if running + item.line_total() <= max_budget {
            running += item.line_total();
            split.within_budget.push(item.clone());
        } else {
            split.outside_budget.push(item.clone());
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(name: &str, price: f64, quantity: u32) -> ShoppingItem {
        ShoppingItem::new(name, price, quantity, None, Utc::now())
    }

    fn budget(amount: f64, threshold: u8) -> BudgetAlert {
        BudgetAlert {
            enabled: true,
            amount,
            warning_threshold: threshold,
        }
    }

    #[test]
    fn test_warning_fires_only_on_crossing() {
        let b = budget(100.0, 80);
        let first = check_after_adding(&b, 75.0, 85.0);
        assert_eq!(first.len(), 1);
        assert!(matches!(first[0], StoreNotification::BudgetWarning { .. }));

        // Already over the warning level: nothing more fires.
        let second = check_after_adding(&b, 85.0, 95.0);
        assert!(second.is_empty());
    }

    #[test]
    fn test_exceeded_fires_with_audible_flag() {
        let b = budget(100.0, 80);
        let notifications = check_after_adding(&b, 95.0, 105.0);
        assert_eq!(notifications.len(), 1);
        match &notifications[0] {
            StoreNotification::BudgetExceeded { audible, total, .. } => {
                assert!(*audible);
                assert_eq!(*total, 105.0);
            }
            other => panic!("unexpected notification: {:?}", other),
        }
    }

    #[test]
    fn test_single_add_can_cross_both_thresholds() {
        let b = budget(100.0, 80);
        let notifications = check_after_adding(&b, 70.0, 120.0);
        assert_eq!(notifications.len(), 2);
    }

    #[test]
    fn test_disabled_budget_never_fires() {
        let mut b = budget(100.0, 80);
        b.enabled = false;
        assert!(check_after_adding(&b, 0.0, 1000.0).is_empty());
    }

    #[test]
    fn test_saving_suggestions_pair_against_cheapest() {
        let items = vec![
            item("Leche entera", 1.0, 1),
            item("Leche-Entera", 2.0, 1),
            item("Pan", 0.9, 1),
        ];
        let suggestions = saving_suggestions(&items);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].cheaper.price, 1.0);
        assert_eq!(suggestions[0].expensive.price, 2.0);
        assert!((suggestions[0].percent_savings - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_saving_suggestions_ignore_small_gaps() {
        let items = vec![item("Agua mineral", 1.0, 1), item("Agua Mineral", 1.05, 1)];
        assert!(saving_suggestions(&items).is_empty());
    }

    #[test]
    fn test_priority_items_greedy_by_unit_price() {
        let items = vec![item("Caro", 10.0, 1), item("Barato", 1.0, 3), item("Medio", 4.0, 1)];
        let split = priority_items(&items, 8.0);
        let within: Vec<&str> = split.within_budget.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(within, vec!["Barato", "Medio"]);
        assert_eq!(split.outside_budget.len(), 1);
        assert_eq!(split.outside_budget[0].name, "Caro");
    }
}
