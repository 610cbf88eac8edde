//! Advisory suggestions: forgotten-item pattern checks and personalized
//! co-purchase suggestions. Nothing here is required for list correctness.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::domain::models::{ItemPurchaseHistory, ShoppingItem, ShoppingPattern};
use crate::domain::notifications::StoreNotification;

/// Minimum gap before the same pattern may fire again.
fn pattern_throttle() -> Duration {
    Duration::hours(1)
}

/// Two purchases closer together than this count as correlated.
fn correlation_window() -> Duration {
    Duration::days(1)
}

/// Match a newly added item name against the pattern table. One suggestion per
/// add at most: the first pattern that matches and is not suppressed wins. A
/// matching pattern is suppressed when its suggestion already sits uncompleted
/// on the list, or when it fired less than an hour ago. The winning pattern's
/// `last_shown` is updated in place; the caller persists the table.
pub fn check_for_forgotten_items(
    new_item_name: &str,
    items: &[ShoppingItem],
    patterns: &mut [ShoppingPattern],
    now: DateTime<Utc>,
) -> Option<StoreNotification> {
    let name_lower = new_item_name.trim().to_lowercase();
    if name_lower.is_empty() {
        return None;
    }

    for pattern in patterns.iter_mut() {
        let matched = pattern
            .trigger
            .iter()
            .any(|keyword| name_lower.contains(&keyword.to_lowercase()));
        if !matched {
            continue;
        }

        let already_listed = items
            .iter()
            .any(|i| !i.completed && i.matches_name(&pattern.suggestion));
        if already_listed {
            debug!(
                "Pattern suggestion '{}' already on the list, skipping",
                pattern.suggestion
            );
            continue;
        }

        if let Some(last_shown) = pattern.last_shown {
            if now - last_shown < pattern_throttle() {
                debug!(
                    "Pattern suggestion '{}' shown recently, skipping",
                    pattern.suggestion
                );
                continue;
            }
        }

        pattern.last_shown = Some(now);
        return Some(StoreNotification::ForgottenItem {
            trigger_item: new_item_name.trim().to_string(),
            suggestion: pattern.suggestion.clone(),
        });
    }
    None
}

/// Look for an item the user habitually buys together with the one just
/// purchased. Candidates need a purchase frequency above 1 and a last-bought
/// timestamp within a day of the reference item's; the most frequently bought
/// candidate wins.
pub fn check_personalized_suggestions(
    new_item_name: &str,
    stats: &HashMap<String, ItemPurchaseHistory>,
) -> Option<String> {
    let key = new_item_name.trim().to_lowercase();
    let reference = stats.get(&key)?;

    let mut best: Option<(&String, &ItemPurchaseHistory)> = None;
    for (name, history) in stats {
        if *name == key || history.frequency <= 1 {
            continue;
        }
        let gap = (history.last_bought - reference.last_bought).abs();
        if gap >= correlation_window() {
            continue;
        }
        if best.map_or(true, |(_, b)| history.frequency > b.frequency) {
            best = Some((name, history));
        }
    }
    best.map(|(name, _)| name.clone())
}
