//! Derived views over the item collection. All functions here are pure and
//! recomputed on demand; nothing is cached.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::models::{ShoppingItem, UNCATEGORIZED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Lexicographic on the lowercased name.
    Name,
    /// Ascending by price*quantity.
    PriceAsc,
    /// Descending by price*quantity.
    PriceDesc,
    /// Lexicographic on the category; uncategorized sorts as the empty string.
    Category,
    /// Newest first; phantom rows always sort last regardless of timestamp.
    Date,
}

pub fn sorted_items(items: &[ShoppingItem], order: SortOrder) -> Vec<ShoppingItem> {
    let mut sorted = items.to_vec();
    match order {
        SortOrder::Name => {
            sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortOrder::PriceAsc => {
            sorted.sort_by(|a, b| a.line_total().total_cmp(&b.line_total()));
        }
        SortOrder::PriceDesc => {
            sorted.sort_by(|a, b| b.line_total().total_cmp(&a.line_total()));
        }
        SortOrder::Category => {
            sorted.sort_by(|a, b| category_sort_key(a).cmp(&category_sort_key(b)));
        }
        SortOrder::Date => {
            sorted.sort_by(|a, b| match (a.phantom, b.phantom) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => b.date.cmp(&a.date),
            });
        }
    }
    sorted
}

fn category_sort_key(item: &ShoppingItem) -> String {
    if item.category == UNCATEGORIZED {
        String::new()
    } else {
        item.category.to_lowercase()
    }
}

pub fn phantom_items(items: &[ShoppingItem]) -> Vec<ShoppingItem> {
    items.iter().filter(|i| i.phantom).cloned().collect()
}

pub fn regular_items(items: &[ShoppingItem]) -> Vec<ShoppingItem> {
    items.iter().filter(|i| !i.phantom).cloned().collect()
}

/// Group non-phantom items by category; unclassified items land under the
/// uncategorized sentinel key.
pub fn items_by_category(items: &[ShoppingItem]) -> BTreeMap<String, Vec<ShoppingItem>> {
    let mut groups: BTreeMap<String, Vec<ShoppingItem>> = BTreeMap::new();
    for item in items.iter().filter(|i| !i.phantom) {
        groups
            .entry(item.category.clone())
            .or_default()
            .push(item.clone());
    }
    groups
}

/// Sum of price*quantity over non-completed, non-phantom items.
pub fn calculate_total(items: &[ShoppingItem]) -> f64 {
    items
        .iter()
        .filter(|i| !i.phantom && !i.completed)
        .map(|i| i.line_total())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(name: &str, price: f64, quantity: u32) -> ShoppingItem {
        ShoppingItem::new(name, price, quantity, None, Utc::now())
    }

    #[test]
    fn test_total_skips_completed_and_phantom() {
        let now = Utc::now();
        let mut done = item("Pan", 0.9, 1);
        done.completed = true;
        let items = vec![
            ShoppingItem::phantom("1", now),
            item("Leche", 1.5, 2),
            done,
        ];
        assert!((calculate_total(&items) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let items = vec![item("pan", 1.0, 1), item("Agua", 1.0, 1), item("Leche", 1.0, 1)];
        let sorted = sorted_items(&items, SortOrder::Name);
        let names: Vec<&str> = sorted.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Agua", "Leche", "pan"]);
    }

    #[test]
    fn test_sort_by_price_uses_line_total() {
        // 2x1.00 sorts above 1x1.50 ascending
        let items = vec![item("A", 1.0, 2), item("B", 1.5, 1)];
        let asc = sorted_items(&items, SortOrder::PriceAsc);
        assert_eq!(asc[0].name, "B");
        let desc = sorted_items(&items, SortOrder::PriceDesc);
        assert_eq!(desc[0].name, "A");
    }

    #[test]
    fn test_date_sort_puts_phantoms_last() {
        let now = Utc::now();
        // Phantom with the newest timestamp must still sort after regular rows.
        let phantom = ShoppingItem::phantom("1", now + Duration::days(1));
        let old = ShoppingItem::new("Old", 1.0, 1, None, now - Duration::days(2));
        let new = ShoppingItem::new("New", 1.0, 1, None, now);
        let sorted = sorted_items(&[phantom, old, new], SortOrder::Date);
        assert_eq!(sorted[0].name, "New");
        assert_eq!(sorted[1].name, "Old");
        assert!(sorted[2].phantom);
    }

    #[test]
    fn test_uncategorized_sorts_first_in_category_order() {
        let mut fruit = item("Manzana", 1.0, 1);
        fruit.category = "fruta".to_string();
        let plain = item("Cosa", 1.0, 1);
        let sorted = sorted_items(&[fruit, plain], SortOrder::Category);
        assert_eq!(sorted[0].name, "Cosa");
    }

    #[test]
    fn test_items_by_category_excludes_phantoms() {
        let now = Utc::now();
        let mut fruit = item("Manzana", 1.0, 1);
        fruit.category = "fruta".to_string();
        let items = vec![ShoppingItem::phantom("1", now), fruit, item("Cosa", 1.0, 1)];
        let groups = items_by_category(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["fruta"].len(), 1);
        assert_eq!(groups[UNCATEGORIZED].len(), 1);
    }
}
