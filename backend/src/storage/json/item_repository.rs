//! Items collection, stored whole under the `items` key. Dates serialize as
//! RFC 3339 strings and are reparsed on load; rows that fail to parse are
//! skipped with a warning rather than poisoning the whole collection.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::connection::JsonConnection;
use crate::domain::models::ShoppingItem;
use crate::storage::traits::ItemStorage;

const ITEMS_KEY: &str = "items";

/// Stored shape of a shopping item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ItemRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub completed: bool,
    pub date: String,
    pub category: String,
    pub phantom: bool,
}

impl From<&ShoppingItem> for ItemRecord {
    fn from(item: &ShoppingItem) -> Self {
        ItemRecord {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            completed: item.completed,
            date: item.date.to_rfc3339(),
            category: item.category.clone(),
            phantom: item.phantom,
        }
    }
}

impl TryFrom<ItemRecord> for ShoppingItem {
    type Error = anyhow::Error;

    fn try_from(record: ItemRecord) -> Result<Self> {
        let date = DateTime::parse_from_rfc3339(&record.date)
            .map_err(|e| anyhow::anyhow!("Invalid item date '{}': {}", record.date, e))?
            .with_timezone(&Utc);
        Ok(ShoppingItem {
            id: record.id,
            name: record.name,
            price: record.price,
            quantity: record.quantity,
            completed: record.completed,
            date,
            category: record.category,
            phantom: record.phantom,
        })
    }
}

pub(crate) fn records_from_items(items: &[ShoppingItem]) -> Vec<ItemRecord> {
    items.iter().map(ItemRecord::from).collect()
}

pub(crate) fn items_from_records(records: Vec<ItemRecord>) -> Vec<ShoppingItem> {
    records
        .into_iter()
        .filter_map(|record| match ShoppingItem::try_from(record) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed item record: {}", e);
                None
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct ItemRepository {
    connection: Arc<JsonConnection>,
}

impl ItemRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl ItemStorage for ItemRepository {
    fn load_items(&self) -> Result<Vec<ShoppingItem>> {
        let records: Vec<ItemRecord> = self.connection.load(ITEMS_KEY)?;
        Ok(items_from_records(records))
    }

    fn save_items(&self, items: &[ShoppingItem]) -> Result<()> {
        self.connection.save(ITEMS_KEY, &records_from_items(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (ItemRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        (ItemRepository::new(connection), temp_dir)
    }

    #[test]
    fn test_round_trip_preserves_fields_and_dates() {
        let (repo, _temp_dir) = setup();
        let items = vec![
            ShoppingItem::new("Leche", 1.5, 2, Some("lácteos".to_string()), Utc::now()),
            ShoppingItem::phantom("1", Utc::now()),
        ];
        repo.save_items(&items).unwrap();
        let loaded = repo.load_items().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, items[0].id);
        assert_eq!(loaded[0].price, 1.5);
        assert_eq!(loaded[0].category, "lácteos");
        // RFC 3339 keeps sub-second precision, so dates match exactly.
        assert_eq!(loaded[0].date, items[0].date);
        assert!(loaded[1].phantom);
    }

    #[test]
    fn test_malformed_date_skips_row_only() {
        let (repo, temp_dir) = setup();
        let good = ShoppingItem::new("Pan", 0.9, 1, None, Utc::now());
        let mut records = records_from_items(&[good.clone()]);
        records.push(ItemRecord {
            date: "not-a-date".to_string(),
            ..records[0].clone()
        });
        std::fs::write(
            temp_dir.path().join("items.json"),
            serde_json::to_string(&records).unwrap(),
        )
        .unwrap();

        let loaded = repo.load_items().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, good.id);
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let (repo, _temp_dir) = setup();
        assert!(repo.load_items().unwrap().is_empty());
    }
}
