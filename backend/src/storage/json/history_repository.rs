//! Purchase history, stored whole under the `purchase_history` key,
//! most-recent-first.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::connection::JsonConnection;
use super::item_repository::{items_from_records, records_from_items, ItemRecord};
use crate::domain::models::PurchaseHistoryEntry;
use crate::storage::traits::HistoryStorage;

const HISTORY_KEY: &str = "purchase_history";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistoryRecord {
    id: String,
    date: String,
    items: Vec<ItemRecord>,
    total_amount: f64,
}

impl From<&PurchaseHistoryEntry> for HistoryRecord {
    fn from(entry: &PurchaseHistoryEntry) -> Self {
        HistoryRecord {
            id: entry.id.clone(),
            date: entry.date.to_rfc3339(),
            items: records_from_items(&entry.items),
            total_amount: entry.total_amount,
        }
    }
}

impl TryFrom<HistoryRecord> for PurchaseHistoryEntry {
    type Error = anyhow::Error;

    fn try_from(record: HistoryRecord) -> Result<Self> {
        let date = DateTime::parse_from_rfc3339(&record.date)
            .map_err(|e| anyhow::anyhow!("Invalid history date '{}': {}", record.date, e))?
            .with_timezone(&Utc);
        Ok(PurchaseHistoryEntry {
            id: record.id,
            date,
            items: items_from_records(record.items),
            total_amount: record.total_amount,
        })
    }
}

#[derive(Clone)]
pub struct HistoryRepository {
    connection: Arc<JsonConnection>,
}

impl HistoryRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl HistoryStorage for HistoryRepository {
    fn load_history(&self) -> Result<Vec<PurchaseHistoryEntry>> {
        let records: Vec<HistoryRecord> = self.connection.load(HISTORY_KEY)?;
        Ok(records
            .into_iter()
            .filter_map(|record| match PurchaseHistoryEntry::try_from(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping malformed history record: {}", e);
                    None
                }
            })
            .collect())
    }

    fn save_history(&self, entries: &[PurchaseHistoryEntry]) -> Result<()> {
        let records: Vec<HistoryRecord> = entries.iter().map(HistoryRecord::from).collect();
        self.connection.save(HISTORY_KEY, &records)
    }
}
