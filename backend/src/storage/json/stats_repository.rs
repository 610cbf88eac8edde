//! Per-item purchase frequency map, stored under the `item_stats` key and
//! keyed by lowercased item name.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::connection::JsonConnection;
use crate::domain::models::ItemPurchaseHistory;
use crate::storage::traits::StatsStorage;

const STATS_KEY: &str = "item_stats";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatsRecord {
    frequency: u32,
    last_bought: String,
}

#[derive(Clone)]
pub struct StatsRepository {
    connection: Arc<JsonConnection>,
}

impl StatsRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl StatsStorage for StatsRepository {
    fn load_stats(&self) -> Result<HashMap<String, ItemPurchaseHistory>> {
        let records: HashMap<String, StatsRecord> = self.connection.load(STATS_KEY)?;
        let mut stats = HashMap::with_capacity(records.len());
        for (name, record) in records {
            match DateTime::parse_from_rfc3339(&record.last_bought) {
                Ok(date) => {
                    stats.insert(
                        name,
                        ItemPurchaseHistory {
                            frequency: record.frequency,
                            last_bought: date.with_timezone(&Utc),
                        },
                    );
                }
                Err(e) => {
                    warn!("Skipping stats for '{}', bad last_bought: {}", name, e);
                }
            }
        }
        Ok(stats)
    }

    fn save_stats(&self, stats: &HashMap<String, ItemPurchaseHistory>) -> Result<()> {
        let records: HashMap<&String, StatsRecord> = stats
            .iter()
            .map(|(name, history)| {
                (
                    name,
                    StatsRecord {
                        frequency: history.frequency,
                        last_bought: history.last_bought.to_rfc3339(),
                    },
                )
            })
            .collect();
        self.connection.save(STATS_KEY, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stats_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        let repo = StatsRepository::new(connection);

        let mut stats = HashMap::new();
        stats.insert(
            "leche".to_string(),
            ItemPurchaseHistory {
                frequency: 4,
                last_bought: Utc::now(),
            },
        );
        repo.save_stats(&stats).unwrap();

        let loaded = repo.load_stats().unwrap();
        assert_eq!(loaded, stats);
    }
}
