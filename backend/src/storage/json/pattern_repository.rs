//! Forgotten-item pattern table, stored whole under the `patterns` key so the
//! per-pattern throttle timestamps survive restarts.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::connection::JsonConnection;
use crate::domain::models::ShoppingPattern;
use crate::storage::traits::PatternStorage;

const PATTERNS_KEY: &str = "patterns";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PatternRecord {
    trigger: Vec<String>,
    suggestion: String,
    last_shown: Option<String>,
}

impl From<&ShoppingPattern> for PatternRecord {
    fn from(pattern: &ShoppingPattern) -> Self {
        PatternRecord {
            trigger: pattern.trigger.clone(),
            suggestion: pattern.suggestion.clone(),
            last_shown: pattern.last_shown.map(|d| d.to_rfc3339()),
        }
    }
}

impl From<PatternRecord> for ShoppingPattern {
    fn from(record: PatternRecord) -> Self {
        // An unparseable throttle timestamp just resets the throttle.
        let last_shown = record.last_shown.as_deref().and_then(|raw| {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(date) => Some(date.with_timezone(&Utc)),
                Err(e) => {
                    warn!("Invalid pattern last_shown '{}': {}", raw, e);
                    None
                }
            }
        });
        ShoppingPattern {
            trigger: record.trigger,
            suggestion: record.suggestion,
            last_shown,
        }
    }
}

#[derive(Clone)]
pub struct PatternRepository {
    connection: Arc<JsonConnection>,
}

impl PatternRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl PatternStorage for PatternRepository {
    fn load_patterns(&self) -> Result<Vec<ShoppingPattern>> {
        let records: Vec<PatternRecord> = self.connection.load(PATTERNS_KEY)?;
        Ok(records.into_iter().map(ShoppingPattern::from).collect())
    }

    fn save_patterns(&self, patterns: &[ShoppingPattern]) -> Result<()> {
        let records: Vec<PatternRecord> = patterns.iter().map(PatternRecord::from).collect();
        self.connection.save(PATTERNS_KEY, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::default_patterns;
    use tempfile::TempDir;

    #[test]
    fn test_patterns_round_trip_with_throttle() {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        let repo = PatternRepository::new(connection);

        let mut patterns = default_patterns();
        patterns[0].last_shown = Some(Utc::now());
        repo.save_patterns(&patterns).unwrap();

        let loaded = repo.load_patterns().unwrap();
        assert_eq!(loaded.len(), patterns.len());
        assert_eq!(loaded[0].last_shown, patterns[0].last_shown);
        assert!(loaded[1].last_shown.is_none());
    }
}
