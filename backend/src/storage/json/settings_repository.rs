//! Application settings: language, theme, the first-launch flag and the last
//! active list date (drives the day-boundary rollover). One document under
//! the `settings` key.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::connection::JsonConnection;

const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// UI language code ("en" or "es").
    pub language: String,
    pub theme: String,
    /// Set once the first launch has seeded the default pattern table.
    pub first_launch_done: bool,
    /// Calendar date the item collection was last touched on.
    pub last_active_date: Option<NaiveDate>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            theme: "light".to_string(),
            first_launch_done: false,
            last_active_date: None,
        }
    }
}

/// Storage trait for application settings.
pub trait SettingsStorage: Send + Sync {
    fn load_settings(&self) -> Result<AppSettings>;
    fn save_settings(&self, settings: &AppSettings) -> Result<()>;
}

#[derive(Clone)]
pub struct SettingsRepository {
    connection: Arc<JsonConnection>,
}

impl SettingsRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl SettingsStorage for SettingsRepository {
    fn load_settings(&self) -> Result<AppSettings> {
        self.connection.load(SETTINGS_KEY)
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.connection.save(SETTINGS_KEY, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        let repo = SettingsRepository::new(connection);

        assert_eq!(repo.load_settings().unwrap(), AppSettings::default());

        let settings = AppSettings {
            language: "es".to_string(),
            theme: "dark".to_string(),
            first_launch_done: true,
            last_active_date: NaiveDate::from_ymd_opt(2025, 6, 1),
        };
        repo.save_settings(&settings).unwrap();
        assert_eq!(repo.load_settings().unwrap(), settings);
    }
}
