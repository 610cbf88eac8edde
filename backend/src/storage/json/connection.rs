//! JSON key-value connection. Each logical key maps to one JSON document in
//! the base data directory (`items.json`, `budget.json`, ...). Writes go
//! through a temp file and an atomic rename; loads are lenient, falling back
//! to the type's default when the file is missing or malformed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a connection rooted at `base_directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_directory.join(format!("{}.json", key))
    }

    /// Load the document stored under `key`. A missing file or unparseable
    /// content yields the default value instead of an error.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let path = self.key_path(key);
        if !path.exists() {
            debug!("No document for key '{}', using default", key);
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(
                    "Malformed document for key '{}' ({}), falling back to default",
                    key, e
                );
                Ok(T::default())
            }
        }
    }

    /// Overwrite the whole document stored under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key);
        let temp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;
        debug!("Saved document for key '{}'", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_loads_default() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let value: Vec<String> = connection.load("nothing").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let value = vec!["a".to_string(), "b".to_string()];
        connection.save("letters", &value).unwrap();
        let loaded: Vec<String> = connection.load("letters").unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_malformed_document_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();
        let value: Vec<String> = connection.load("broken").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("data").join("lists");
        let connection = JsonConnection::new(&nested).unwrap();
        assert!(nested.exists());
        connection.save("x", &1u32).unwrap();
        assert!(nested.join("x.json").exists());
    }
}
