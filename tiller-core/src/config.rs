//! Configuration management
//!
//! settings.json format:
//! ```json
//! {
//!   "app": { "databaseFile": "store.duckdb", "lockMode": "wait" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Error, Result};
use crate::services::lock::LockMode;

fn default_database_file() -> String {
    "store.duckdb".to_string()
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_database_file")]
    database_file: String,
    #[serde(default)]
    lock_mode: LockMode,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            lock_mode: LockMode::default(),
            other: HashMap::new(),
        }
    }
}

/// Tiller configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_file: String,
    pub lock_mode: LockMode,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            lock_mode: LockMode::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the tiller directory
    ///
    /// Lock behavior can be overridden via TILLER_LOCK_MODE (for deploy
    /// scripts that prefer failing fast over waiting on a replica).
    pub fn load(tiller_dir: &Path) -> Result<Self> {
        let settings_path = tiller_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let lock_mode = match std::env::var("TILLER_LOCK_MODE").ok().as_deref() {
            Some("wait" | "block") => LockMode::Wait,
            Some("fail" | "nowait") => LockMode::Fail,
            Some(other) => {
                return Err(Error::config(format!(
                    "TILLER_LOCK_MODE must be 'wait' or 'fail', got '{other}'"
                )))
            }
            None => raw.app.lock_mode,
        };

        Ok(Self {
            database_file: raw.app.database_file.clone(),
            lock_mode,
            _raw_settings: raw,
        })
    }

    /// Save config to the tiller directory
    /// Preserves settings that this tool doesn't manage
    pub fn save(&self, tiller_dir: &Path) -> Result<()> {
        let settings_path = tiller_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.database_file = self.database_file.clone();
        settings.app.lock_mode = self.lock_mode;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_defaults_when_settings_missing() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.database_file, "store.duckdb");
        assert_eq!(config.lock_mode, LockMode::Wait);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.database_file = "staging.duckdb".to_string();
        config.lock_mode = LockMode::Fail;
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.database_file, "staging.duckdb");
        assert_eq!(reloaded.lock_mode, LockMode::Fail);
    }

    #[test]
    fn test_unmanaged_settings_survive_save() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"databaseFile": "store.duckdb", "theme": "dark"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(content.contains("theme"));
    }
}
