//! Configuration management for rollbook.
//!
//! Configuration is layered with figment: built-in defaults, then an optional
//! TOML file, then `ROLLBOOK_` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rollbook";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "slots.db";

/// Slot the record list is stored under.
pub const DEFAULT_SLOT_KEY: &str = "students";

/// Application configuration.
///
/// Sources, highest precedence first:
/// 1. Environment variables (`ROLLBOOK_STORAGE__SLOT_KEY=...`)
/// 2. TOML config file at `~/.config/rollbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Notification timing.
    pub notifications: NotificationConfig,
    /// Table display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the slot database.
    /// Defaults to `~/.local/share/rollbook/slots.db`
    pub database_path: Option<PathBuf>,
    /// Name of the slot holding the serialized record list.
    pub slot_key: String,
}

/// Notification lifecycle timing, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Delay between insertion and the appear transition.
    pub appear_delay_ms: u64,
    /// How long a notification stays fully visible.
    pub display_ms: u64,
    /// Length of the hide transition before removal.
    pub hide_transition_ms: u64,
}

/// Table display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows that fit in the scrollable container before it overflows.
    pub visible_rows: usize,
    /// Ask before deleting a record.
    pub confirm_deletes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            appear_delay_ms: 10,
            display_ms: 3000,
            hide_transition_ms: 300,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            visible_rows: 10,
            confirm_deletes: true,
        }
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ROLLBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.slot_key must not be empty".to_string(),
            });
        }

        if self.notifications.display_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "notifications.display_ms must be greater than 0".to_string(),
            });
        }

        if self.display.visible_rows == 0 {
            return Err(Error::ConfigValidation {
                message: "display.visible_rows must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

impl NotificationConfig {
    /// Delay before a new notification becomes visible.
    #[must_use]
    pub fn appear_delay(&self) -> Duration {
        Duration::from_millis(self.appear_delay_ms)
    }

    /// Time a notification stays visible.
    #[must_use]
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    /// Length of the hide transition.
    #[must_use]
    pub fn hide_transition(&self) -> Duration {
        Duration::from_millis(self.hide_transition_ms)
    }
}
