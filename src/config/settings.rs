//! User settings for the expense tracker
//!
//! Budget limits, the password hash, session timeout, backup retention and
//! the web server address. Every field has a default so older or partial
//! settings files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::TrackerPaths;
use crate::error::ExpenseError;
use crate::models::BudgetLimits;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Spending limits enforced when adding records
    #[serde(default)]
    pub budget: BudgetLimits,

    /// Argon2 PHC hash of the access password, if one is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Minutes of menu inactivity before the password is asked again
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: u64,

    /// Number of backups to keep when pruning
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,

    /// Address the web surface listens on
    #[serde(default = "default_server_addr")]
    pub server_addr: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_session_timeout() -> u64 {
    30
}

fn default_backup_retention() -> usize {
    30
}

fn default_server_addr() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            budget: BudgetLimits::default(),
            password_hash: None,
            session_timeout_minutes: default_session_timeout(),
            backup_retention: default_backup_retention(),
            server_addr: default_server_addr(),
        }
    }
}

impl Settings {
    /// Check whether the password gate is active
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TrackerPaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| ExpenseError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ExpenseError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            if settings.backup_retention == 0 {
                return Err(ExpenseError::Config(
                    "backup_retention must be at least 1".into(),
                ));
            }

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrackerPaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ExpenseError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ExpenseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
