//! Backup restoration
//!
//! A backup is parsed in full before anything is touched, so a corrupt backup
//! never replaces good data. The current record file is backed up first.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::ExpenseResult;
use crate::models::Record;
use crate::storage::{read_records, Storage};

use super::manager::BackupManager;

/// Handles restoring from backups
pub struct RestoreManager<'a> {
    storage: &'a Storage,
    backups: &'a BackupManager,
}

impl<'a> RestoreManager<'a> {
    pub fn new(storage: &'a Storage, backups: &'a BackupManager) -> Self {
        Self { storage, backups }
    }

    /// Replace the record file with the contents of a backup
    pub fn restore_from_file(&self, backup_path: &Path) -> ExpenseResult<RestoreResult> {
        let records = read_records(backup_path)?;

        let pre_restore_backup = if self.storage.records.exists() {
            Some(self.backups.create_backup()?)
        } else {
            None
        };

        self.storage.records.replace_all(&records)?;

        let backup_name = backup_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| backup_path.display().to_string());
        self.storage.log_restore(&backup_name, records.len())?;

        tracing::info!(backup = %backup_name, count = records.len(), "restored backup");

        Ok(RestoreResult {
            backup_name,
            record_count: records.len(),
            pre_restore_backup,
        })
    }

    /// Parse a backup without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> ExpenseResult<ValidationResult> {
        let records = read_records(backup_path)?;
        Ok(ValidationResult::from_records(&records))
    }
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// File name of the restored backup
    pub backup_name: String,
    /// Number of records now in the store
    pub record_count: usize,
    /// Backup of the data that was replaced, if there was any
    pub pre_restore_backup: Option<PathBuf>,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} record(s) from {}",
            self.record_count, self.backup_name
        );
        if let Some(path) = &self.pre_restore_backup {
            summary.push_str(&format!("\nPrevious data saved to {}", path.display()));
        }
        summary
    }
}

/// Result of validating a backup
#[derive(Debug, PartialEq, Eq)]
pub struct ValidationResult {
    pub record_count: usize,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl ValidationResult {
    fn from_records(records: &[Record]) -> Self {
        Self {
            record_count: records.len(),
            earliest: records.iter().map(|r| r.date).min(),
            latest: records.iter().map(|r| r.date).max(),
        }
    }

    pub fn summary(&self) -> String {
        match (self.earliest, self.latest) {
            (Some(earliest), Some(latest)) => format!(
                "{} record(s) from {} to {}",
                self.record_count, earliest, latest
            ),
            _ => "Empty backup".to_string(),
        }
    }
}
