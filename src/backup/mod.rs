//! Backup system for the expense tracker
//!
//! - `BackupManager`: copies the record file into the backup directory, lists
//!   backups and enforces the retention count
//! - `RestoreManager`: validates a backup and swaps it in as the record file
//!
//! # Backup Format
//!
//! A backup is a byte-for-byte copy of the record file named
//! `expenses_backup_YYYYMMDD_HHMMSS_mmm.csv` (UTC). The timestamp in the name
//! is what listing and retention sort by.

mod manager;
mod restore;

pub use manager::{BackupInfo, BackupManager, BACKUP_PREFIX};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
