//! Storage layer for the expense tracker
//!
//! A CSV record file with atomic rewrites, plus the audit log that records
//! every mutation made through this layer.

pub mod file_io;
pub mod records;

pub use file_io::{parse_records, read_records, records_to_string, write_records_atomic};
pub use records::{RecordStore, Summary};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::TrackerPaths;
use crate::error::ExpenseResult;
use crate::models::Record;

/// Storage coordinator holding the record store and the audit log
#[derive(Debug, Clone)]
pub struct Storage {
    paths: TrackerPaths,
    pub records: RecordStore,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating its directories
    pub fn new(paths: TrackerPaths) -> ExpenseResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            records: RecordStore::new(paths.records_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Audit an appended record
    pub fn log_create(&self, record: &Record) -> ExpenseResult<()> {
        self.audit.log(&AuditEntry::create(record))
    }

    /// Audit a removed record
    pub fn log_delete(&self, record: &Record) -> ExpenseResult<()> {
        self.audit.log(&AuditEntry::delete(record))
    }

    /// Audit a restore from the named backup
    pub fn log_restore(&self, backup_name: &str, record_count: usize) -> ExpenseResult<()> {
        self.audit.log(&AuditEntry::restore(backup_name, record_count))
    }

    /// Check if the tracker has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}
