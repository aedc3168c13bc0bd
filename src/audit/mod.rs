//! Audit logging for record mutations
//!
//! Every append, delete and restore is written to an append-only log as one
//! JSON object per line (JSONL), alongside the record before and after the
//! change.
//!
//! - `AuditEntry`: a single log entry with timestamp, operation and values
//! - `AuditLogger`: appends entries to the log file and reads them back

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
