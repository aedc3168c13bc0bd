//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A record was appended
    Create,
    /// A record was removed
    Delete,
    /// The whole store was replaced from a backup
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// ID of the affected record; absent for whole-store operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    /// Human-readable description (record summary or backup name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The record before the operation (deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// The record after the operation (creates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Entry for an appended record
    pub fn create(record: &Record) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            record_id: Some(record.id.to_string()),
            description: Some(record.to_string()),
            before: None,
            after: serde_json::to_value(record).ok(),
        }
    }

    /// Entry for a removed record
    pub fn delete(record: &Record) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            record_id: Some(record.id.to_string()),
            description: Some(record.to_string()),
            before: serde_json::to_value(record).ok(),
            after: None,
        }
    }

    /// Entry for a store restored from the named backup
    pub fn restore(backup_name: impl Into<String>, record_count: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Restore,
            record_id: None,
            description: Some(format!(
                "{} ({} records)",
                backup_name.into(),
                record_count
            )),
            before: None,
            after: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation
        );

        if let Some(id) = &self.record_id {
            output.push_str(&format!(" {}", id));
        }

        if let Some(description) = &self.description {
            output.push_str(&format!(" ({})", description));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn sample_record() -> Record {
        Record::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "food",
            Money::from_cents(-1250),
        )
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(Operation::Restore.to_string(), "RESTORE");
    }

    #[test]
    fn test_create_entry() {
        let record = sample_record();
        let entry = AuditEntry::create(&record);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.record_id, Some(record.id.to_string()));
        assert!(entry.before.is_none());
        assert_eq!(entry.after.as_ref().unwrap()["category"], "food");
    }

    #[test]
    fn test_delete_entry() {
        let entry = AuditEntry::delete(&sample_record());

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_restore_entry() {
        let entry = AuditEntry::restore("expenses_backup_20240301_120000_000.csv", 4);
        assert!(entry.record_id.is_none());
        assert_eq!(
            entry.description.as_deref(),
            Some("expenses_backup_20240301_120000_000.csv (4 records)")
        );
    }

    #[test]
    fn test_human_readable_format() {
        let record = sample_record();
        let formatted = AuditEntry::create(&record).format_human_readable();

        assert!(formatted.contains("CREATE"));
        assert!(formatted.contains(&record.id.to_string()));
        assert!(formatted.contains("(2024-03-01 food -$12.50)"));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let entry = AuditEntry::restore("b.csv", 0);
        let json = serde_json::to_string(&entry).unwrap();

        assert!(json.contains("\"operation\":\"restore\""));
        assert!(!json.contains("record_id"));
        assert!(!json.contains("before"));
    }
}
