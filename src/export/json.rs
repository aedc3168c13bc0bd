//! JSON export
//!
//! Exports every record together with versioning and summary metadata.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Money, Record};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All records in store order
    pub records: Vec<Record>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub record_count: usize,

    /// Net sum of all amounts
    pub total: Money,

    /// Date range of records
    pub earliest_record: Option<String>,
    pub latest_record: Option<String>,
}

impl FullExport {
    /// Build the document from the current store contents
    pub fn from_storage(storage: &Storage) -> ExpenseResult<Self> {
        Ok(Self::from_records(storage.records.list_all()?))
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let metadata = ExportMetadata {
            record_count: records.len(),
            total: records.iter().map(|r| r.amount).sum(),
            earliest_record: records.iter().map(|r| r.date).min().map(|d| d.to_string()),
            latest_record: records.iter().map(|r| r.date).max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            records,
            metadata,
        }
    }
}

/// Export every record as a JSON document
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> ExpenseResult<usize> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| ExpenseError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))?;

    Ok(export.metadata.record_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn record(date: &str, cents: i64) -> Record {
        Record::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            "misc",
            Money::from_cents(cents),
        )
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        storage.records.append(record("2024-04-01", -2000)).unwrap();
        storage.records.append(record("2024-03-01", -1250)).unwrap();

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.records.len(), 2);
        assert_eq!(export.metadata.total, Money::from_cents(-3250));
        assert_eq!(export.metadata.earliest_record.as_deref(), Some("2024-03-01"));
        assert_eq!(export.metadata.latest_record.as_deref(), Some("2024-04-01"));
    }

    #[test]
    fn test_json_round_trip() {
        let (_temp_dir, storage) = create_test_storage();
        storage.records.append(record("2024-03-01", -1250)).unwrap();

        let mut buffer = Vec::new();
        export_full_json(&storage, &mut buffer, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.records, storage.records.list_all().unwrap());
        assert_eq!(parsed.metadata.record_count, 1);
    }

    #[test]
    fn test_empty_export() {
        let (_temp_dir, storage) = create_test_storage();

        let export = FullExport::from_storage(&storage).unwrap();
        assert!(export.records.is_empty());
        assert!(export.metadata.earliest_record.is_none());
        assert_eq!(export.metadata.total, Money::zero());
    }
}
