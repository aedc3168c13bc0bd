//! YAML export
//!
//! The JSON export document, serialized as YAML behind a comment header.

use std::io::Write;

use crate::error::{ExpenseError, ExpenseResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export every record as a YAML document
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> ExpenseResult<usize> {
    let export = FullExport::from_storage(storage)?;
    let export_err = |e: std::io::Error| ExpenseError::Export(e.to_string());

    writeln!(writer, "# Expense tracker export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(&mut *writer, &export).map_err(|e| ExpenseError::Export(e.to_string()))?;

    Ok(export.metadata.record_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::{Money, Record};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage
            .records
            .append(
                Record::new(
                    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    "food",
                    Money::from_cents(-1250),
                )
                .with_note("lunch"),
            )
            .unwrap();

        let mut buffer = Vec::new();
        let count = export_full_yaml(&storage, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(count, 1);
        assert!(text.starts_with("# Expense tracker export"));
        assert!(text.contains("category: food"));
        assert!(text.contains("note: lunch"));

        let parsed: FullExport = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed.records, storage.records.list_all().unwrap());
    }
}
