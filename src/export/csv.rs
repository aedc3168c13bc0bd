//! CSV export
//!
//! Identical to the record file, so an export can be dropped in as a data
//! file or restored like a backup.

use std::io::Write;

use crate::error::ExpenseResult;
use crate::storage::{file_io, Storage};

/// Write every record in store order
pub fn export_records_csv<W: Write>(storage: &Storage, writer: &mut W) -> ExpenseResult<usize> {
    let records = storage.records.list_all()?;
    file_io::write_records(writer, &records)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::{Money, Record};
    use crate::storage::parse_records;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_csv_matches_store_export() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(TrackerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage
            .records
            .append(Record::new(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                "food",
                Money::from_cents(-1250),
            ))
            .unwrap();

        let mut buffer = Vec::new();
        let count = export_records_csv(&storage, &mut buffer).unwrap();

        assert_eq!(count, 1);
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), storage.records.export().unwrap());
        assert_eq!(
            parse_records(buffer.as_slice()).unwrap(),
            storage.records.list_all().unwrap()
        );
    }
}
