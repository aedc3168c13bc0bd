//! Record store backed by a single CSV file
//!
//! Every query reads the whole file and every mutation rewrites it, so both
//! cost O(n) in the number of records. Rewrites are atomic, but there is no
//! cross-process locking: two processes mutating the same file concurrently
//! race and the last writer wins.

use std::path::{Path, PathBuf};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Money, Record, RecordId};

use super::file_io::{read_records, records_to_string, write_records_atomic};

/// Records selected by a date prefix, with their totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The date prefix records were matched against
    pub prefix: String,
    /// Matching records in store order
    pub records: Vec<Record>,
    /// Net sum of all matching amounts
    pub total: Money,
    /// Sum of positive amounts
    pub income: Money,
    /// Magnitude of the sum of negative amounts
    pub spending: Money,
}

impl Summary {
    /// Build a summary from the records matching `prefix`
    ///
    /// Fails with `Validation` if a total does not fit in `Money`.
    pub fn from_records<'a, I>(prefix: &str, records: I) -> ExpenseResult<Self>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let records: Vec<Record> = records
            .into_iter()
            .filter(|r| r.matches_prefix(prefix))
            .cloned()
            .collect();

        let out_of_range = || {
            ExpenseError::Validation(format!(
                "Total of records matching '{}' is out of range",
                prefix
            ))
        };

        let total = Money::checked_sum(records.iter().map(|r| r.amount)).ok_or_else(out_of_range)?;
        let income = Money::checked_sum(
            records
                .iter()
                .filter(|r| r.is_income())
                .map(|r| r.amount),
        )
        .ok_or_else(out_of_range)?;
        let spending = Money::checked_sum(
            records
                .iter()
                .filter(|r| r.is_expense())
                .map(|r| r.amount.abs()),
        )
        .ok_or_else(out_of_range)?;

        Ok(Self {
            prefix: prefix.to_string(),
            records,
            total,
            income,
            spending,
        })
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered record store persisted to one file
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store over the given file; nothing is read or created yet
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create a header-only file if none exists; returns whether one was created
    pub fn ensure_exists(&self) -> ExpenseResult<bool> {
        if self.exists() {
            return Ok(false);
        }
        write_records_atomic(&self.path, &[])?;
        tracing::debug!(path = %self.path.display(), "created record file");
        Ok(true)
    }

    /// Read every record in store order
    pub fn list_all(&self) -> ExpenseResult<Vec<Record>> {
        let records = read_records(&self.path)?;
        tracing::debug!(count = records.len(), "loaded records");
        Ok(records)
    }

    /// Number of records currently stored
    pub fn count(&self) -> ExpenseResult<usize> {
        Ok(self.list_all()?.len())
    }

    /// Find a record by id, along with its current position
    pub fn find(&self, id: RecordId) -> ExpenseResult<Option<(usize, Record)>> {
        Ok(self
            .list_all()?
            .into_iter()
            .enumerate()
            .find(|(_, r)| r.id == id))
    }

    /// Add a record at the end of the store; returns its position
    pub fn append(&self, record: Record) -> ExpenseResult<usize> {
        let mut records = self.list_all()?;
        records.push(record);
        self.save(&records)?;
        Ok(records.len() - 1)
    }

    /// Remove the record at `position`
    ///
    /// Out-of-range positions are a no-op: `None` is returned and the file is
    /// not rewritten.
    pub fn delete_at(&self, position: usize) -> ExpenseResult<Option<Record>> {
        let mut records = self.list_all()?;
        if position >= records.len() {
            tracing::debug!(position, len = records.len(), "delete position out of range");
            return Ok(None);
        }

        let removed = records.remove(position);
        self.save(&records)?;
        Ok(Some(removed))
    }

    /// Remove the record with the given id, if present
    pub fn delete(&self, id: RecordId) -> ExpenseResult<Option<Record>> {
        let mut records = self.list_all()?;
        let Some(position) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let removed = records.remove(position);
        self.save(&records)?;
        Ok(Some(removed))
    }

    /// Summarize records whose `YYYY-MM-DD` date starts with `date_prefix`
    pub fn summarize(&self, date_prefix: &str) -> ExpenseResult<Summary> {
        let records = self.list_all()?;
        Summary::from_records(date_prefix, &records)
    }

    /// Serialize the whole store in the backing file format
    pub fn export(&self) -> ExpenseResult<String> {
        records_to_string(&self.list_all()?)
    }

    /// Replace the whole store contents
    pub fn replace_all(&self, records: &[Record]) -> ExpenseResult<()> {
        self.save(records)
    }

    fn save(&self, records: &[Record]) -> ExpenseResult<()> {
        write_records_atomic(&self.path, records)?;
        tracing::debug!(count = records.len(), path = %self.path.display(), "rewrote record file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::parse_records;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("expenses.csv"));
        (temp_dir, store)
    }

    fn record(date: &str, category: &str, cents: i64) -> Record {
        Record::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category,
            Money::from_cents(cents),
        )
    }

    #[test]
    fn test_empty_store() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.list_all().unwrap().is_empty());
        assert!(!store.exists());
    }

    #[test]
    fn test_ensure_exists_writes_header_once() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.ensure_exists().unwrap());
        assert!(!store.ensure_exists().unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_append_to_empty_store() {
        let (_temp_dir, store) = create_test_store();

        let input = record("2024-03-01", "food", -1250);
        let position = store.append(input.clone()).unwrap();

        assert_eq!(position, 0);
        let all = store.list_all().unwrap();
        assert_eq!(all, vec![input]);
        assert!(all[0].note.is_empty());
    }

    #[test]
    fn test_append_lands_last() {
        let (_temp_dir, store) = create_test_store();
        store.append(record("2024-01-01", "a", -100)).unwrap();
        store.append(record("2023-01-01", "b", -200)).unwrap();

        let newest = record("2022-01-01", "c", 300);
        store.append(newest.clone()).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last(), Some(&newest));
    }

    #[test]
    fn test_delete_at_shifts_positions() {
        let (_temp_dir, store) = create_test_store();
        let a = record("2024-01-01", "a", -100);
        let b = record("2024-01-02", "b", -200);
        let c = record("2024-01-03", "c", -300);
        for r in [&a, &b, &c] {
            store.append(r.clone()).unwrap();
        }

        let removed = store.delete_at(1).unwrap();
        assert_eq!(removed, Some(b));
        assert_eq!(store.list_all().unwrap(), vec![a, c]);
    }

    #[test]
    fn test_delete_at_out_of_range_is_noop() {
        let (_temp_dir, store) = create_test_store();
        store.append(record("2024-01-01", "a", -100)).unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        assert_eq!(store.delete_at(1).unwrap(), None);
        assert_eq!(store.delete_at(usize::MAX).unwrap(), None);

        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_delete_at_on_missing_file_does_not_create_it() {
        let (_temp_dir, store) = create_test_store();
        assert_eq!(store.delete_at(0).unwrap(), None);
        assert!(!store.exists());
    }

    #[test]
    fn test_delete_by_id() {
        let (_temp_dir, store) = create_test_store();
        let a = record("2024-01-01", "a", -100);
        let b = record("2024-01-02", "b", -200);
        store.append(a.clone()).unwrap();
        store.append(b.clone()).unwrap();

        assert_eq!(store.delete(a.id).unwrap(), Some(a.clone()));
        assert_eq!(store.delete(a.id).unwrap(), None);
        assert_eq!(store.list_all().unwrap(), vec![b.clone()]);
        assert_eq!(store.find(b.id).unwrap(), Some((0, b)));
    }

    #[test]
    fn test_ids_survive_reload() {
        let (_temp_dir, store) = create_test_store();
        let a = record("2024-01-01", "a", -100);
        store.append(a.clone()).unwrap();

        let reopened = RecordStore::new(store.path().to_path_buf());
        assert_eq!(reopened.list_all().unwrap()[0].id, a.id);
    }

    #[test]
    fn test_delete_legacy_row_by_listed_id() {
        let (_temp_dir, store) = create_test_store();
        std::fs::write(
            store.path(),
            "date,description,amount\n2024-01-05,coffee,-3.50\n2024-01-06,tea,-2.00\n",
        )
        .unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(store.find(listed[0].id).unwrap(), Some((0, listed[0].clone())));

        let removed = store.delete(listed[0].id).unwrap();
        assert_eq!(removed.map(|r| r.category), Some("coffee".to_string()));

        // The rewrite keeps the id the remaining row was listed with
        assert_eq!(store.list_all().unwrap(), vec![listed[1].clone()]);
    }

    #[test]
    fn test_summarize_by_month_and_year() {
        let (_temp_dir, store) = create_test_store();
        store.append(record("2024-03-01", "food", -1250)).unwrap();
        store.append(record("2024-04-01", "rent", -2000)).unwrap();

        let year = store.summarize("2024").unwrap();
        assert_eq!(year.total, Money::from_cents(-3250));
        assert_eq!(year.count(), 2);

        let march = store.summarize("2024-03").unwrap();
        assert_eq!(march.total, Money::from_cents(-1250));
        assert_eq!(march.count(), 1);

        assert!(store.summarize("2025").unwrap().is_empty());
    }

    #[test]
    fn test_summary_total_is_sum_of_matching_amounts() {
        let (_temp_dir, store) = create_test_store();
        let amounts = [-1250, 4000, -75, -999, 12];
        for (i, cents) in amounts.iter().enumerate() {
            store
                .append(record(&format!("2024-01-{:02}", i + 1), "x", *cents))
                .unwrap();
        }
        store.append(record("2024-02-01", "x", -100000)).unwrap();

        let summary = store.summarize("2024-01").unwrap();
        assert_eq!(summary.total.cents(), amounts.iter().sum::<i64>());
        assert_eq!(summary.income, Money::from_cents(4012));
        assert_eq!(summary.spending, Money::from_cents(2324));
    }

    #[test]
    fn test_summary_overflow_is_an_error() {
        let records = vec![
            record("2024-01-01", "x", i64::MIN + 1),
            record("2024-02-01", "y", i64::MIN + 1),
        ];

        let err = Summary::from_records("2024", &records).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            Summary::from_records("2024-01", &records).unwrap().total,
            Money::from_cents(i64::MIN + 1)
        );
    }

    #[test]
    fn test_oversized_amount_never_reaches_the_file() {
        let (_temp_dir, store) = create_test_store();
        std::fs::write(
            store.path(),
            "date,category,amount\n2024-01-01,x,-90000000000000000\n",
        )
        .unwrap();

        let err = store.list_all().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_export_round_trip() {
        let (_temp_dir, store) = create_test_store();
        store
            .append(record("2024-03-01", "food, drinks", -1250).with_note("multi\nline"))
            .unwrap();
        store.append(record("2024-03-05", "salary", 300000)).unwrap();

        let exported = store.export().unwrap();
        let reparsed = parse_records(exported.as_bytes()).unwrap();
        assert_eq!(reparsed, store.list_all().unwrap());
    }

    #[test]
    fn test_replace_all() {
        let (_temp_dir, store) = create_test_store();
        store.append(record("2024-03-01", "food", -1250)).unwrap();

        let replacement = vec![record("2020-01-01", "old", -1)];
        store.replace_all(&replacement).unwrap();
        assert_eq!(store.list_all().unwrap(), replacement);
    }
}
