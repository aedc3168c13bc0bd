//! Expense service
//!
//! Turns raw user input into records, enforces budget limits and writes an
//! audit entry for every change it makes to the store.

use chrono::NaiveDate;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{parse_date, BudgetLimits, Money, Record, RecordId, SummaryPeriod};
use crate::storage::{Storage, Summary};

use super::budget::check_budget;

/// Unvalidated input for a new record, as typed by the user
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    /// `YYYY-MM-DD`; today when absent or blank
    pub date: Option<String>,
    pub category: String,
    pub amount: String,
    pub note: String,
}

impl NewRecord {
    pub fn new(category: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Validate the input into a record dated `today` when no date was given
    pub fn into_record(self, today: NaiveDate) -> ExpenseResult<Record> {
        let amount = Money::parse(&self.amount)
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => parse_date(raw).ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Invalid date '{}'. Use YYYY-MM-DD",
                    raw
                ))
            })?,
        };

        Ok(Record::new(date, self.category.trim(), amount).with_note(self.note.trim()))
    }
}

/// Service for record management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and append a new record
    ///
    /// Fails with `Validation` for a bad amount or date and with
    /// `BudgetExceeded` when the record would overrun a limit; the store is
    /// left unchanged in both cases.
    pub fn create(&self, input: NewRecord, limits: &BudgetLimits) -> ExpenseResult<Record> {
        let record = input.into_record(chrono::Local::now().date_naive())?;

        let existing = self.storage.records.list_all()?;
        check_budget(&existing, &record, limits)?;

        self.storage.records.append(record.clone())?;
        self.storage.log_create(&record)?;

        tracing::info!(id = %record.id.short(), amount = %record.amount, "added record");
        Ok(record)
    }

    /// All records in store order
    pub fn list(&self) -> ExpenseResult<Vec<Record>> {
        self.storage.records.list_all()
    }

    /// Look up a record by id, with its current position
    pub fn get(&self, id: RecordId) -> ExpenseResult<Option<(usize, Record)>> {
        self.storage.records.find(id)
    }

    /// Resolve a full id or the short `rec-xxxxxxxx` form shown in tables
    pub fn resolve_id(&self, identifier: &str) -> ExpenseResult<RecordId> {
        if let Ok(id) = identifier.parse::<RecordId>() {
            return Ok(id);
        }

        let needle = identifier.trim();
        let needle = needle.strip_prefix("rec-").unwrap_or(needle).to_ascii_lowercase();
        if needle.len() < 4 {
            return Err(ExpenseError::Validation(format!(
                "Record id '{}' is too short",
                identifier
            )));
        }

        let mut matches = self
            .list()?
            .into_iter()
            .filter(|r| r.id.to_string().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record.id),
            (None, _) => Err(ExpenseError::record_not_found(identifier)),
            (Some(_), Some(_)) => Err(ExpenseError::Validation(format!(
                "Record id '{}' is ambiguous",
                identifier
            ))),
        }
    }

    /// Delete by zero-based position; out-of-range positions change nothing
    pub fn delete_at(&self, position: usize) -> ExpenseResult<Option<Record>> {
        let removed = self.storage.records.delete_at(position)?;
        if let Some(record) = &removed {
            self.storage.log_delete(record)?;
            tracing::info!(position, id = %record.id.short(), "deleted record");
        }
        Ok(removed)
    }

    /// Delete by stable id
    pub fn delete(&self, id: RecordId) -> ExpenseResult<Record> {
        let record = self
            .storage
            .records
            .delete(id)?
            .ok_or_else(|| ExpenseError::record_not_found(id.to_string()))?;

        self.storage.log_delete(&record)?;
        tracing::info!(id = %record.id.short(), "deleted record");
        Ok(record)
    }

    /// Summarize one month or year
    pub fn summary(&self, period: &SummaryPeriod) -> ExpenseResult<Summary> {
        self.summarize(&period.prefix())
    }

    /// Summarize every record whose date starts with `prefix`
    pub fn summarize(&self, prefix: &str) -> ExpenseResult<Summary> {
        self.storage.records.summarize(prefix)
    }
}
