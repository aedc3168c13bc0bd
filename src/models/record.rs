//! Record model
//!
//! One expense or income entry. Negative amounts are outflows (expenses),
//! positive amounts are inflows (income).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecordId;
use super::money::Money;

/// Date format used everywhere a record date is read or written
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single expense or income entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier assigned at creation
    pub id: RecordId,

    /// Calendar date of the entry
    pub date: NaiveDate,

    /// Category or description (free text)
    pub category: String,

    /// Signed amount (negative for expenses)
    pub amount: Money,

    /// Optional note
    #[serde(default)]
    pub note: String,
}

impl Record {
    /// Create a new record with a fresh id and an empty note
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: Money) -> Self {
        Self {
            id: RecordId::new(),
            date,
            category: category.into(),
            amount,
            note: String::new(),
        }
    }

    /// Builder-style note setter
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// The date rendered as `YYYY-MM-DD`, the form date prefixes match against
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Check whether the record's date string starts with the given prefix
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.date_string().starts_with(prefix)
    }

    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date_string(), self.category, self.amount)?;
        if !self.note.is_empty() {
            write!(f, " ({})", self.note)?;
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date, rejecting impossible calendar dates
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}
