//! Summary period representation
//!
//! A period is either a calendar month ("2025-01") or a calendar year
//! ("2025"). Both render to the date prefix used to select records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExpenseError;

/// A month or a year that records can be summarized over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum SummaryPeriod {
    /// Calendar month (e.g., "2025-01")
    Month { year: i32, month: u32 },

    /// Calendar year (e.g., "2025")
    Year(i32),
}

impl SummaryPeriod {
    /// Create a monthly period, validating the month number
    pub fn month(year: i32, month: u32) -> Option<Self> {
        (1..=12)
            .contains(&month)
            .then_some(Self::Month { year, month })
    }

    pub fn year(year: i32) -> Self {
        Self::Year(year)
    }

    /// The month containing the given date
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year containing the given date
    pub fn year_of(date: NaiveDate) -> Self {
        Self::Year(date.year())
    }

    /// Get the current monthly period
    pub fn current_month() -> Self {
        Self::month_of(chrono::Local::now().date_naive())
    }

    /// Get the current yearly period
    pub fn current_year() -> Self {
        Self::year_of(chrono::Local::now().date_naive())
    }

    /// Date-string prefix selecting the records of this period
    pub fn prefix(&self) -> String {
        match self {
            Self::Month { year, month } => format!("{:04}-{:02}", year, month),
            Self::Year(year) => format!("{:04}", year),
        }
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::Month { year, month } => date.year() == *year && date.month() == *month,
            Self::Year(year) => date.year() == *year,
        }
    }

    /// "Monthly" or "Yearly", used in budget messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Month { .. } => "Monthly",
            Self::Year(_) => "Yearly",
        }
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl FromStr for SummaryPeriod {
    type Err = ExpenseError;

    /// Parse "YYYY-MM" into a month or "YYYY" into a year
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || {
            ExpenseError::Validation(format!(
                "Invalid period '{}'. Use YYYY-MM for a month or YYYY for a year",
                s
            ))
        };

        let parse_year = |y: &str| -> Result<i32, ExpenseError> {
            if y.len() != 4 || !y.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            y.parse().map_err(|_| invalid())
        };

        match s.split_once('-') {
            Some((y, m)) => {
                if m.len() != 2 || !m.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let year = parse_year(y)?;
                let month: u32 = m.parse().map_err(|_| invalid())?;
                Self::month(year, month).ok_or_else(invalid)
            }
            None => Ok(Self::Year(parse_year(s)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix() {
        assert_eq!(SummaryPeriod::month(2025, 1).unwrap().prefix(), "2025-01");
        assert_eq!(SummaryPeriod::year(2025).prefix(), "2025");
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "2024-03".parse::<SummaryPeriod>().unwrap(),
            SummaryPeriod::Month { year: 2024, month: 3 }
        );
        assert_eq!("2024".parse::<SummaryPeriod>().unwrap(), SummaryPeriod::Year(2024));
    }

    #[test]
    fn test_parse_invalid() {
        for input in ["2024-13", "2024-3", "24", "2024-03-01", "march", ""] {
            let err = input.parse::<SummaryPeriod>().unwrap_err();
            assert!(err.is_validation(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_contains() {
        let march = SummaryPeriod::month(2024, 3).unwrap();
        assert!(march.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!march.contains(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
        assert!(SummaryPeriod::year(2024).contains(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
    }

    #[test]
    fn test_month_of() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 27).unwrap();
        assert_eq!(SummaryPeriod::month_of(date).prefix(), "2025-11");
        assert_eq!(SummaryPeriod::year_of(date).prefix(), "2025");
    }
}
