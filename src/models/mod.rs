//! Core data models for the expense tracker
//!
//! Records, money amounts, summary periods and budget limits.

pub mod budget;
pub mod ids;
pub mod money;
pub mod period;
pub mod record;

pub use budget::BudgetLimits;
pub use ids::RecordId;
pub use money::{Money, MoneyParseError, MAX_AMOUNT_CENTS};
pub use period::SummaryPeriod;
pub use record::{parse_date, Record, DATE_FORMAT};
