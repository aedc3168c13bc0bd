//! Display formatting for terminal output
//!
//! Every function returns a `String`; callers decide where it goes.

pub mod record;
pub mod summary;

pub use record::{format_record_details, format_record_table, truncate};
pub use summary::{format_budget_usage, format_summary};
