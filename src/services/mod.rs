//! Service layer for the expense tracker
//!
//! Validation, budget enforcement and auditing on top of the record store.
//! Presentation layers parse input and format output; the rules live here.

pub mod budget;
pub mod expense;

pub use budget::{check_budget, spending_in, BudgetUsage};
pub use expense::{ExpenseService, NewRecord};
