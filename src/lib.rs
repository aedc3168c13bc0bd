//! Expense Tracker - flat-file personal expense tracking
//!
//! Dated money records kept in one CSV file, with budget limits, monthly and
//! yearly summaries, exports, backups, an audit trail and an optional
//! password gate. The same store is driven from the command line, an
//! interactive menu, or a small web form.
//!
//! # Architecture
//!
//! - `config`: path resolution and persisted settings
//! - `error`: the crate-wide error type
//! - `models`: records, money, periods and budget limits
//! - `storage`: the CSV record store and the storage coordinator
//! - `services`: record operations with budget enforcement
//! - `audit`: append-only log of every mutation
//! - `backup`: timestamped copies of the data file and restores
//! - `auth`: password hashing, the gate and session timeouts
//! - `export`: CSV, JSON and YAML exports
//! - `display`: terminal tables and summaries
//! - `cli`: subcommand handlers and the interactive menu
//! - `web`: the axum web surface
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{TrackerPaths, Settings};
//! use expense_tracker::services::{ExpenseService, NewRecord};
//! use expense_tracker::storage::Storage;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! ExpenseService::new(&storage).create(NewRecord::new("food", "-12.50"), &settings.budget)?;
//! ```

use std::sync::Once;

pub mod audit;
pub mod auth;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;
pub mod web;

pub use error::{ExpenseError, ExpenseResult};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` overrides the default of warnings only.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("expense_tracker=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
