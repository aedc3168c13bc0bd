//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Handlers print to
//! stdout; errors propagate to `main`, which exits non-zero.

pub mod backup;
pub mod export;
pub mod history;
pub mod menu;
pub mod password;
pub mod record;
pub mod summary;

pub use backup::{handle_backup_command, BackupCommands};
pub use export::{handle_export, ExportArgs, ExportFormat};
pub use history::handle_history;
pub use menu::Menu;
pub use password::{handle_password_command, PasswordCommands};
pub use record::{
    handle_add, handle_delete, handle_list, handle_show, AddArgs, DeleteArgs, ListArgs, ShowArgs,
};
pub use summary::{handle_summary_command, SummaryCommands};
