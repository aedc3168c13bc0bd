//! Backup CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::Settings;
use crate::error::ExpenseResult;
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Copy the data file into the backup directory
    Create,

    /// List all available backups, newest first
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Replace the data file with a backup
    Restore {
        /// Backup filename, path, or 'latest'
        backup: String,

        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },

    /// Delete backups beyond the retention count
    Prune {
        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> ExpenseResult<()> {
    let manager = BackupManager::new(storage.paths(), settings.backup_retention);

    match cmd {
        BackupCommands::Create => {
            let (backup_path, pruned) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", file_name(&backup_path));
            println!("Location: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: expense backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup
                            .created_at
                            .with_timezone(&chrono::Local)
                            .format("%Y-%m-%d %H:%M:%S%.3f"),
                        format_size(backup.size_bytes),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        format_duration(age),
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let restore_manager = RestoreManager::new(storage, &manager);
            let validation = restore_manager.validate_backup(&backup_path)?;

            println!("Backup: {}", backup_path.display());
            println!("Contents: {}", validation.summary());
            println!();

            if !force {
                println!("WARNING: This will replace ALL current records!");
                println!("To proceed, run again with --force:");
                println!("  expense backup restore {} --force", backup);
                return Ok(());
            }

            let result = restore_manager.restore_from_file(&backup_path)?;
            println!("{}", result.summary());
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let to_delete = backups.len().saturating_sub(manager.retention());

            if to_delete == 0 {
                println!(
                    "No backups to prune ({} of {} kept).",
                    backups.len(),
                    manager.retention()
                );
                return Ok(());
            }

            println!(
                "{} backup(s) beyond the retention count of {}.",
                to_delete,
                manager.retention()
            );

            if !force {
                println!("To delete them, run again with --force:");
                println!("  expense backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve `latest`, a backup name, or a path to a file
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> ExpenseResult<PathBuf> {
    let path = PathBuf::from(backup);
    if path.is_file() {
        return Ok(path);
    }

    manager.resolve(backup).map(|info| info.path)
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
        assert_eq!(format_duration(chrono::Duration::minutes(90)), "1h");
        assert_eq!(format_duration(chrono::Duration::days(65)), "2mo");
        assert_eq!(format_duration(chrono::Duration::seconds(-3)), "0s");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
