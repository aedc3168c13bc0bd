//! Backup manager
//!
//! Creates timestamped copies of the record file and keeps the newest
//! `retention` of them.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::TrackerPaths;
use crate::error::{ExpenseError, ExpenseResult};

/// File name prefix shared by every backup
pub const BACKUP_PREFIX: &str = "expenses_backup_";

const BACKUP_EXTENSION: &str = "csv";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created, from its file name
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Manages backup creation and retention
#[derive(Debug, Clone)]
pub struct BackupManager {
    backup_dir: PathBuf,
    records_file: PathBuf,
    retention: usize,
}

impl BackupManager {
    /// Create a manager keeping at most `retention` backups when pruning
    pub fn new(paths: &TrackerPaths, retention: usize) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            records_file: paths.records_file(),
            retention,
        }
    }

    /// Copy the current record file into the backup directory
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> ExpenseResult<PathBuf> {
        if !self.records_file.exists() {
            return Err(ExpenseError::NotFound {
                entity_type: "Data file",
                identifier: self.records_file.display().to_string(),
            });
        }

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| ExpenseError::Io(format!("Failed to create backup directory: {}", e)))?;

        let backup_path = self
            .backup_dir
            .join(backup_filename(Local::now().naive_local()));

        fs::copy(&self.records_file, &backup_path)
            .map_err(|e| ExpenseError::Io(format!("Failed to write backup file: {}", e)))?;

        tracing::info!(path = %backup_path.display(), "created backup");
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> ExpenseResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| ExpenseError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| ExpenseError::Io(format!("Failed to read directory entry: {}", e)))?;

            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });

        Ok(backups)
    }

    /// Delete the oldest backups beyond the retention count
    ///
    /// The newest backup is always kept, even with a retention of zero.
    pub fn enforce_retention(&self) -> ExpenseResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self.list_backups()?.into_iter().skip(self.retention.max(1)) {
            fs::remove_file(&backup.path)
                .map_err(|e| ExpenseError::Io(format!("Failed to delete old backup: {}", e)))?;
            tracing::debug!(path = %backup.path.display(), "pruned backup");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce the retention count
    pub fn create_backup_with_retention(&self) -> ExpenseResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> ExpenseResult<Option<BackupInfo>> {
        // Only bare names inside the backup directory
        if Path::new(filename).file_name().and_then(|n| n.to_str()) != Some(filename) {
            return Ok(None);
        }

        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> ExpenseResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Resolve `latest` or a backup filename to its info
    pub fn resolve(&self, name: &str) -> ExpenseResult<BackupInfo> {
        let found = if name.eq_ignore_ascii_case("latest") {
            self.get_latest_backup()?
        } else {
            self.get_backup(name)?
        };

        found.ok_or_else(|| ExpenseError::backup_not_found(name))
    }
}

/// Backup file name for the given local wall-clock time
fn backup_filename(now: NaiveDateTime) -> String {
    format!(
        "{}{}_{:03}.{}",
        BACKUP_PREFIX,
        now.format("%Y%m%d_%H%M%S"),
        (now.nanosecond() / 1_000_000).min(999),
        BACKUP_EXTENSION
    )
}

/// Parse backup info from a backup file path
fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_str()?.to_string();

    let stamp = filename
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let created_at = parse_backup_timestamp(stamp)?;

    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes: metadata.len(),
    })
}

/// Parse `YYYYMMDD_HHMMSS` or `YYYYMMDD_HHMMSS_mmm`, written in local time
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = stamp.split('_').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let date_part = parts[0];
    let time_part = parts[1];
    let millis: u32 = match parts.get(2) {
        Some(ms) if ms.len() == 3 => ms.parse().ok()?,
        Some(_) => return None,
        None => 0,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6)?.parse().ok()?;
    let day: u32 = date_part.get(6..8)?.parse().ok()?;
    let hour: u32 = time_part.get(0..2)?.parse().ok()?;
    let minute: u32 = time_part.get(2..4)?.parse().ok()?;
    let second: u32 = time_part.get(4..6)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = chrono::NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    let datetime = NaiveDateTime::new(date, time);

    Local
        .from_local_datetime(&datetime)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use tempfile::TempDir;

    fn create_test_manager(retention: usize) -> (BackupManager, TrackerPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        fs::write(
            paths.records_file(),
            "date,category,amount,note,id\n2024-03-01,food,-12.50,,\n",
        )
        .unwrap();

        let manager = BackupManager::new(&paths, retention);
        (manager, paths, temp_dir)
    }

    fn create_spaced_backups(manager: &BackupManager, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|_| {
                let path = manager.create_backup().unwrap();
                std::thread::sleep(std::time::Duration::from_millis(5));
                path
            })
            .collect()
    }

    #[test]
    fn test_create_backup_copies_file() {
        let (manager, paths, _temp) = create_test_manager(30);

        let backup_path = manager.create_backup().unwrap();
        assert!(backup_path.exists());
        assert!(backup_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(BACKUP_PREFIX));
        assert_eq!(
            fs::read(&backup_path).unwrap(),
            fs::read(paths.records_file()).unwrap()
        );
    }

    #[test]
    fn test_create_backup_without_data_file() {
        let (manager, paths, _temp) = create_test_manager(30);
        fs::remove_file(paths.records_file()).unwrap();

        let err = manager.create_backup().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _paths, _temp) = create_test_manager(30);
        let created = create_spaced_backups(&manager, 3);

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 3);
        assert_eq!(backups[0].path, created[2]);
        assert_eq!(backups[2].path, created[0]);
        assert!(backups[0].size_bytes > 0);
    }

    #[test]
    fn test_list_ignores_unrelated_files() {
        let (manager, _paths, _temp) = create_test_manager(30);
        fs::write(manager.backup_dir().join("notes.txt"), "x").unwrap();
        fs::write(manager.backup_dir().join("expenses_backup_garbage.csv"), "x").unwrap();

        assert!(manager.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_retention_keeps_newest() {
        let (manager, _paths, _temp) = create_test_manager(3);
        let created = create_spaced_backups(&manager, 5);

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted, vec![created[1].clone(), created[0].clone()]);

        let remaining: Vec<PathBuf> = manager
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.path)
            .collect();
        assert_eq!(
            remaining,
            vec![created[4].clone(), created[3].clone(), created[2].clone()]
        );
    }

    #[test]
    fn test_create_backup_with_retention() {
        let (manager, _paths, _temp) = create_test_manager(2);
        create_spaced_backups(&manager, 2);

        let (new_backup, deleted) = manager.create_backup_with_retention().unwrap();
        assert!(new_backup.exists());
        assert_eq!(deleted.len(), 1);
    }

    #[test]
    fn test_resolve() {
        let (manager, _paths, _temp) = create_test_manager(30);
        assert!(manager.resolve("latest").unwrap_err().is_not_found());

        let created = create_spaced_backups(&manager, 2);
        assert_eq!(manager.resolve("latest").unwrap().path, created[1]);

        let name = created[0].file_name().unwrap().to_str().unwrap();
        assert_eq!(manager.resolve(name).unwrap().path, created[0]);

        assert!(manager.resolve("../data/expenses.csv").is_err());
        assert!(manager.resolve("missing.csv").unwrap_err().is_not_found());
    }

    #[test]
    fn test_backup_filename_format() {
        let at = NaiveDate::from_ymd_opt(2025, 11, 27)
            .unwrap()
            .and_hms_milli_opt(14, 30, 22, 456)
            .unwrap();
        assert_eq!(backup_filename(at), "expenses_backup_20251127_143022_456.csv");
    }

    #[test]
    fn test_backup_name_uses_local_clock() {
        let (manager, _paths, _temp) = create_test_manager(30);

        let before = backup_filename(Local::now().naive_local());
        let path = manager.create_backup().unwrap();
        let after = backup_filename(Local::now().naive_local());

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(before.as_str() <= name && name <= after.as_str(), "{name}");
    }

    #[test]
    fn test_zero_retention_keeps_new_backup() {
        let (manager, _paths, _temp) = create_test_manager(0);
        create_spaced_backups(&manager, 2);

        let (new_backup, deleted) = manager.create_backup_with_retention().unwrap();
        assert!(new_backup.exists());
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_backups().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127_143022")
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(timestamp.year(), 2025);
        assert_eq!(timestamp.month(), 11);
        assert_eq!(timestamp.day(), 27);

        let timestamp = parse_backup_timestamp("20251127_143022_456").unwrap();
        let local = timestamp.with_timezone(&Local).naive_local();
        assert_eq!(backup_filename(local), "expenses_backup_20251127_143022_456.csv");
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("20251327_143022").is_none());
        assert!(parse_backup_timestamp("2025112_143022").is_none());
        assert!(parse_backup_timestamp("20251127").is_none());
    }

    #[test]
    fn test_empty_backup_dir() {
        let (manager, _paths, _temp) = create_test_manager(30);
        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.get_latest_backup().unwrap().is_none());
    }
}
