//! Interactive numbered menu
//!
//! Reads choices line by line from any `BufRead` and writes to any `Write`,
//! so the loop runs the same against a terminal or a test buffer. Errors in
//! an action are reported and the menu continues; a failed password check
//! ends the session.

use std::io::{BufRead, Write};

use crossterm::style::Stylize;

use crate::auth::{authenticate, PasswordSource, Session};
use crate::backup::BackupManager;
use crate::config::Settings;
use crate::display::format_record_table;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetLimits, SummaryPeriod};
use crate::services::{ExpenseService, NewRecord};
use crate::storage::Storage;

use super::summary::render_period_summary;

const MENU: &str = "\
1. Add record
2. View records
3. Delete record
4. Monthly summary
5. Yearly summary
6. Back up data
7. Exit";

/// What to do after an action
enum Flow {
    Continue,
    Exit,
}

/// The interactive menu over one store
pub struct Menu<'a, R, W> {
    storage: &'a Storage,
    settings: &'a Settings,
    limits: BudgetLimits,
    passwords: &'a mut dyn PasswordSource,
    session: Session,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        storage: &'a Storage,
        settings: &'a Settings,
        limits: BudgetLimits,
        passwords: &'a mut dyn PasswordSource,
        input: R,
        output: W,
    ) -> Self {
        Self {
            storage,
            settings,
            limits,
            passwords,
            session: Session::from_minutes(settings.session_timeout_minutes),
            input,
            output,
        }
    }

    /// Replace the inactivity tracker
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> ExpenseResult<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", "Expense Tracker".bold())?;
            writeln!(self.output, "{}", MENU)?;

            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            self.check_session()?;

            match self.dispatch(choice.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                Err(e) if e.is_auth() => return Err(e),
                Err(e) => {
                    tracing::debug!(error = %e, "menu action failed");
                    writeln!(self.output, "{}", format!("Error: {}", e).red())?;
                }
            }
        }
    }

    /// Re-check the password after too long without input
    fn check_session(&mut self) -> ExpenseResult<()> {
        if self.settings.has_password() && self.session.is_expired() {
            writeln!(self.output, "{}", "Session expired. Please log in again.".yellow())?;
            self.output.flush()?;
            authenticate(self.settings, None, self.passwords)?;
        }
        self.session.touch();
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> ExpenseResult<Flow> {
        match choice {
            "1" => self.add_record()?,
            "2" => self.view_records()?,
            "3" => self.delete_record()?,
            "4" => self.summary("Month (YYYY-MM, blank for current): ", SummaryPeriod::current_month)?,
            "5" => self.summary("Year (YYYY, blank for current): ", SummaryPeriod::current_year)?,
            "6" => self.backup()?,
            "7" => return Ok(Flow::Exit),
            other => writeln!(self.output, "Invalid choice '{}'. Enter a number from 1 to 7.", other)?,
        }
        Ok(Flow::Continue)
    }

    fn add_record(&mut self) -> ExpenseResult<()> {
        let Some(date) = self.prompt("Date (YYYY-MM-DD, blank for today): ")? else {
            return Ok(());
        };
        let Some(category) = self.prompt("Category: ")? else {
            return Ok(());
        };
        let Some(amount) = self.prompt("Amount (negative for expenses): ")? else {
            return Ok(());
        };
        let Some(note) = self.prompt("Note (optional): ")? else {
            return Ok(());
        };

        let input = NewRecord::new(category, amount)
            .with_date(date)
            .with_note(note);
        let record = ExpenseService::new(self.storage).create(input, &self.limits)?;

        writeln!(self.output, "{}", format!("Added: {}", record).green())?;
        Ok(())
    }

    fn view_records(&mut self) -> ExpenseResult<()> {
        let records = ExpenseService::new(self.storage).list()?;
        writeln!(self.output, "{}", format_record_table(&records, 0))?;
        Ok(())
    }

    fn delete_record(&mut self) -> ExpenseResult<()> {
        self.view_records()?;

        let Some(target) = self.prompt("Position or id to delete: ")? else {
            return Ok(());
        };
        let target = target.trim();
        let service = ExpenseService::new(self.storage);

        if let Ok(position) = target.parse::<usize>() {
            match service.delete_at(position)? {
                Some(record) => writeln!(self.output, "{}", format!("Deleted: {}", record).green())?,
                None => writeln!(self.output, "No record at position {}.", position)?,
            }
            return Ok(());
        }

        let record = service.delete(service.resolve_id(target)?)?;
        writeln!(self.output, "{}", format!("Deleted: {}", record).green())?;
        Ok(())
    }

    fn summary(&mut self, label: &str, current: fn() -> SummaryPeriod) -> ExpenseResult<()> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(());
        };

        let period = if raw.trim().is_empty() {
            current()
        } else {
            raw.parse::<SummaryPeriod>()?
        };

        let text = render_period_summary(self.storage, &self.limits, period)?;
        write!(self.output, "{}", text)?;
        Ok(())
    }

    fn backup(&mut self) -> ExpenseResult<()> {
        let manager = BackupManager::new(self.storage.paths(), self.settings.backup_retention);
        let (path, _) = manager.create_backup_with_retention()?;
        writeln!(self.output, "{}", format!("Backup saved to {}", path.display()).green())?;
        Ok(())
    }

    /// Print a label and read one line; `None` at end of input
    fn prompt(&mut self, label: &str) -> ExpenseResult<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| ExpenseError::Io(format!("Failed to read input: {}", e)))?;

        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
