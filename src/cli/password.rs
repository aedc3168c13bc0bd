//! Password commands
//!
//! Changing or clearing the password goes through the same gate as every
//! other data command, so only someone who knows the current one can do it.

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::auth::{hash_password, PasswordSource};
use crate::config::{Settings, TrackerPaths};
use crate::error::{ExpenseError, ExpenseResult};

/// Environment variable supplying the new password to `password set`
pub const NEW_PASSWORD_ENV: &str = "EXPENSE_TRACKER_NEW_PASSWORD";

#[derive(Subcommand, Debug)]
pub enum PasswordCommands {
    /// Set or change the access password
    Set {
        /// New password; prompted for (twice) when omitted
        #[arg(long, env = NEW_PASSWORD_ENV, hide_env_values = true)]
        new_password: Option<String>,
    },

    /// Remove the access password
    Clear,
}

/// Handle a password command, saving the updated settings
pub fn handle_password_command(
    paths: &TrackerPaths,
    settings: &mut Settings,
    source: &mut dyn PasswordSource,
    cmd: PasswordCommands,
) -> ExpenseResult<()> {
    match cmd {
        PasswordCommands::Set { new_password } => {
            let password = match new_password {
                Some(password) => Zeroizing::new(password),
                None => prompt_new_password(source)?,
            };

            settings.password_hash = Some(hash_password(&password)?);
            settings.save(paths)?;
            println!("Password set. It will be required for every data command.");
        }
        PasswordCommands::Clear => {
            if !settings.has_password() {
                println!("No password is set.");
                return Ok(());
            }

            settings.password_hash = None;
            settings.save(paths)?;
            println!("Password cleared.");
        }
    }

    Ok(())
}

/// Ask for the new password twice and require both entries to match
fn prompt_new_password(source: &mut dyn PasswordSource) -> ExpenseResult<Zeroizing<String>> {
    let first = source.read_password("New password: ")?;
    let second = source.read_password("Repeat new password: ")?;

    if *first != *second {
        return Err(ExpenseError::Validation(
            "Passwords do not match".to_string(),
        ));
    }

    Ok(first)
}
