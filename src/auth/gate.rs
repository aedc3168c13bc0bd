//! Where passwords come from and how they are checked

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::error::{ExpenseError, ExpenseResult};

use super::password::verify_password;

/// Environment variable holding the password for non-interactive use
pub const PASSWORD_ENV: &str = "EXPENSE_TRACKER_PASSWORD";

/// A source of passwords typed by the user
pub trait PasswordSource {
    fn read_password(&mut self, prompt: &str) -> ExpenseResult<Zeroizing<String>>;
}

/// Prompts on the terminal without echo
#[derive(Debug, Default)]
pub struct TerminalPassword;

impl PasswordSource for TerminalPassword {
    fn read_password(&mut self, prompt: &str) -> ExpenseResult<Zeroizing<String>> {
        rpassword::prompt_password(prompt)
            .map(Zeroizing::new)
            .map_err(|e| ExpenseError::Io(format!("Failed to read password: {}", e)))
    }
}

/// Always answers with the same password
pub struct FixedPassword(Zeroizing<String>);

impl FixedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }
}

impl PasswordSource for FixedPassword {
    fn read_password(&mut self, _prompt: &str) -> ExpenseResult<Zeroizing<String>> {
        Ok(self.0.clone())
    }
}

/// Check the configured password, if any
///
/// A password supplied up front is used as is; otherwise the source is asked.
/// With no password configured this always succeeds.
pub fn authenticate(
    settings: &Settings,
    supplied: Option<&str>,
    source: &mut dyn PasswordSource,
) -> ExpenseResult<()> {
    let Some(hash) = settings.password_hash.as_deref() else {
        return Ok(());
    };

    let result = match supplied {
        Some(password) => verify_password(password, hash),
        None => {
            let password = source.read_password("Password: ")?;
            verify_password(&password, hash)
        }
    };

    match &result {
        Ok(()) => tracing::debug!("password accepted"),
        Err(e) => tracing::warn!(error = %e, "password rejected"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;

    fn protected_settings(password: &str) -> Settings {
        Settings {
            password_hash: Some(hash_password(password).unwrap()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_no_password_configured() {
        let mut source = FixedPassword::new("anything");
        authenticate(&Settings::default(), None, &mut source).unwrap();
    }

    #[test]
    fn test_supplied_password() {
        let settings = protected_settings("secret");
        let mut source = FixedPassword::new("unused");

        authenticate(&settings, Some("secret"), &mut source).unwrap();
        let err = authenticate(&settings, Some("wrong"), &mut source).unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_prompted_password() {
        let settings = protected_settings("secret");

        authenticate(&settings, None, &mut FixedPassword::new("secret")).unwrap();
        assert!(authenticate(&settings, None, &mut FixedPassword::new("nope"))
            .unwrap_err()
            .is_auth());
    }
}
