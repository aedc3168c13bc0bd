//! Password hashing using Argon2id
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
//! parameters, so verification needs nothing but the stored string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{ExpenseError, ExpenseResult};

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> ExpenseResult<String> {
    if password.is_empty() {
        return Err(ExpenseError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ExpenseError::Auth(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash
///
/// Returns an `Auth` error on mismatch and a `Config` error if the stored
/// hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> ExpenseResult<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ExpenseError::Config(format!("Stored password hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ExpenseError::Auth("Incorrect password".to_string()))
}
