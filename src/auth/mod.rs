//! Password gate for the expense tracker
//!
//! The password is stored only as a salted Argon2id hash in the settings
//! file. Data commands, the menu and the web server check it before touching
//! any records; the menu also re-checks it after a period of inactivity.

pub mod gate;
pub mod password;
pub mod session;

pub use gate::{authenticate, FixedPassword, PasswordSource, TerminalPassword, PASSWORD_ENV};
pub use password::{hash_password, verify_password};
pub use session::Session;
