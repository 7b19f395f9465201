//! Credential redaction for database error text.
//!
//! Database clients echo connection details into their diagnostics
//! ("Access denied for user 'alice'@'localhost'"), so every error string
//! leaving a database driver passes through here first. A pure function
//! over `(message, options)` so it is testable without launching
//! anything; never applied to `output`.

use crate::execution::ExecOptions;

pub const REDACTED: &str = "****";

/// Replace every literal occurrence of the configured password, and the
/// configured username where it appears as `user@` or wrapped in quotes.
///
/// Usernames of two characters or fewer are left alone: substituting
/// them would mangle ordinary words far too often. Quoted and `@`-suffixed
/// occurrences only, so an unrelated sentence containing the username
/// substring stays intact.
pub fn mask_credentials(message: &str, opts: &ExecOptions) -> String {
    let mut masked = message.to_string();

    if let Some(password) = opts.password() {
        masked = masked.replace(password, REDACTED);
    }

    if let Some(user) = opts.user() {
        if user.chars().count() > 2 {
            masked = masked.replace(&format!("{user}@"), &format!("{REDACTED}@"));
            masked = masked.replace(&format!("'{user}'"), &format!("'{REDACTED}'"));
            masked = masked.replace(&format!("\"{user}\""), &format!("\"{REDACTED}\""));
        }
    }

    masked
}
