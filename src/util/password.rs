//! Password confirmation rules for the register and reset forms.

#[cfg(test)]
#[path = "password_test.rs"]
mod password_test;

/// Shortest password the reset flow accepts.
pub const MIN_RESET_PASSWORD_LEN: usize = 6;

/// Rejected password input. Display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("Passwords do not match.")]
    Mismatch,
    #[error("Password must be at least {MIN_RESET_PASSWORD_LEN} characters long.")]
    TooShort,
}

/// Registration only requires the confirmation to match.
///
/// # Errors
///
/// Returns `Mismatch` when the two entries differ.
pub fn check_registration_password(password: &str, confirm: &str) -> Result<(), PasswordError> {
    if password != confirm {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}

/// A new password must match its confirmation and meet the minimum length.
///
/// # Errors
///
/// Returns the first rule the input breaks, mismatch first.
pub fn check_reset_password(password: &str, confirm: &str) -> Result<(), PasswordError> {
    check_registration_password(password, confirm)?;
    if password.chars().count() < MIN_RESET_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}
