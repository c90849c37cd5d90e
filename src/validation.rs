use crate::error::AppError;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Both credentials must be present before anything goes over the wire.
pub fn require_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }
    Ok(())
}

pub fn require_email(email: &str) -> Result<(), AppError> {
    if !email.contains('@') {
        return Err(AppError::Validation("Please enter a valid email address".into()));
    }
    Ok(())
}

pub fn require_password_len(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
