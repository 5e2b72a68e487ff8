//! Form constraints checked before anything is sent to the backend

use thiserror::Error;

/// Minimum accepted password length on registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// A form field that failed its constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("Enter a valid email address")]
    InvalidEmail,
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// Passwords are taken verbatim; only an empty one is missing
fn required_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        Err(ValidationError::Required("Password"))
    } else {
        Ok(())
    }
}

/// Login form: both fields required
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    required("Username", username)?;
    required_password(password)
}

/// Registration form: all fields required, email shape, password length
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    required("Username", username)?;
    required("Email", email)?;
    required_password(password)?;

    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
        _ => return Err(ValidationError::InvalidEmail),
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

/// Entry editor: title and content required
pub fn validate_entry(title: &str, content: &str) -> Result<(), ValidationError> {
    required("Title", title)?;
    required("Content", content)
}
