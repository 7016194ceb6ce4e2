//! Input validation utilities for the backend service layer.
//!
//! Handlers call these before touching the database so malformed input is
//! rejected with a field-level 400 response.

use crate::error::{Error, Result};

/// Maximum length of a display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Validates email format using comprehensive checks
///
/// # Arguments
/// * `email` - The email address to validate
///
/// # Returns
/// * `Ok(())` if the email is valid
/// * `Err(Error)` with descriptive message if invalid
///
/// # Examples
/// ```
/// use fittrack::validation::validate_email;
///
/// validate_email("user@example.com").unwrap(); // Valid
/// assert!(validate_email("invalid-email").is_err()); // Returns Error
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(Error::validation("email", "Email cannot be empty"));
    }

    if email.len() > 254 {
        return Err(Error::validation("email", "Email address is too long (max 254 characters)"));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(Error::validation("email", "Invalid email format: must contain exactly one @ symbol"));
    }

    let (local_part, domain) = (parts[0], parts[1]);

    if local_part.is_empty() || local_part.len() > 64 {
        return Err(Error::validation("email", "Invalid email format: local part must be 1-64 characters"));
    }

    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(Error::validation("email", "Invalid email format: domain must contain at least one dot"));
    }

    if email.contains("..") {
        return Err(Error::validation("email", "Invalid email format: cannot contain consecutive dots"));
    }

    let invalid_chars = ['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', ' '];
    if let Some(c) = invalid_chars.iter().find(|c| email.contains(**c)) {
        return Err(Error::validation("email", format!("Invalid email format: cannot contain '{}'", c)));
    }

    Ok(())
}

/// Validates password strength and format
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(Error::validation("password", "Password must be at least 8 characters long"));
    }

    if password.len() > 128 {
        return Err(Error::validation("password", "Password is too long (max 128 characters)"));
    }

    let lowered = password.to_lowercase();
    if ["password", "12345678", "qwerty123", "fittrack123"].contains(&lowered.as_str()) {
        return Err(Error::validation("password", "Password is too common and weak"));
    }

    if password.contains(' ') {
        return Err(Error::validation("password", "Password cannot contain spaces"));
    }

    Ok(())
}

/// Validates a user's display name.
pub fn validate_name(name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "Name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::validation(
            "name",
            format!("Name is too long (max {} characters)", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

/// Requires a finite value strictly greater than zero.
pub fn validate_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::validation(field, format!("{} must be a positive number", field)));
    }
    Ok(())
}

/// Requires a finite value greater than or equal to zero.
pub fn validate_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::validation(field, format!("{} must be a non-negative number", field)));
    }
    Ok(())
}

/// Requires a non-blank string.
pub fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, format!("{} is required", field)));
    }
    Ok(())
}
