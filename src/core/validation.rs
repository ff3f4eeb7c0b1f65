//! Input validation.
//!
//! Validates environment variable names, values, and `NAME=VALUE` arguments.

use crate::error::{Result, ValidationError};

/// Validate an environment variable name.
///
/// Names must match `[A-Za-z_][A-Za-z0-9_]*`:
/// - Cannot be empty
/// - Cannot start with a digit
/// - Only ASCII letters, digits, and underscore
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }

    if let Some(first_char) = name.chars().next() {
        if first_char.is_ascii_digit() {
            return Err(ValidationError::InvalidName {
                name: name.to_string(),
                reason: "cannot start with a digit".to_string(),
            }
            .into());
        }
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidName {
                name: name.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a secret value.
///
/// Secret values cannot be empty.
///
/// # Errors
///
/// Returns `ValidationError::EmptyValue` if the value is empty.
pub fn validate_value(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(name.to_string()).into());
    }

    Ok(())
}

/// Split a `NAME=VALUE` argument and validate the name.
///
/// The value may itself contain `=`; only the first one separates.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidAssignment(raw.to_string()))?;
    let name = name.trim();
    validate_name(name)?;
    Ok((name.to_string(), value.to_string()))
}
