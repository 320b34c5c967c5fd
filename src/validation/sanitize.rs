//! Text sanitization and validation functions.
//!
//! Provides functions to sanitize and validate user input:
//! - Trim whitespace
//! - Normalize line endings
//! - Validate length constraints
//! - Validate phone numbers
//! - Validate email format
//! - Sanitize for logging

use crate::error::AppError;

/// Trim whitespace and normalize newlines in text input.
///
/// This function:
/// - Trims leading and trailing whitespace
/// - Normalizes Windows-style line endings (\r\n and \r) to Unix-style (\n)
pub fn sanitize_text(input: &str) -> String {
    input
        .trim()
        .replace("\r\n", "\n") // Windows -> Unix
        .replace('\r', "\n") // Old Mac -> Unix
}

/// Sanitize and validate text length.
///
/// Returns the sanitized text if within length limits.
///
/// # Errors
/// Returns `AppError::ValidationError` if the text exceeds the maximum length.
pub fn validate_text(input: &str, field_name: &str, max_length: usize) -> Result<String, AppError> {
    let sanitized = sanitize_text(input);

    if sanitized.len() > max_length {
        return Err(AppError::validation(format!(
            "{} exceeds maximum length of {} characters",
            field_name, max_length
        )));
    }

    Ok(sanitized)
}

/// Validate that a required field is present and within length limits.
///
/// # Errors
/// - Returns `AppError::ValidationError` if the text is empty after trimming
/// - Returns `AppError::ValidationError` if the text exceeds the maximum length
pub fn validate_required(
    input: &str,
    field_name: &str,
    max_length: usize,
) -> Result<String, AppError> {
    let sanitized = validate_text(input, field_name, max_length)?;

    if sanitized.is_empty() {
        return Err(AppError::validation(format!("{} is required", field_name)));
    }

    Ok(sanitized)
}

/// Validate an optional text field (can be empty but must respect length if provided).
///
/// # Errors
/// Returns `AppError::ValidationError` if the non-empty text exceeds the maximum length.
pub fn validate_optional(
    input: Option<&str>,
    field_name: &str,
    max_length: usize,
) -> Result<Option<String>, AppError> {
    match input {
        None => Ok(None),
        Some(s) => {
            let sanitized = validate_text(s, field_name, max_length)?;
            if sanitized.is_empty() {
                Ok(None)
            } else {
                Ok(Some(sanitized))
            }
        }
    }
}

/// Validate a phone number format.
///
/// Phone numbers can contain:
/// - Digits (0-9)
/// - Spaces
/// - Hyphens (-)
/// - Parentheses ()
/// - Plus sign (+)
/// - Periods (.)
///
/// # Errors
/// - Returns `AppError::ValidationError` if the phone contains invalid characters
/// - Returns `AppError::ValidationError` if the phone exceeds the maximum length
pub fn validate_phone(input: Option<&str>, max_length: usize) -> Result<Option<String>, AppError> {
    match input {
        None => Ok(None),
        Some(s) => {
            let sanitized = sanitize_text(s);

            if sanitized.is_empty() {
                return Ok(None);
            }

            if sanitized.len() > max_length {
                return Err(AppError::validation(format!(
                    "phone exceeds maximum length of {} characters",
                    max_length
                )));
            }

            // Allow only digits, spaces, dashes, parentheses, plus sign
            if !sanitized
                .chars()
                .all(|c| c.is_ascii_digit() || " -+().".contains(c))
            {
                return Err(AppError::validation(
                    "phone contains invalid characters (only digits, spaces, dashes, parentheses, and + are allowed)",
                ));
            }

            Ok(Some(sanitized))
        }
    }
}

/// Validate an email address format.
///
/// Performs basic validation:
/// - Must contain @ if not empty
/// - Converted to lowercase
/// - Length must not exceed maximum
///
/// # Errors
/// - Returns `AppError::ValidationError` if the email is missing @ symbol
/// - Returns `AppError::ValidationError` if the email exceeds the maximum length
pub fn validate_email(input: Option<&str>, max_length: usize) -> Result<Option<String>, AppError> {
    match input {
        None => Ok(None),
        Some(s) => {
            let sanitized = sanitize_text(s).to_lowercase();

            if sanitized.is_empty() {
                return Ok(None);
            }

            if sanitized.len() > max_length {
                return Err(AppError::validation(format!(
                    "email exceeds maximum length of {} characters",
                    max_length
                )));
            }

            // Basic email format check - must contain @
            if !sanitized.contains('@') {
                return Err(AppError::validation("email must contain @ symbol"));
            }

            // Check for at least something before and after @
            let parts: Vec<&str> = sanitized.splitn(2, '@').collect();
            if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
                return Err(AppError::validation("invalid email format"));
            }

            Ok(Some(sanitized))
        }
    }
}

/// Sanitize text for safe logging.
///
/// Replaces control characters (except newlines and tabs) with '?'
/// to prevent log injection attacks.
pub fn sanitize_for_log(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                '?' // Replace control chars with placeholder
            } else {
                c
            }
        })
        .collect()
}
