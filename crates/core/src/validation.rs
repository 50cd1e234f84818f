//! Required-field checks for admin submissions.
//!
//! These run before any network call, so a submission missing its name never
//! uploads a photo.

use crate::error::CoreError;

/// Fail with a validation error naming `label` when `value` is blank.
pub fn require_non_blank(label: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{label} is required")));
    }
    Ok(())
}

/// Reject an explicit edit that would blank a required field.
///
/// `None` means "leave unchanged" and always passes.
pub fn require_non_blank_if_present(label: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => require_non_blank(label, v),
        None => Ok(()),
    }
}

/// Trim surrounding whitespace from submitted text.
pub fn clean_text(value: &str) -> String {
    value.trim().to_string()
}
