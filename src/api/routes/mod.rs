//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod payments;
pub mod results;
pub mod stats;
pub mod teams;
pub mod users;

use regex::Regex;
use std::sync::LazyLock;

use crate::api::error::{ApiError, ApiResult};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Trimmed required text field
pub(crate) fn required(field: &str, value: &str, max_len: usize) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > max_len {
        return Err(ApiError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max_len
        )));
    }
    Ok(value.to_string())
}

/// Blank optional text collapses to `None`
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn validate_email(email: &str) -> ApiResult<String> {
    let email = required("email", email, 254)?;
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ApiError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email.to_lowercase())
}
