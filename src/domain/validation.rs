//! Field constraints applied to incoming payloads before they reach storage.

use serde::{Deserialize, Deserializer};

use super::DomainError;

/// Trim `value` and require its length (in chars) to be within `min..=max`.
pub fn bounded(field: &str, value: &str, min: usize, max: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(DomainError::Validation(format!(
            "{} must be between {} and {} characters long",
            field, min, max
        )));
    }
    Ok(trimmed.to_string())
}

/// Usernames: 3 to 50 characters, alphanumerics and `.`, `_`, `-` only.
pub fn username(value: &str) -> Result<String, DomainError> {
    let username = bounded("username", value, 3, 50)?;
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(DomainError::Validation(
            "username must only contain alphanumeric characters and symbols: . _ -".to_string(),
        ));
    }
    Ok(username)
}

pub fn email(value: &str) -> Result<String, DomainError> {
    let email = bounded("email", value, 3, 100)?;
    let invalid = || DomainError::Validation(format!("'{}' is not a valid email address", email));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains("..")
    {
        return Err(invalid());
    }
    Ok(email)
}

pub fn non_negative(field: &str, value: i32) -> Result<i32, DomainError> {
    if value < 0 {
        return Err(DomainError::Validation(format!(
            "{} must be a non-negative integer",
            field
        )));
    }
    Ok(value)
}

/// Optional free text capped at `max` characters. The text is not trimmed.
pub fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, DomainError> {
    match value {
        Some(text) if text.chars().count() > max => Err(DomainError::Validation(format!(
            "{} must be at most {} characters long",
            field, max
        ))),
        other => Ok(other),
    }
}

/// Deserializer for patch fields that may be explicitly cleared.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`:
/// absent gives `None`, `null` gives `Some(None)`, a value gives `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
