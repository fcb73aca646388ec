//! Parsers for raw text answers.
//!
//! Every function here is pure: it takes the text the user typed and either
//! returns the typed value or a [`ValidationError`] describing why the answer
//! was rejected. Flows decide whether a rejection reprompts or restarts.

use uuid::Uuid;

use super::ValidationError;

/// Parses a single GUID answer (surrounding whitespace ignored).
pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Uuid::parse_str(trimmed).map_err(|e| ValidationError::invalid_format(field, e.to_string()))
}

/// Parses a comma-separated batch of GUIDs.
///
/// The batch is all-or-nothing: one malformed (or empty) element rejects the
/// whole batch.
pub fn parse_uuid_list(field: &str, raw: &str) -> Result<Vec<Uuid>, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    raw.split(',')
        .map(|item| {
            let item = item.trim();
            Uuid::parse_str(item).map_err(|_| {
                ValidationError::invalid_format(field, format!("'{}' is not a valid GUID", item))
            })
        })
        .collect()
}

/// Parses a non-negative count.
pub fn parse_count(field: &str, raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    trimmed
        .parse::<u32>()
        .map_err(|e| ValidationError::invalid_format(field, e.to_string()))
}

/// Splits a comma-separated answer into trimmed, non-empty items.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validates a contact e-mail address.
pub fn parse_email(field: &str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format(field, "contains whitespace"));
    }

    let mut parts = trimmed.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ValidationError::invalid_format(field, "expected exactly one @")),
    };
    if local.is_empty() {
        return Err(ValidationError::invalid_format(field, "missing mailbox name"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::invalid_format(field, "invalid domain"));
    }
    Ok(trimmed.to_string())
}

/// Derives the requester alias from a user principal name.
pub fn alias_from_principal(principal_name: &str) -> String {
    let trimmed = principal_name.trim();
    match trimmed.split_once('@') {
        Some((alias, _)) => alias.to_string(),
        None => trimmed.to_string(),
    }
}
