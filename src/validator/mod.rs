//! Address validation for new sources.
//!
//! Rules are checked in order and the first failure wins:
//! required, then format, then duplicate.

use url::Url;

use crate::app::error::ValidationError;

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Validate `candidate` against the addresses registered right now.
///
/// Returns the trimmed address on success. `existing` is read on every call,
/// so sources added concurrently are taken into account.
pub fn validate<S: AsRef<str>>(candidate: &str, existing: &[S]) -> Result<String, ValidationError> {
    let address = candidate.trim();

    if address.is_empty() {
        return Err(ValidationError::Required);
    }

    if !is_absolute_url(address) {
        return Err(ValidationError::Format);
    }

    if existing.iter().any(|e| e.as_ref() == address) {
        return Err(ValidationError::Duplicate);
    }

    Ok(address.to_string())
}

fn is_absolute_url(address: &str) -> bool {
    match Url::parse(address) {
        Ok(url) => {
            ALLOWED_SCHEMES.contains(&url.scheme())
                && url.host_str().is_some_and(|h| !h.is_empty())
                && !address.chars().any(char::is_whitespace)
        }
        Err(_) => false,
    }
}
