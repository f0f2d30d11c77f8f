//! Resource name validation
//!
//! Enforced before any mutating store call. Directory names are validated on
//! their body: one trailing `/` is stripped before the character checks.

use crate::error::DriveError;

/// Punctuation that is never allowed in a resource name
const RESERVED_CHARS: [char; 9] = ['\\', ':', '*', '?', '"', '\'', '<', '>', '|'];

/// Validate a file or folder leaf name.
///
/// Rejects blank names, `//`, `..`, reserved punctuation and control
/// characters. Pure function, no I/O.
pub fn validate_name(name: &str) -> Result<(), DriveError> {
    if name.trim().is_empty() {
        return Err(DriveError::Validation("name must not be blank".to_string()));
    }

    let body = name.strip_suffix('/').unwrap_or(name);
    if body.trim().is_empty() {
        return Err(DriveError::Validation("name must not be blank".to_string()));
    }

    if name.contains("//") {
        return Err(DriveError::Validation("name must not contain //".to_string()));
    }

    if name.contains("..") {
        return Err(DriveError::Validation("name must not contain ..".to_string()));
    }

    for c in body.chars() {
        if RESERVED_CHARS.contains(&c) {
            return Err(DriveError::Validation(format!("reserved character: {}", c)));
        }
        if c.is_control() {
            return Err(DriveError::Validation(
                "name must not contain control characters".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate a search query: only the blankness rule applies, the reserved
/// character set does not.
pub fn validate_query(query: &str) -> Result<(), DriveError> {
    if query.trim().is_empty() {
        return Err(DriveError::Validation("query must not be blank".to_string()));
    }
    Ok(())
}
