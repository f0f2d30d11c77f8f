//! Drive error taxonomy
//!
//! Four failure classes cover every core operation. `Validation` never reaches
//! the store; `Store` covers any backend failure, including a failure partway
//! through a multi-key sequence whose earlier side effects are already applied.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum DriveError {
    /// Malformed name, path or query — rejected before any store call
    #[error("invalid name: {0}")]
    Validation(String),

    /// Resolved key or prefix is absent
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Destination or target key is already present
    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    /// Any other backend failure; multi-step sequences are not rolled back
    #[error("object store failure: {0}")]
    Store(String),
}

impl From<StoreError> for DriveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoSuchKey(key) => DriveError::NotFound(key),
            other => DriveError::Store(other.to_string()),
        }
    }
}
