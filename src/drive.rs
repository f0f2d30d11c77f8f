//! Drive facade
//!
//! Owns the object store gateway and exposes every drive operation. Each
//! operation is a sequence of awaits on the caller's task: no background
//! scheduler, no cross-request state, no locking around multi-call sequences.
//! Consistency across those sequences is best-effort by design.

use std::sync::Arc;

use crate::error::DriveError;
use crate::store::{ObjectStore, StoreError};

pub struct Drive {
    pub(crate) store: Arc<dyn ObjectStore>,
}

impl Drive {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Racy check-then-act probe: true when a stat on `key` reports a missing
    /// key. A concurrent writer can invalidate the answer before it is used.
    pub(crate) async fn is_absent(&self, key: &str) -> Result<bool, DriveError> {
        match self.store.stat(key).await {
            Ok(_) => Ok(false),
            Err(StoreError::NoSuchKey(_)) => Ok(true),
            Err(other) => Err(DriveError::Store(other.to_string())),
        }
    }
}
