//! Recursive delete
//!
//! Every key under the resolved prefix is removed one by one. A failure
//! partway through leaves already-removed keys gone and the rest intact;
//! the caller sees a `Store` error and decides whether to retry.

use tracing::info;

use crate::descriptor::UserId;
use crate::drive::Drive;
use crate::error::DriveError;
use crate::paths;

impl Drive {
    /// Delete a file, or a folder with everything under it.
    ///
    /// Fails `NotFound` when the recursive listing of the resolved prefix is
    /// empty — nothing ever existed at that path.
    pub async fn delete(&self, user: UserId, client_path: &str) -> Result<(), DriveError> {
        if client_path.is_empty() {
            return Err(DriveError::Validation("missing path".to_string()));
        }

        let key = paths::full_key(user, client_path);
        let items = self
            .store
            .list(&key, true)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;

        if items.is_empty() {
            return Err(DriveError::NotFound(client_path.to_string()));
        }

        let count = items.len();
        for item in items {
            self.store
                .delete(&item.key)
                .await
                .map_err(|e| DriveError::Store(e.to_string()))?;
        }

        info!(%user, key, count, "deleted resource");
        Ok(())
    }
}
