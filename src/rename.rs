//! Move/rename emulation: recursive copy, then recursive delete
//!
//! The flat store has no rename. Every key under the source prefix is copied
//! to its equivalent under the destination, then the source keys are removed.
//! The two phases are not atomic: a failure between them leaves both source
//! and destination populated, with no rollback and no internal retry — the
//! caller restarts from scratch.

use tracing::{info, warn};

use crate::descriptor::{ResourceDescriptor, ResourceKind, UserId};
use crate::drive::Drive;
use crate::error::DriveError;
use crate::{naming, paths};

impl Drive {
    /// Move or rename a file or folder.
    ///
    /// The destination leaf name is validated first; an existing destination
    /// fails `AlreadyExists` before any copy. `from == to` succeeds as a
    /// no-op without touching the store.
    pub async fn move_or_rename(
        &self,
        user: UserId,
        from_client: &str,
        to_client: &str,
    ) -> Result<ResourceDescriptor, DriveError> {
        let from = paths::full_key(user, from_client);
        let to = paths::full_key(user, to_client);

        naming::validate_name(&paths::leaf_name(to_client))?;

        if from == to {
            return Ok(ResourceDescriptor {
                parent_path: paths::parent_prefix(&to),
                name: paths::leaf_name(&to),
                size: None,
                kind: if to.ends_with('/') {
                    ResourceKind::Directory
                } else {
                    ResourceKind::File
                },
            });
        }

        if !self.is_absent(&to).await? {
            return Err(DriveError::AlreadyExists(to_client.to_string()));
        }

        let items = self
            .store
            .list(&from, true)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;

        for item in &items {
            let relative = &item.key[from.len()..];
            let dest = format!("{}{}", to, relative);
            self.store
                .copy(&item.key, &dest)
                .await
                .map_err(|e| DriveError::Store(e.to_string()))?;
        }

        // Copy phase is done; anything failing from here on leaves both
        // trees populated until the caller retries.
        let leftovers = self
            .store
            .list(&from, true)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;
        if leftovers.len() != items.len() {
            warn!(
                from,
                copied = items.len(),
                remaining = leftovers.len(),
                "source changed between copy and delete phases"
            );
        }
        for item in leftovers {
            self.store
                .delete(&item.key)
                .await
                .map_err(|e| DriveError::Store(e.to_string()))?;
        }

        info!(%user, from, to, count = items.len(), "moved resource");

        if from.ends_with('/') {
            Ok(ResourceDescriptor::directory(
                paths::parent_prefix(&to),
                paths::leaf_name(&to),
            ))
        } else {
            let info = self.store.stat(&to).await?;
            Ok(ResourceDescriptor::file(
                paths::parent_prefix(&to),
                paths::leaf_name(&to),
                info.size,
            ))
        }
    }
}
