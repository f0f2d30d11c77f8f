//! Resource catalog: stat, listing, existence probes and folder creation

use tracing::info;

use crate::descriptor::{ResourceDescriptor, ResourceKind, UserId};
use crate::drive::Drive;
use crate::error::DriveError;
use crate::{naming, paths};

impl Drive {
    /// Stat a single resource. A key ending in `/` is a directory and carries
    /// no size; anything else is a file with the store-reported byte size.
    pub async fn stat(
        &self,
        user: UserId,
        client_path: &str,
    ) -> Result<ResourceDescriptor, DriveError> {
        if client_path.is_empty() {
            return Err(DriveError::Validation("missing path".to_string()));
        }

        let key = paths::full_key(user, client_path);
        let info = self.store.stat(&key).await?;

        if key.ends_with('/') {
            Ok(ResourceDescriptor::directory(
                paths::parent_prefix(&key),
                paths::leaf_name(&key),
            ))
        } else {
            Ok(ResourceDescriptor::file(
                paths::parent_prefix(&key),
                paths::leaf_name(&key),
                info.size,
            ))
        }
    }

    /// Single-level folder listing. The entry equal to the queried prefix is
    /// the folder itself, not a child, and is skipped. Non-root paths are
    /// probed for existence first.
    pub async fn list(
        &self,
        user: UserId,
        client_path: &str,
    ) -> Result<Vec<ResourceDescriptor>, DriveError> {
        let key = paths::full_key(user, client_path);

        if !client_path.is_empty() && !self.folder_exists(&key).await? {
            return Err(DriveError::NotFound(client_path.to_string()));
        }

        let items = self
            .store
            .list(&key, false)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;

        let mut entries = Vec::new();
        for item in items {
            if item.key == key {
                continue;
            }
            let is_directory = item.key.ends_with('/');
            entries.push(ResourceDescriptor {
                parent_path: paths::parent_prefix(&item.key),
                name: paths::leaf_name(&item.key),
                size: if is_directory { None } else { Some(item.size) },
                kind: if is_directory {
                    ResourceKind::Directory
                } else {
                    ResourceKind::File
                },
            });
        }
        Ok(entries)
    }

    /// Non-atomic existence probe. For a directory-shaped key: any listed key
    /// under it. For a file-shaped key: any listed key sharing its parent
    /// prefix. Concurrent writers can change the answer at any time.
    pub(crate) async fn folder_exists(&self, key: &str) -> Result<bool, DriveError> {
        let items = self
            .store
            .list(key, false)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;

        if key.ends_with('/') {
            Ok(items.iter().any(|item| item.key.starts_with(key)))
        } else {
            let parent = paths::parent_prefix(key);
            Ok(items.iter().any(|item| paths::parent_prefix(&item.key) == parent))
        }
    }

    /// Create an empty folder: a zero-byte object whose key ends with `/`.
    /// The probe-then-put pair is not atomic; two concurrent calls can both
    /// pass the probe and both write.
    pub async fn create_directory(
        &self,
        user: UserId,
        client_path: &str,
    ) -> Result<ResourceDescriptor, DriveError> {
        naming::validate_name(&paths::leaf_name(client_path))?;

        let mut key = paths::full_key(user, client_path);
        if !key.ends_with('/') {
            key.push('/');
        }

        if !self.is_absent(&key).await? {
            return Err(DriveError::AlreadyExists(client_path.to_string()));
        }

        self.store
            .put(&key, Vec::new(), None)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;
        info!(%user, key, "created directory");

        Ok(ResourceDescriptor::directory(
            paths::parent_prefix(&key),
            paths::leaf_name(&key),
        ))
    }
}
