//! Validated multi-file upload
//!
//! Files are written in order; a name conflict aborts the whole call. The
//! batch is not transactional: files written before the conflict stay in the
//! store even though no descriptors are returned for them.

use tracing::info;

use crate::descriptor::{ResourceDescriptor, ResourceKind, UploadFile, UserId};
use crate::drive::Drive;
use crate::error::DriveError;
use crate::{naming, paths};

impl Drive {
    /// Upload a batch of files under `target_folder`.
    ///
    /// Per file: validate the leaf name, probe the target key, then put the
    /// bytes with the declared content type. An existing key fails the entire
    /// call with `AlreadyExists`. Descriptors are returned only when every
    /// file succeeded; sizes are the declared byte counts.
    pub async fn upload(
        &self,
        user: UserId,
        target_folder: &str,
        files: Vec<UploadFile>,
    ) -> Result<Vec<ResourceDescriptor>, DriveError> {
        let mut stored = Vec::with_capacity(files.len());

        for file in files {
            naming::validate_name(&paths::leaf_name(&file.name))?;

            let client_path = format!("{}{}", target_folder, file.name);
            let key = paths::full_key(user, &client_path);

            if !self.is_absent(&key).await? {
                return Err(DriveError::AlreadyExists(client_path));
            }

            let size = file.data.len() as u64;
            self.store
                .put(&key, file.data, file.content_type.as_deref())
                .await
                .map_err(|e| DriveError::Store(e.to_string()))?;

            stored.push(ResourceDescriptor {
                parent_path: paths::parent_prefix(&key),
                name: paths::leaf_name(&file.name),
                size: Some(size),
                kind: if file.name.ends_with('/') {
                    ResourceKind::Directory
                } else {
                    ResourceKind::File
                },
            });
        }

        info!(%user, count = stored.len(), target_folder, "uploaded batch");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::descriptor::{ResourceKind, UploadFile, UserId};
    use crate::error::DriveError;
    use crate::store::{MemoryStore, ObjectStore};
    use crate::Drive;

    const USER: UserId = UserId(1);

    fn fixture() -> (Arc<MemoryStore>, Drive) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Drive::new(store))
    }

    fn upload_file(name: &str, data: &[u8]) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            content_type: Some("text/plain".to_string()),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn batch_upload_stores_every_file_with_declared_metadata() {
        let (store, drive) = fixture();
        let stored = drive
            .upload(
                USER,
                "docs/",
                vec![upload_file("a.txt", b"alpha"), upload_file("b.txt", b"be")],
            )
            .await
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "a.txt");
        assert_eq!(stored[0].size, Some(5));
        assert_eq!(stored[0].kind, ResourceKind::File);
        assert_eq!(stored[0].parent_path, "docs/");
        assert_eq!(
            store.content_type("user-1-files/docs/a.txt").as_deref(),
            Some("text/plain")
        );
        assert_eq!(
            store.get("user-1-files/docs/b.txt").await.unwrap(),
            b"be"
        );
    }

    #[tokio::test]
    async fn conflicting_name_aborts_whole_batch_after_partial_writes() {
        let (store, drive) = fixture();
        store
            .put("user-1-files/docs/b.txt", b"old".to_vec(), None)
            .await
            .unwrap();

        let result = drive
            .upload(
                USER,
                "docs/",
                vec![upload_file("a.txt", b"alpha"), upload_file("b.txt", b"new")],
            )
            .await;

        assert!(matches!(result, Err(DriveError::AlreadyExists(_))));
        // Earlier files in the batch are already written; the batch is not
        // transactional and nothing is rolled back.
        assert!(store.contains("user-1-files/docs/a.txt"));
        assert_eq!(store.get("user-1-files/docs/b.txt").await.unwrap(), b"old");
    }

    #[tokio::test]
    async fn invalid_name_rejects_before_any_store_call() {
        let (store, drive) = fixture();
        let result = drive
            .upload(USER, "docs/", vec![upload_file("bad|name.txt", b"x")])
            .await;

        assert!(matches!(result, Err(DriveError::Validation(_))));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn nested_upload_name_lands_under_target_folder() {
        let (store, drive) = fixture();
        drive
            .upload(USER, "docs/", vec![upload_file("sub/c.txt", b"x")])
            .await
            .unwrap();
        assert!(store.contains("user-1-files/docs/sub/c.txt"));
    }
}
