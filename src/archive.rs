//! Downloads: single files directly, folders as zip archives
//!
//! A folder download walks every descendant key and streams each object into
//! a zip entry named by its path relative to the folder's parent, so the
//! folder appears as the archive's top-level directory with its nested
//! structure intact. The zip writer and buffers are scoped values; any
//! gateway failure mid-walk aborts the whole call.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::descriptor::{DownloadPayload, UserId};
use crate::drive::Drive;
use crate::error::DriveError;
use crate::paths;

impl Drive {
    /// Download a file, or a folder bundled as a zip archive.
    ///
    /// The payload's `file_name` is the attachment name: the leaf name for a
    /// file, the leaf name plus `.zip` for a folder. An empty folder still
    /// yields a non-empty archive containing one explicit directory entry.
    pub async fn download(
        &self,
        user: UserId,
        client_path: &str,
    ) -> Result<DownloadPayload, DriveError> {
        if client_path.is_empty() {
            return Err(DriveError::Validation("missing path".to_string()));
        }

        let key = paths::full_key(user, client_path);

        if !key.ends_with('/') {
            let bytes = self.store.get(&key).await?;
            return Ok(DownloadPayload {
                file_name: paths::leaf_name(&key),
                bytes,
            });
        }

        let items = self
            .store
            .list(&key, true)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;

        let folder_leaf = paths::leaf_name(&key);
        // Entry names are relative to the folder's parent, so the folder
        // itself becomes the archive's top-level directory.
        let base = key.len() - folder_leaf.len();

        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut wrote_entry = false;

        for item in &items {
            if item.key == key {
                continue;
            }
            let entry_name = &item.key[base..];

            if entry_name.ends_with('/') {
                // Nested directory marker: becomes an explicit directory entry
                writer
                    .add_directory(entry_name.trim_end_matches('/'), options)
                    .map_err(|e| DriveError::Store(e.to_string()))?;
                wrote_entry = true;
                continue;
            }

            let bytes = self
                .store
                .get(&item.key)
                .await
                .map_err(|e| DriveError::Store(e.to_string()))?;
            writer
                .start_file(entry_name, options)
                .map_err(|e| DriveError::Store(e.to_string()))?;
            writer
                .write_all(&bytes)
                .map_err(|e| DriveError::Store(e.to_string()))?;
            wrote_entry = true;
        }

        if !wrote_entry {
            writer
                .add_directory(folder_leaf.trim_end_matches('/'), options)
                .map_err(|e| DriveError::Store(e.to_string()))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| DriveError::Store(e.to_string()))?;

        Ok(DownloadPayload {
            file_name: format!("{}.zip", folder_leaf.trim_end_matches('/')),
            bytes: cursor.into_inner(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};
    use std::sync::Arc;

    use zip::ZipArchive;

    use crate::descriptor::UserId;
    use crate::error::DriveError;
    use crate::store::{MemoryStore, ObjectStore};
    use crate::Drive;

    const USER: UserId = UserId(1);

    fn fixture() -> (Arc<MemoryStore>, Drive) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Drive::new(store))
    }

    fn open_archive(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes)).expect("valid zip payload")
    }

    #[tokio::test]
    async fn file_download_returns_raw_bytes_and_leaf_name() {
        let (store, drive) = fixture();
        store
            .put("user-1-files/docs/a.txt", b"hello".to_vec(), None)
            .await
            .unwrap();

        let payload = drive.download(USER, "docs/a.txt").await.unwrap();
        assert_eq!(payload.file_name, "a.txt");
        assert_eq!(payload.bytes, b"hello");
    }

    #[tokio::test]
    async fn missing_file_download_fails_not_found() {
        let (_, drive) = fixture();
        assert!(matches!(
            drive.download(USER, "nope.txt").await,
            Err(DriveError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn folder_download_bundles_descendants_with_nested_names() {
        let (store, drive) = fixture();
        store
            .put("user-1-files/docs/", Vec::new(), None)
            .await
            .unwrap();
        store
            .put("user-1-files/docs/a.txt", b"alpha".to_vec(), None)
            .await
            .unwrap();
        store
            .put("user-1-files/docs/b/c.txt", b"gamma".to_vec(), None)
            .await
            .unwrap();

        let payload = drive.download(USER, "docs/").await.unwrap();
        assert_eq!(payload.file_name, "docs.zip");

        let mut archive = open_archive(payload.bytes);
        assert_eq!(archive.len(), 2);

        let mut alpha = String::new();
        archive
            .by_name("docs/a.txt")
            .unwrap()
            .read_to_string(&mut alpha)
            .unwrap();
        assert_eq!(alpha, "alpha");

        let mut gamma = String::new();
        archive
            .by_name("docs/b/c.txt")
            .unwrap()
            .read_to_string(&mut gamma)
            .unwrap();
        assert_eq!(gamma, "gamma");
    }

    #[tokio::test]
    async fn empty_folder_download_contains_one_directory_entry() {
        let (store, drive) = fixture();
        store
            .put("user-1-files/empty/", Vec::new(), None)
            .await
            .unwrap();

        let payload = drive.download(USER, "empty/").await.unwrap();
        assert_eq!(payload.file_name, "empty.zip");

        let mut archive = open_archive(payload.bytes);
        assert_eq!(archive.len(), 1);
        let entry = archive.by_index(0).unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.name(), "empty/");
    }

    #[tokio::test]
    async fn nested_directory_markers_become_directory_entries() {
        let (store, drive) = fixture();
        store
            .put("user-1-files/docs/", Vec::new(), None)
            .await
            .unwrap();
        store
            .put("user-1-files/docs/sub/", Vec::new(), None)
            .await
            .unwrap();

        let payload = drive.download(USER, "docs/").await.unwrap();
        let mut archive = open_archive(payload.bytes);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), "docs/sub/");
    }
}
