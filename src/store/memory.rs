//! In-memory object store
//!
//! BTreeMap-backed bucket with the same listing semantics as the S3 gateway,
//! including delimiter collapsing for non-recursive listings. Backs the unit
//! tests and works as a throwaway backend for demos. Operation counters let
//! tests assert exactly how many writes a sequence issued.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ObjectInfo, ObjectStore, StoreError};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    puts: AtomicU64,
    copies: AtomicU64,
    deletes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys currently stored, in lexicographic order
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Declared content type of a stored object, if any
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.lock().get(key).and_then(|obj| obj.content_type.clone())
    }

    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn copy_count(&self) -> u64 {
        self.copies.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> u64 {
        self.deletes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>> {
        self.objects.lock().expect("memory store lock poisoned")
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn stat(&self, key: &str) -> Result<ObjectInfo, StoreError> {
        let objects = self.lock();
        match objects.get(key) {
            Some(obj) => Ok(ObjectInfo {
                key: key.to_string(),
                size: obj.data.len() as u64,
            }),
            None => Err(StoreError::NoSuchKey(key.to_string())),
        }
    }

    async fn list(&self, prefix: &str, recursive: bool) -> Result<Vec<ObjectInfo>, StoreError> {
        let objects = self.lock();
        let mut entries = Vec::new();
        let mut seen_prefixes = BTreeSet::new();

        for (key, obj) in objects.iter() {
            if !key.starts_with(prefix) {
                continue;
            }
            let rest = &key[prefix.len()..];
            if recursive || !rest.contains('/') {
                entries.push(ObjectInfo {
                    key: key.clone(),
                    size: obj.data.len() as u64,
                });
            } else {
                // Collapse everything below the first delimiter into one
                // common-prefix entry, the way ListObjectsV2 does.
                let pos = rest.find('/').unwrap_or(rest.len() - 1);
                let collapsed = format!("{}{}", prefix, &rest[..=pos]);
                if seen_prefixes.insert(collapsed.clone()) {
                    entries.push(ObjectInfo {
                        key: collapsed,
                        size: 0,
                    });
                }
            }
        }

        Ok(entries)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.lock();
        match objects.get(key) {
            Some(obj) => Ok(obj.data.clone()),
            None => Err(StoreError::NoSuchKey(key.to_string())),
        }
    }

    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        self.lock().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.map(|ct| ct.to_string()),
            },
        );
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn copy(&self, source_key: &str, dest_key: &str) -> Result<(), StoreError> {
        let mut objects = self.lock();
        let source = objects
            .get(source_key)
            .cloned()
            .ok_or_else(|| StoreError::NoSuchKey(source_key.to_string()))?;
        objects.insert(dest_key.to_string(), source);
        self.copies.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let removed = self.lock().remove(key);
        if removed.is_none() {
            return Err(StoreError::NoSuchKey(key.to_string()));
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for key in [
            "user-1-files/a.txt",
            "user-1-files/docs/",
            "user-1-files/docs/b.txt",
            "user-1-files/docs/sub/c.txt",
        ] {
            store.put(key, b"x".to_vec(), None).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn recursive_listing_returns_every_descendant() {
        let store = seeded().await;
        let keys: Vec<String> = store
            .list("user-1-files/docs/", true)
            .await
            .unwrap()
            .into_iter()
            .map(|info| info.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "user-1-files/docs/",
                "user-1-files/docs/b.txt",
                "user-1-files/docs/sub/c.txt"
            ]
        );
    }

    #[tokio::test]
    async fn single_level_listing_collapses_deeper_keys() {
        let store = seeded().await;
        let keys: Vec<String> = store
            .list("user-1-files/docs/", false)
            .await
            .unwrap()
            .into_iter()
            .map(|info| info.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "user-1-files/docs/",
                "user-1-files/docs/b.txt",
                "user-1-files/docs/sub/"
            ]
        );
    }

    #[tokio::test]
    async fn stat_and_get_distinguish_missing_keys() {
        let store = seeded().await;
        assert!(store.stat("user-1-files/a.txt").await.is_ok());
        assert!(matches!(
            store.stat("user-1-files/missing").await,
            Err(StoreError::NoSuchKey(_))
        ));
        assert!(matches!(
            store.get("user-1-files/missing").await,
            Err(StoreError::NoSuchKey(_))
        ));
    }

    #[tokio::test]
    async fn copy_duplicates_bytes_under_new_key() {
        let store = seeded().await;
        store
            .copy("user-1-files/a.txt", "user-1-files/b.txt")
            .await
            .unwrap();
        assert_eq!(store.get("user-1-files/b.txt").await.unwrap(), b"x");
        assert_eq!(store.copy_count(), 1);
    }
}
