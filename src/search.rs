//! Namespace search: linear lower-cased substring scan
//!
//! Lists the user's whole namespace on every call and matches the query
//! against each key. Linear in total object count; there is no index.

use crate::descriptor::{ResourceDescriptor, ResourceKind, UserId};
use crate::drive::Drive;
use crate::error::DriveError;
use crate::{naming, paths};

impl Drive {
    /// Find every resource whose key contains `query`, case-insensitively.
    ///
    /// Only the blankness rule applies to the query; reserved punctuation is
    /// searchable.
    pub async fn search(
        &self,
        user: UserId,
        query: &str,
    ) -> Result<Vec<ResourceDescriptor>, DriveError> {
        naming::validate_query(query)?;

        let prefix = paths::namespace_prefix(user);
        let needle = query.to_lowercase();

        let items = self
            .store
            .list(&prefix, true)
            .await
            .map_err(|e| DriveError::Store(e.to_string()))?;

        let mut matches = Vec::new();
        for item in items {
            if !item.key.to_lowercase().contains(&needle) {
                continue;
            }
            let is_directory = item.key.ends_with('/');
            matches.push(ResourceDescriptor {
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
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::descriptor::UserId;
    use crate::error::DriveError;
    use crate::store::{MemoryStore, ObjectStore};
    use crate::Drive;

    const USER: UserId = UserId(1);

    fn fixture() -> (Arc<MemoryStore>, Drive) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Drive::new(store))
    }

    #[tokio::test]
    async fn substring_match_is_case_insensitive() {
        let (store, drive) = fixture();
        store
            .put("user-1-files/reports/q1.csv", b"x".to_vec(), None)
            .await
            .unwrap();
        store
            .put("user-1-files/draft.txt", b"y".to_vec(), None)
            .await
            .unwrap();

        for query in ["rep", "REP"] {
            let matches = drive.search(USER, query).await.unwrap();
            assert_eq!(matches.len(), 1, "query {:?}", query);
            assert_eq!(matches[0].name, "q1.csv");
            assert_eq!(matches[0].parent_path, "reports/");
        }
    }

    #[tokio::test]
    async fn directories_match_and_classify() {
        let (store, drive) = fixture();
        store
            .put("user-1-files/reports/", Vec::new(), None)
            .await
            .unwrap();

        let matches = drive.search(USER, "reports").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "reports/");
        assert_eq!(matches[0].size, None);
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let (_, drive) = fixture();
        assert!(matches!(
            drive.search(USER, "  ").await,
            Err(DriveError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn scan_stays_inside_the_namespace() {
        let (store, drive) = fixture();
        store
            .put("user-2-files/report.txt", b"x".to_vec(), None)
            .await
            .unwrap();

        assert!(drive.search(USER, "report").await.unwrap().is_empty());
    }
}
