//! Idempotent upsert of file descriptions.
//!
//! [`UpsertManager`] is the one write path for descriptions: it derives the
//! stable key for a resource path and submits a single insert-or-replace to
//! the content index. Re-running it for the same path replaces the previous
//! description instead of adding a second document.
//!
//! The manager keeps no state of its own; concurrent calls for the same path
//! are last-write-wins as serialized by the index.

use std::sync::Arc;

use crate::error::ScribeError;
use crate::identity::{key_for_normalized, normalize_path, ResourceKey};
use crate::models::{DocumentMetadata, IndexedDocument};
use crate::store::ContentIndex;

#[derive(Clone)]
pub struct UpsertManager {
    index: Arc<dyn ContentIndex>,
}

impl UpsertManager {
    pub fn new(index: Arc<dyn ContentIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &Arc<dyn ContentIndex> {
        &self.index
    }

    /// Derive the key a path would be stored under. No side effects.
    pub fn derive_key(&self, resource_path: &str) -> Result<ResourceKey, ScribeError> {
        crate::identity::derive_key(resource_path)
    }

    /// Insert or replace the description for `resource_path`.
    ///
    /// The path is validated before anything is sent to the index, so an
    /// `InvalidResource` error means no write was attempted. On
    /// `IndexUnavailable` the previously stored description, if any, is
    /// unchanged and the call can be retried as-is.
    pub async fn upsert_description(
        &self,
        resource_path: &str,
        description: &str,
    ) -> Result<IndexedDocument, ScribeError> {
        let normalized = normalize_path(resource_path)?;
        let doc = IndexedDocument {
            key: key_for_normalized(&normalized),
            text: description.to_string(),
            metadata: DocumentMetadata {
                source_path: normalized,
            },
        };

        self.index
            .upsert(&doc)
            .await
            .map_err(ScribeError::index_unavailable)?;

        tracing::debug!(path = %doc.metadata.source_path, key = %doc.key, "description upserted");
        Ok(doc)
    }

    /// The stored description for `resource_path`, if any.
    pub async fn lookup(&self, resource_path: &str) -> Result<Option<IndexedDocument>, ScribeError> {
        let key = self.derive_key(resource_path)?;
        self.index
            .get(&key)
            .await
            .map_err(ScribeError::index_unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::derive_key;
    use crate::models::SearchHit;
    use crate::store::InMemoryIndex;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts writes before delegating to an in-memory index.
    struct CountingIndex {
        inner: InMemoryIndex,
        writes: AtomicUsize,
    }

    impl CountingIndex {
        fn new() -> Self {
            Self {
                inner: InMemoryIndex::new(),
                writes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ContentIndex for CountingIndex {
        async fn upsert(&self, doc: &IndexedDocument) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(doc).await
        }
        async fn query(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
            self.inner.query(text, limit).await
        }
        async fn get(&self, key: &ResourceKey) -> Result<Option<IndexedDocument>> {
            self.inner.get(key).await
        }
        async fn delete_by_source_prefix(&self, prefix: &str) -> Result<u64> {
            self.inner.delete_by_source_prefix(prefix).await
        }
        async fn count(&self) -> Result<u64> {
            self.inner.count().await
        }
    }

    struct FailingIndex;

    #[async_trait]
    impl ContentIndex for FailingIndex {
        async fn upsert(&self, _doc: &IndexedDocument) -> Result<()> {
            anyhow::bail!("vector store offline")
        }
        async fn query(&self, _text: &str, _limit: usize) -> Result<Vec<SearchHit>> {
            anyhow::bail!("vector store offline")
        }
        async fn get(&self, _key: &ResourceKey) -> Result<Option<IndexedDocument>> {
            anyhow::bail!("vector store offline")
        }
        async fn delete_by_source_prefix(&self, _prefix: &str) -> Result<u64> {
            anyhow::bail!("vector store offline")
        }
        async fn count(&self) -> Result<u64> {
            anyhow::bail!("vector store offline")
        }
    }

    fn manager() -> (UpsertManager, Arc<CountingIndex>) {
        let index = Arc::new(CountingIndex::new());
        (UpsertManager::new(index.clone()), index)
    }

    #[tokio::test]
    async fn test_repeated_upsert_keeps_one_document() {
        let (mgr, index) = manager();
        mgr.upsert_description("repo/file.py", "parses tokens").await.unwrap();
        mgr.upsert_description("repo/file.py", "parses tokens").await.unwrap();

        assert_eq!(index.count().await.unwrap(), 1);
        let stored = mgr.lookup("repo/file.py").await.unwrap().unwrap();
        assert_eq!(stored.text, "parses tokens");
    }

    #[tokio::test]
    async fn test_later_description_replaces_earlier() {
        let (mgr, index) = manager();
        mgr.upsert_description("repo/file.py", "first draft").await.unwrap();
        mgr.upsert_description("repo/file.py", "final text").await.unwrap();

        assert_eq!(index.count().await.unwrap(), 1);
        let stored = mgr.lookup("repo/file.py").await.unwrap().unwrap();
        assert_eq!(stored.text, "final text");
        assert!(index.query("draft", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_distinct_paths_coexist() {
        let (mgr, index) = manager();
        let a = mgr.upsert_description("a/b.txt", "one").await.unwrap();
        let c = mgr.upsert_description("c/d.txt", "two").await.unwrap();

        assert_ne!(a.key, c.key);
        assert_eq!(index.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_invalid_path_issues_no_write() {
        let (mgr, index) = manager();
        for path in ["", "   ", "/", "repo/../etc/passwd"] {
            let err = mgr.upsert_description(path, "text").await.unwrap_err();
            assert!(matches!(err, ScribeError::InvalidResource { .. }), "{path:?}");
        }
        assert_eq!(index.writes.load(Ordering::SeqCst), 0);
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_round_trip_by_derived_key() {
        let (mgr, index) = manager();
        mgr.upsert_description("repo/file.py", "parses tokens").await.unwrap();

        let doc = index
            .get(&derive_key("repo/file.py").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.metadata.source_path, "repo/file.py");
        assert_eq!(doc.text, "parses tokens");
    }

    #[tokio::test]
    async fn test_equivalent_spellings_update_same_document() {
        let (mgr, index) = manager();
        mgr.upsert_description("repo/src/lib.rs", "v1").await.unwrap();
        mgr.upsert_description("repo\\src\\lib.rs", "v2").await.unwrap();

        assert_eq!(index.count().await.unwrap(), 1);
        let doc = mgr.lookup("repo/src/lib.rs").await.unwrap().unwrap();
        assert_eq!(doc.text, "v2");
        assert_eq!(doc.metadata.source_path, "repo/src/lib.rs");
    }

    #[tokio::test]
    async fn test_index_failure_is_index_unavailable() {
        let mgr = UpsertManager::new(Arc::new(FailingIndex));
        let err = mgr.upsert_description("repo/file.py", "x").await.unwrap_err();
        assert!(matches!(err, ScribeError::IndexUnavailable(_)));
        assert!(err.to_string().contains("vector store offline"));
    }

    #[tokio::test]
    async fn test_concurrent_upserts_leave_one_document() {
        let (mgr, index) = manager();
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let mgr = mgr.clone();
                tokio::spawn(async move {
                    mgr.upsert_description("repo/hot.rs", &format!("v{i}")).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(index.count().await.unwrap(), 1);
    }
}
