//! In-memory [`ContentIndex`] for tests and embedded use.
//!
//! Documents live in a `HashMap` keyed by [`ResourceKey`] behind a tokio
//! `RwLock`. Queries are scored by term matching; there are no vectors.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::ResourceKey;
use crate::models::{IndexedDocument, SearchHit};

use super::{query_terms, term_match_score, ContentIndex};

pub struct InMemoryIndex {
    docs: RwLock<HashMap<ResourceKey, IndexedDocument>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentIndex for InMemoryIndex {
    async fn upsert(&self, doc: &IndexedDocument) -> Result<()> {
        self.docs.write().await.insert(doc.key.clone(), doc.clone());
        Ok(())
    }

    async fn query(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let terms = query_terms(text);
        if terms.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let docs = self.docs.read().await;
        let mut hits: Vec<SearchHit> = docs
            .values()
            .filter_map(|doc| {
                let score = term_match_score(&terms, &doc.text);
                (score > 0.0).then(|| SearchHit {
                    key: doc.key.clone(),
                    text: doc.text.clone(),
                    metadata: doc.metadata.clone(),
                    score,
                })
            })
            .collect();

        // Ties broken by path so results are deterministic.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.metadata.source_path.cmp(&b.metadata.source_path))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn get(&self, key: &ResourceKey) -> Result<Option<IndexedDocument>> {
        Ok(self.docs.read().await.get(key).cloned())
    }

    async fn delete_by_source_prefix(&self, prefix: &str) -> Result<u64> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|_, d| !d.metadata.source_path.starts_with(prefix));
        Ok((before - docs.len()) as u64)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.docs.read().await.len() as u64)
    }
}
