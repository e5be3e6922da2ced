//! Content index abstraction.
//!
//! The [`ContentIndex`] trait is the only surface the description
//! lifecycle needs from a vector store: keyed upsert, similarity query,
//! point lookup, and the prefix delete used when a repository is removed.
//!
//! Implementations must be `Send + Sync` so one index can be shared by
//! every request handler and every in-flight file of an ingestion run.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::identity::ResourceKey;
use crate::models::{IndexedDocument, SearchHit};

pub use memory::InMemoryIndex;
pub use sqlite::{EmbedSummary, SqliteIndex};

/// Abstract storage backend for file descriptions.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert`](ContentIndex::upsert) | Insert, or replace in place, the document for `doc.key` |
/// | [`query`](ContentIndex::query) | Best-matching documents for a text query |
/// | [`get`](ContentIndex::get) | The current document for a key |
/// | [`delete_by_source_prefix`](ContentIndex::delete_by_source_prefix) | Drop every document under a path prefix |
/// | [`count`](ContentIndex::count) | Number of stored documents |
#[async_trait]
pub trait ContentIndex: Send + Sync {
    /// Insert-or-replace keyed by `doc.key`.
    ///
    /// Must be a single atomic operation: on error the previous document,
    /// if any, is left untouched.
    async fn upsert(&self, doc: &IndexedDocument) -> Result<()>;

    /// Return at most `limit` documents ordered by descending score.
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>>;

    async fn get(&self, key: &ResourceKey) -> Result<Option<IndexedDocument>>;

    /// Delete documents whose `source_path` starts with `prefix`.
    /// Returns the number of documents removed.
    async fn delete_by_source_prefix(&self, prefix: &str) -> Result<u64>;

    async fn count(&self) -> Result<u64>;
}

/// Score a text against query terms by counting distinct terms it contains.
///
/// Used by backends that have no embeddings to fall back on.
pub(crate) fn term_match_score(terms: &[String], text: &str) -> f64 {
    let lower = text.to_lowercase();
    terms.iter().filter(|t| lower.contains(t.as_str())).count() as f64
}

pub(crate) fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    terms.sort();
    terms.dedup();
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_terms_dedup_lowercase() {
        assert_eq!(query_terms("Parse parse TOKENS"), vec!["parse", "tokens"]);
        assert!(query_terms("   ").is_empty());
    }

    #[test]
    fn test_term_match_score() {
        let terms = query_terms("http router");
        assert_eq!(term_match_score(&terms, "An HTTP Router for axum"), 2.0);
        assert_eq!(term_match_score(&terms, "database pool"), 0.0);
    }
}
