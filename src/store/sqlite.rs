//! SQLite-backed [`ContentIndex`].
//!
//! Each description is one row of the `descriptions` table keyed by its
//! [`ResourceKey`]. The embedding is computed before the row is written, so
//! a provider failure leaves the previous row exactly as it was. When the
//! stored text is unchanged (same `text_hash` and model) the stored vector
//! is reused instead of calling the provider again.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};

use crate::embedding::{blob_to_vec, cosine_similarity, embed_one, vec_to_blob, EmbeddingProvider};
use crate::identity::ResourceKey;
use crate::models::{DocumentMetadata, IndexedDocument, SearchHit};

use super::{query_terms, term_match_score, ContentIndex};

pub struct SqliteIndex {
    pool: SqlitePool,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SqliteIndex {
    pub fn new(pool: SqlitePool, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { pool, embedder }
    }

    /// Vector for `doc`, reusing the stored one when the text has not changed.
    async fn embedding_for(&self, doc: &IndexedDocument, text_hash: &str) -> Result<Option<Vec<f32>>> {
        if !self.embedder.is_enabled() {
            return Ok(None);
        }

        let existing = sqlx::query(
            "SELECT text_hash, model, embedding FROM descriptions WHERE key = ?",
        )
        .bind(doc.key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = existing {
            let stored_hash: String = row.get("text_hash");
            let model: Option<String> = row.get("model");
            let blob: Option<Vec<u8>> = row.get("embedding");
            if stored_hash == text_hash && model.as_deref() == Some(self.embedder.model_name()) {
                if let Some(blob) = blob {
                    let vector = blob_to_vec(&blob);
                    if vector.len() == self.embedder.dims() {
                        return Ok(Some(vector));
                    }
                }
            }
        }

        let vector = embed_one(self.embedder.as_ref(), &doc.text)
            .await
            .with_context(|| format!("Failed to embed description for {}", doc.metadata.source_path))?;
        Ok(Some(vector))
    }

    async fn query_by_vector(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let query_vec = embed_one(self.embedder.as_ref(), text)
            .await
            .context("Failed to embed query")?;

        // Vectors from another model live in a different space.
        let rows = sqlx::query(
            r#"
            SELECT key, source_path, text, embedding FROM descriptions
            WHERE embedding IS NOT NULL AND model = ? AND dims = ?
            "#,
        )
        .bind(self.embedder.model_name())
        .bind(self.embedder.dims() as i64)
        .fetch_all(&self.pool)
        .await?;

        let mut hits: Vec<SearchHit> = rows
            .iter()
            .map(|row| {
                let blob: Vec<u8> = row.get("embedding");
                let score = cosine_similarity(&query_vec, &blob_to_vec(&blob)) as f64;
                hit_from_row(row, score)
            })
            .collect();

        rank(&mut hits, limit);
        Ok(hits)
    }

    /// Rows without a vector from the active model: written while embeddings
    /// were disabled, or embedded by a different model or width.
    async fn find_pending(&self) -> Result<Vec<PendingRow>> {
        let rows = sqlx::query(
            r#"
            SELECT key, text, text_hash FROM descriptions
            WHERE embedding IS NULL OR model IS NOT ? OR dims IS NOT ?
            ORDER BY updated_at, key
            "#,
        )
        .bind(self.embedder.model_name())
        .bind(self.embedder.dims() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| PendingRow {
                key: row.get("key"),
                text: row.get("text"),
                text_hash: row.get("text_hash"),
            })
            .collect())
    }

    /// Number of rows [`SqliteIndex::embed_pending`] would embed.
    pub async fn pending_count(&self) -> Result<usize> {
        if !self.embedder.is_enabled() {
            return Ok(0);
        }
        Ok(self.find_pending().await?.len())
    }

    /// Embed stored descriptions that have no usable vector.
    ///
    /// Runs `batch_size` texts per provider call. A failed batch is counted
    /// and skipped. The vector is only stored if the row still carries the
    /// text that was embedded.
    pub async fn embed_pending(&self, batch_size: usize, limit: Option<usize>) -> Result<EmbedSummary> {
        if !self.embedder.is_enabled() {
            anyhow::bail!("Embedding provider is disabled. Set [embedding].provider first.");
        }

        let mut pending = self.find_pending().await?;
        if let Some(lim) = limit {
            pending.truncate(lim);
        }

        let mut summary = EmbedSummary {
            pending: pending.len(),
            ..EmbedSummary::default()
        };
        let model = self.embedder.model_name().to_string();
        let dims = self.embedder.dims();

        for batch in pending.chunks(batch_size.max(1)) {
            let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
            let vectors = match self.embedder.embed(&texts).await {
                Ok(v) if v.len() == batch.len() => v,
                Ok(v) => {
                    tracing::warn!(expected = batch.len(), got = v.len(), "embedding batch size mismatch");
                    summary.failed += batch.len();
                    continue;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "embedding batch failed");
                    summary.failed += batch.len();
                    continue;
                }
            };

            for (row, vector) in batch.iter().zip(vectors.iter()) {
                if vector.len() != dims {
                    summary.failed += 1;
                    continue;
                }
                sqlx::query(
                    r#"
                    UPDATE descriptions SET model = ?, dims = ?, embedding = ?
                    WHERE key = ? AND text_hash = ?
                    "#,
                )
                .bind(&model)
                .bind(dims as i64)
                .bind(vec_to_blob(vector))
                .bind(&row.key)
                .bind(&row.text_hash)
                .execute(&self.pool)
                .await?;
                summary.embedded += 1;
            }
        }

        tracing::info!(
            pending = summary.pending,
            embedded = summary.embedded,
            failed = summary.failed,
            "pending embeddings processed"
        );
        Ok(summary)
    }

    async fn query_by_terms(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let terms = query_terms(text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query("SELECT key, source_path, text FROM descriptions")
            .fetch_all(&self.pool)
            .await?;

        let mut hits: Vec<SearchHit> = rows
            .iter()
            .filter_map(|row| {
                let body: String = row.get("text");
                let score = term_match_score(&terms, &body);
                (score > 0.0).then(|| hit_from_row(row, score))
            })
            .collect();

        rank(&mut hits, limit);
        Ok(hits)
    }
}

struct PendingRow {
    key: String,
    text: String,
    text_hash: String,
}

/// Outcome of [`SqliteIndex::embed_pending`].
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct EmbedSummary {
    pub pending: usize,
    pub embedded: usize,
    pub failed: usize,
}

fn hit_from_row(row: &sqlx::sqlite::SqliteRow, score: f64) -> SearchHit {
    SearchHit {
        key: ResourceKey::from_stored(row.get::<String, _>("key")),
        text: row.get("text"),
        metadata: DocumentMetadata {
            source_path: row.get("source_path"),
        },
        score,
    }
}

fn rank(hits: &mut Vec<SearchHit>, limit: usize) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.metadata.source_path.cmp(&b.metadata.source_path))
    });
    hits.truncate(limit);
}

fn text_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[async_trait]
impl ContentIndex for SqliteIndex {
    async fn upsert(&self, doc: &IndexedDocument) -> Result<()> {
        let hash = text_hash(&doc.text);
        let embedding = self.embedding_for(doc, &hash).await?;
        let (model, dims, blob) = match &embedding {
            Some(v) => (
                Some(self.embedder.model_name().to_string()),
                Some(v.len() as i64),
                Some(vec_to_blob(v)),
            ),
            None => (None, None, None),
        };
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO descriptions (key, source_path, text, text_hash, model, dims, embedding, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                source_path = excluded.source_path,
                text = excluded.text,
                text_hash = excluded.text_hash,
                model = excluded.model,
                dims = excluded.dims,
                embedding = excluded.embedding,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(doc.key.as_str())
        .bind(&doc.metadata.source_path)
        .bind(&doc.text)
        .bind(&hash)
        .bind(model)
        .bind(dims)
        .bind(blob)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write description for {}", doc.metadata.source_path))?;

        Ok(())
    }

    async fn query(&self, text: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if text.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        if self.embedder.is_enabled() {
            self.query_by_vector(text, limit).await
        } else {
            self.query_by_terms(text, limit).await
        }
    }

    async fn get(&self, key: &ResourceKey) -> Result<Option<IndexedDocument>> {
        let row = sqlx::query("SELECT key, source_path, text FROM descriptions WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| IndexedDocument {
            key: ResourceKey::from_stored(row.get::<String, _>("key")),
            text: row.get("text"),
            metadata: DocumentMetadata {
                source_path: row.get("source_path"),
            },
        }))
    }

    async fn delete_by_source_prefix(&self, prefix: &str) -> Result<u64> {
        // substr avoids LIKE wildcards in repository names.
        let result = sqlx::query(
            "DELETE FROM descriptions WHERE substr(source_path, 1, length(?1)) = ?1",
        )
        .bind(prefix)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM descriptions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
