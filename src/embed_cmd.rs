//! `scribe embed-pending`: backfill description vectors.
//!
//! Descriptions stored while `[embedding].provider = "disabled"`, or
//! embedded by a model other than the configured one, are invisible to
//! semantic search until they are embedded with the active model.

use std::sync::Arc;

use anyhow::Result;

use crate::context::Scribe;
use crate::embedding::create_provider;
use crate::store::SqliteIndex;

pub async fn run_embed_pending(
    ctx: &Scribe,
    limit: Option<usize>,
    batch_size_override: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let embedder = Arc::from(create_provider(&ctx.config.embedding)?);
    let index = SqliteIndex::new(ctx.pool.clone(), embedder);

    if dry_run {
        let pending = index.pending_count().await?;
        println!("embed pending (dry-run)");
        println!("  descriptions needing embeddings: {}", pending);
        return Ok(());
    }

    let batch_size = batch_size_override.unwrap_or(ctx.config.embedding.batch_size);
    let summary = index.embed_pending(batch_size, limit).await?;

    println!("embed pending");
    if summary.pending == 0 {
        println!("  all descriptions up to date");
        return Ok(());
    }
    println!("  total pending: {}", summary.pending);
    println!("  embedded: {}", summary.embedded);
    println!("  failed: {}", summary.failed);
    Ok(())
}
