//! Semantic search over stored descriptions.
//!
//! Shared by the `scribe search` CLI command and `POST /search`.

use anyhow::Result;

use crate::context::Scribe;
use crate::error::ScribeError;
use crate::models::SearchHit;

/// Best-matching descriptions for `query`.
///
/// `limit` defaults to `retrieval.default_limit` and is clamped to
/// `retrieval.max_limit`. A blank query returns no hits without touching
/// the index.
pub async fn search_descriptions(
    ctx: &Scribe,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<SearchHit>, ScribeError> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let retrieval = &ctx.config.retrieval;
    let limit = limit
        .unwrap_or(retrieval.default_limit)
        .clamp(1, retrieval.max_limit);

    ctx.index()
        .query(query, limit)
        .await
        .map_err(ScribeError::index_unavailable)
}

pub async fn run_search(ctx: &Scribe, query: &str, limit: Option<usize>) -> Result<()> {
    let hits = search_descriptions(ctx, query, limit).await?;

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!("{}. [{:.2}] {}", i + 1, hit.score, hit.metadata.source_path);
        println!("    key: {}", hit.key);
        println!("    description: \"{}\"", excerpt(&hit.text, 240));
        println!();
    }

    Ok(())
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
