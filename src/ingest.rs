//! Description pipeline orchestration.
//!
//! Coordinates the describe flow: resolve file → generate description →
//! upsert into the content index. A repository run processes its files with
//! up to `ingest.concurrency` generate+upsert calls in flight; each call is
//! independent, so one failing file never blocks or rolls back another.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::context::Scribe;
use crate::error::ScribeError;
use crate::generate::describe_file;
use crate::models::{IndexedDocument, RepoFile};
use crate::repo::{load_repository_files, load_resource};

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
    pub repository: String,
    pub files: usize,
    pub described: usize,
    pub failed: usize,
    pub dry_run: bool,
}

/// Generate and store the description for one downloaded file.
pub async fn describe_resource(
    ctx: &Scribe,
    resource_path: &str,
) -> Result<IndexedDocument, ScribeError> {
    let file = load_resource(&ctx.config.repos, resource_path).await?;
    describe_and_upsert(ctx, &file).await
}

async fn describe_and_upsert(ctx: &Scribe, file: &RepoFile) -> Result<IndexedDocument, ScribeError> {
    let description =
        describe_file(ctx.generator.as_ref(), &file.resource_path, &file.content).await?;
    ctx.manager
        .upsert_description(&file.resource_path, &description)
        .await
}

/// Describe every file of a downloaded repository.
///
/// Per-file failures are logged and counted. The run itself fails only when
/// the repository cannot be walked.
pub async fn describe_repository(
    ctx: &Scribe,
    name: &str,
    limit: Option<usize>,
    dry_run: bool,
) -> Result<IngestSummary> {
    let mut files = load_repository_files(&ctx.config.repos, name).await?;
    if let Some(lim) = limit {
        files.truncate(lim);
    }

    let mut summary = IngestSummary {
        repository: name.to_string(),
        files: files.len(),
        dry_run,
        ..IngestSummary::default()
    };
    if dry_run {
        return Ok(summary);
    }

    let concurrency = ctx.config.ingest.concurrency.max(1);
    tracing::info!(repo = %name, files = files.len(), concurrency, "describing repository");

    let mut results = stream::iter(files)
        .map(|file| async move {
            let result = describe_and_upsert(ctx, &file).await;
            (file, result)
        })
        .buffer_unordered(concurrency);

    while let Some((file, result)) = results.next().await {
        match result {
            Ok(_) => {
                summary.described += 1;
                tracing::debug!(path = %file.resource_path, "described");
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(path = %file.resource_path, error = %e, "describe failed");
            }
        }
    }

    tracing::info!(
        repo = %name,
        described = summary.described,
        failed = summary.failed,
        "repository described"
    );
    Ok(summary)
}

pub async fn run_describe(ctx: &Scribe, resource_path: &str) -> Result<()> {
    let doc = describe_resource(ctx, resource_path).await?;
    println!("describe {}", doc.metadata.source_path);
    println!("  key: {}", doc.key);
    println!("  model: {}", ctx.generator.model_name());
    println!();
    println!("{}", doc.text);
    Ok(())
}

pub async fn run_describe_repo(
    ctx: &Scribe,
    name: &str,
    limit: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let summary = describe_repository(ctx, name, limit, dry_run).await?;

    if summary.dry_run {
        println!("describe-repo {} (dry-run)", summary.repository);
        println!("  files found: {}", summary.files);
        return Ok(());
    }

    println!("describe-repo {}", summary.repository);
    println!("  files: {}", summary.files);
    println!("  described: {}", summary.described);
    println!("  failed: {}", summary.failed);
    if summary.failed > 0 && summary.described == 0 {
        anyhow::bail!("no files could be described");
    }
    println!("ok");
    Ok(())
}

pub async fn run_upsert(ctx: &Scribe, resource_path: &str, description: &str) -> Result<()> {
    let doc = ctx.manager.upsert_description(resource_path, description).await?;
    println!("upsert {}", doc.metadata.source_path);
    println!("  key: {}", doc.key);
    println!("ok");
    Ok(())
}
