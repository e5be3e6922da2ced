//! Lookups by resource path.
//!
//! Fetches the stored description for a file, or asks the model to explain
//! a file on demand. Used by the `scribe get` and `scribe explain` CLI
//! commands and the matching HTTP endpoints.

use anyhow::{bail, Result};

use crate::context::Scribe;
use crate::error::ScribeError;
use crate::generate::explain_file;
use crate::models::IndexedDocument;
use crate::repo::load_resource;

/// The stored description for `resource_path`.
pub async fn get_description(ctx: &Scribe, resource_path: &str) -> Result<IndexedDocument> {
    match ctx.manager.lookup(resource_path).await? {
        Some(doc) => Ok(doc),
        None => bail!("description not found: {}", resource_path),
    }
}

/// Explain a downloaded file, optionally focused on `question`.
pub async fn explain_resource(
    ctx: &Scribe,
    resource_path: &str,
    question: Option<&str>,
) -> Result<String, ScribeError> {
    let file = load_resource(&ctx.config.repos, resource_path).await?;
    explain_file(
        ctx.generator.as_ref(),
        &file.resource_path,
        &file.content,
        question,
    )
    .await
}

pub async fn run_get(ctx: &Scribe, resource_path: &str) -> Result<()> {
    let doc = get_description(ctx, resource_path).await?;

    println!("--- Description ---");
    println!("path: {}", doc.metadata.source_path);
    println!("key:  {}", doc.key);
    println!();
    println!("{}", doc.text);
    Ok(())
}

pub async fn run_explain(ctx: &Scribe, resource_path: &str, question: Option<&str>) -> Result<()> {
    let explanation = explain_resource(ctx, resource_path, question).await?;
    println!("{}", explanation);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::generate::DisabledGenerator;
    use crate::store::InMemoryIndex;
    use crate::{db, migrate};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn scribe(tmp: &TempDir) -> Scribe {
        let config = parse_config(&format!(
            "[db]\npath = \"{}\"\n[repos]\nroot = \"{}\"\n",
            tmp.path().join("scribe.sqlite").display(),
            tmp.path().join("repos").display()
        ))
        .unwrap();
        let pool = db::connect(&config).await.unwrap();
        migrate::apply_schema(&pool).await.unwrap();
        Scribe::from_parts(
            config,
            pool,
            Arc::new(InMemoryIndex::new()),
            Arc::new(DisabledGenerator),
        )
    }

    #[tokio::test]
    async fn test_get_round_trip_and_not_found() {
        let tmp = TempDir::new().unwrap();
        let ctx = scribe(&tmp).await;
        ctx.manager
            .upsert_description("repo/file.py", "parses tokens")
            .await
            .unwrap();

        let doc = get_description(&ctx, "./repo/file.py").await.unwrap();
        assert_eq!(doc.text, "parses tokens");

        let err = get_description(&ctx, "repo/other.py").await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_get_invalid_path_keeps_error_type() {
        let tmp = TempDir::new().unwrap();
        let ctx = scribe(&tmp).await;
        let err = get_description(&ctx, "").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScribeError>(),
            Some(ScribeError::InvalidResource { .. })
        ));
    }

    #[tokio::test]
    async fn test_explain_with_disabled_model() {
        let tmp = TempDir::new().unwrap();
        let ctx = scribe(&tmp).await;
        let path = ctx.config.repos.root.join("octo/hello/app.py");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "print('hi')").unwrap();

        let err = explain_resource(&ctx, "octo/hello/app.py", None).await.unwrap_err();
        assert!(matches!(err, ScribeError::GenerationFailed(_)));
    }
}
