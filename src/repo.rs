//! Downloaded repositories.
//!
//! Repositories are cloned with the system `git` binary into
//! `<repos.root>/<owner>/<repo>`, so every file has a resource path of the
//! form `owner/repo/relative/path`. That path is what key derivation hashes
//! and what search results report back.
//!
//! # Requirements
//!
//! `git` must be on `PATH`. Authentication for private repositories uses
//! whatever the local git setup provides (SSH agent, credential helper).

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

use crate::config::{Config, ReposConfig};
use crate::context::Scribe;
use crate::error::ScribeError;
use crate::identity::normalize_path;
use crate::models::{RepoFile, Repository};

const URL_PREFIXES: &[&str] = &["https://", "http://", "git://", "ssh://"];

/// `owner/repo` for a clone URL.
///
/// Accepts `https://host/owner/repo(.git)`, the `http`, `git` and `ssh`
/// schemes, and scp-style `git@host:owner/repo(.git)`.
pub fn repo_slug(url: &str) -> Result<String> {
    let url = url.trim();
    let path = if let Some(prefix) = URL_PREFIXES.iter().find(|p| url.starts_with(**p)) {
        let rest = &url[prefix.len()..];
        match rest.split_once('/') {
            Some((_host, path)) => path,
            None => bail!("Repository URL has no path: {}", url),
        }
    } else if let Some(rest) = url.strip_prefix("git@") {
        match rest.split_once(':') {
            Some((_host, path)) => path,
            None => bail!("Repository URL has no path: {}", url),
        }
    } else {
        bail!(
            "Unsupported repository URL: {} (expected https://, http://, git://, ssh:// or git@)",
            url
        );
    };

    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() != 2 {
        // Nested groups (`group/sub/repo`) would collide on `sub/repo`.
        bail!(
            "Repository URL must name exactly an owner and a repository: {}",
            url
        );
    }

    let name = format!("{}/{}", segments[0], segments[1]);
    validate_repo_name(&name)?;
    Ok(name)
}

/// Check that `name` is a plain `owner/repo` pair.
pub fn validate_repo_name(name: &str) -> Result<()> {
    let segments: Vec<&str> = name.split('/').collect();
    let valid_segment = |s: &str| {
        !s.is_empty()
            && s != "."
            && s != ".."
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    if segments.len() != 2 || !segments.iter().all(|s| valid_segment(s)) {
        bail!("Invalid repository name '{}': expected owner/repo", name);
    }
    Ok(())
}

pub fn repo_dir(config: &ReposConfig, name: &str) -> PathBuf {
    config.root.join(name)
}

/// Clone `url`, or fast-forward an existing clone, and return its record.
///
/// Blocking: runs `git` as a child process.
pub fn download_repository(config: &Config, url: &str) -> Result<Repository> {
    let name = repo_slug(url)?;
    let dest = repo_dir(&config.repos, &name);

    if dest.join(".git").exists() {
        tracing::info!(repo = %name, "updating existing clone");
        git_pull(&dest)?;
    } else {
        tracing::info!(repo = %name, url, "cloning");
        git_clone(url, config.repos.shallow, &dest)?;
    }

    let head_sha = match git_head_sha(&dest) {
        Ok(sha) => Some(sha),
        Err(e) => {
            tracing::warn!(repo = %name, error = %e, "could not read HEAD");
            None
        }
    };

    Ok(Repository {
        name,
        url: url.trim().to_string(),
        local_path: dest,
        head_sha,
        downloaded_at: chrono::Utc::now().to_rfc3339(),
    })
}

fn git_clone(url: &str, shallow: bool, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut cmd = Command::new("git");
    cmd.args(["clone", "--single-branch"]);
    if shallow {
        cmd.args(["--depth", "1"]);
    }
    cmd.arg("--").arg(url).arg(dest);

    let output = cmd
        .output()
        .with_context(|| "Failed to execute 'git clone'. Is git installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git clone failed: {}", stderr.trim());
    }

    Ok(())
}

fn git_pull(repo_dir: &Path) -> Result<()> {
    let output = Command::new("git")
        .args(["pull", "--ff-only"])
        .current_dir(repo_dir)
        .output()
        .with_context(|| "Failed to execute 'git pull'")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git pull failed: {}", stderr.trim());
    }

    Ok(())
}

fn git_head_sha(repo_dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .with_context(|| "Failed to get HEAD SHA")?;

    if !output.status.success() {
        bail!("git rev-parse HEAD failed");
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob: {}", pattern))?);
    }
    Ok(builder.build()?)
}

/// Text files of a downloaded repository, sorted by relative path.
///
/// Applies `include_globs`/`exclude_globs` plus the default excludes
/// (`.git`, `target`, `node_modules`). Files over `max_file_bytes` and
/// files that are not valid UTF-8 are skipped.
pub fn walk_files(config: &ReposConfig, name: &str) -> Result<Vec<RepoFile>> {
    validate_repo_name(name)?;
    let root = repo_dir(config, name);
    if !root.is_dir() {
        bail!("Repository not found: {} (expected at {})", name, root.display());
    }

    let include_set = build_globset(&config.include_globs)?;
    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(&root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().replace('\\', "/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        let size = entry.metadata()?.len();
        if size > config.max_file_bytes {
            tracing::debug!(file = %rel_str, size, "skipping large file");
            continue;
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let content = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                tracing::debug!(file = %rel_str, "skipping non-UTF-8 file");
                continue;
            }
        };

        files.push(RepoFile {
            resource_path: format!("{}/{}", name, rel_str),
            relative_path: rel_str,
            absolute_path: path.to_path_buf(),
            content,
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

/// Names of every `owner/repo` clone present under `repos.root`.
pub fn local_repository_names(config: &ReposConfig) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if !config.root.is_dir() {
        return Ok(names);
    }
    for owner in std::fs::read_dir(&config.root)? {
        let owner = owner?;
        if !owner.file_type()?.is_dir() {
            continue;
        }
        for repo in std::fs::read_dir(owner.path())? {
            let repo = repo?;
            if !repo.file_type()?.is_dir() {
                continue;
            }
            let name = format!(
                "{}/{}",
                owner.file_name().to_string_lossy(),
                repo.file_name().to_string_lossy()
            );
            if validate_repo_name(&name).is_ok() {
                names.push(name);
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Normalized path and on-disk location of a resource.
pub fn resolve_resource(
    config: &ReposConfig,
    resource_path: &str,
) -> Result<(String, PathBuf), ScribeError> {
    let normalized = normalize_path(resource_path)?;
    let absolute = config.root.join(&normalized);
    let missing = || {
        ScribeError::invalid_resource(
            resource_path,
            format!("no such file under {}", config.root.display()),
        )
    };

    // Symlinks are never followed, matching `walk_files`.
    let meta = std::fs::symlink_metadata(&absolute).map_err(|_| missing())?;
    if meta.file_type().is_symlink() {
        return Err(ScribeError::invalid_resource(resource_path, "symbolic links are not followed"));
    }
    if !meta.is_file() {
        return Err(missing());
    }

    // A symlinked parent directory can still point outside the root.
    let real_root = config.root.canonicalize().map_err(|_| missing())?;
    let real_path = absolute.canonicalize().map_err(|_| missing())?;
    if !real_path.starts_with(&real_root) {
        return Err(ScribeError::invalid_resource(
            resource_path,
            format!("resolves outside {}", config.root.display()),
        ));
    }
    Ok((normalized, absolute))
}

/// [`read_resource`] on the blocking thread pool.
pub async fn load_resource(
    config: &ReposConfig,
    resource_path: &str,
) -> Result<RepoFile, ScribeError> {
    let config = config.clone();
    let path = resource_path.to_string();
    tokio::task::spawn_blocking(move || read_resource(&config, &path))
        .await
        .map_err(|e| ScribeError::invalid_resource(resource_path, format!("read task failed: {}", e)))?
}

/// [`walk_files`] on the blocking thread pool.
pub async fn load_repository_files(config: &ReposConfig, name: &str) -> Result<Vec<RepoFile>> {
    let config = config.clone();
    let name = name.to_string();
    tokio::task::spawn_blocking(move || walk_files(&config, &name))
        .await
        .context("repository walk task panicked")?
}

/// Read one resource as UTF-8 text.
pub fn read_resource(config: &ReposConfig, resource_path: &str) -> Result<RepoFile, ScribeError> {
    let (normalized, absolute) = resolve_resource(config, resource_path)?;
    let bytes = std::fs::read(&absolute)
        .map_err(|e| ScribeError::invalid_resource(resource_path, format!("unreadable: {}", e)))?;
    let content = String::from_utf8(bytes)
        .map_err(|_| ScribeError::invalid_resource(resource_path, "not a UTF-8 text file"))?;

    let relative_path = normalized
        .splitn(3, '/')
        .nth(2)
        .unwrap_or(normalized.as_str())
        .to_string();

    Ok(RepoFile {
        resource_path: normalized,
        relative_path,
        absolute_path: absolute,
        content,
    })
}

/// Unified diff between two resources. Empty when they are identical.
pub fn diff_files(config: &ReposConfig, left: &str, right: &str) -> Result<String> {
    let (left_path, _) = resolve_resource(config, left)?;
    let (right_path, _) = resolve_resource(config, right)?;

    let output = Command::new("git")
        .args(["diff", "--no-index", "--no-color", "--"])
        .arg(&left_path)
        .arg(&right_path)
        .current_dir(&config.root)
        .output()
        .with_context(|| "Failed to execute 'git diff'. Is git installed?")?;

    // `git diff --no-index` exits 1 when the files differ.
    match output.status.code() {
        Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git diff failed: {}", stderr.trim())
        }
    }
}

/// Outcome of [`remove_repository`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct RemovalSummary {
    pub name: String,
    pub documents_removed: u64,
    pub removed_files: bool,
}

/// Remove a repository: its descriptions, its clone on disk, then its record.
///
/// Descriptions go first so the index never points at files that no longer
/// exist. If deleting the clone fails, the error reports how many
/// descriptions were already removed; the record is kept so the call can be
/// repeated.
pub async fn remove_repository(ctx: &Scribe, name: &str) -> Result<RemovalSummary> {
    validate_repo_name(name)?;
    let dir = repo_dir(&ctx.config.repos, name);
    let known = get_repository(&ctx.pool, name).await?.is_some();
    if !known && !dir.exists() {
        bail!("Repository not found: {}", name);
    }

    let documents_removed = ctx
        .index()
        .delete_by_source_prefix(&format!("{}/", name))
        .await
        .map_err(ScribeError::index_unavailable)?;

    let removed_files = if dir.exists() {
        std::fs::remove_dir_all(&dir).with_context(|| {
            format!(
                "Removed {} descriptions but failed to delete {}",
                documents_removed,
                dir.display()
            )
        })?;
        true
    } else {
        false
    };

    sqlx::query("DELETE FROM repositories WHERE name = ?")
        .bind(name)
        .execute(&ctx.pool)
        .await?;

    tracing::info!(repo = %name, documents_removed, "repository removed");
    Ok(RemovalSummary {
        name: name.to_string(),
        documents_removed,
        removed_files,
    })
}

/// Download `url` off the async runtime and record it.
pub async fn fetch_repository(ctx: &Scribe, url: &str) -> Result<Repository> {
    let config = ctx.config.clone();
    let url_owned = url.to_string();
    let repo = tokio::task::spawn_blocking(move || download_repository(&config, &url_owned))
        .await
        .context("download task panicked")??;
    record_repository(&ctx.pool, &repo).await?;
    Ok(repo)
}

pub async fn record_repository(pool: &SqlitePool, repo: &Repository) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO repositories (name, url, local_path, head_sha, downloaded_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(name) DO UPDATE SET
            url = excluded.url,
            local_path = excluded.local_path,
            head_sha = excluded.head_sha,
            downloaded_at = excluded.downloaded_at
        "#,
    )
    .bind(&repo.name)
    .bind(&repo.url)
    .bind(repo.local_path.to_string_lossy().to_string())
    .bind(&repo.head_sha)
    .bind(&repo.downloaded_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_repositories(pool: &SqlitePool) -> Result<Vec<Repository>> {
    let rows = sqlx::query(
        "SELECT name, url, local_path, head_sha, downloaded_at FROM repositories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(repository_from_row).collect())
}

pub async fn get_repository(pool: &SqlitePool, name: &str) -> Result<Option<Repository>> {
    let row = sqlx::query(
        "SELECT name, url, local_path, head_sha, downloaded_at FROM repositories WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(row.as_ref().map(repository_from_row))
}

fn repository_from_row(row: &sqlx::sqlite::SqliteRow) -> Repository {
    Repository {
        name: row.get("name"),
        url: row.get("url"),
        local_path: PathBuf::from(row.get::<String, _>("local_path")),
        head_sha: row.get("head_sha"),
        downloaded_at: row.get("downloaded_at"),
    }
}

pub async fn run_download(ctx: &Scribe, url: &str) -> Result<()> {
    let repo = fetch_repository(ctx, url).await?;
    println!("download {}", repo.name);
    println!("  path: {}", repo.local_path.display());
    if let Some(sha) = &repo.head_sha {
        println!("  head: {}", sha);
    }
    println!("ok");
    Ok(())
}

pub async fn run_repos(ctx: &Scribe) -> Result<()> {
    let repos = list_repositories(&ctx.pool).await?;
    if repos.is_empty() {
        println!("No repositories.");
        return Ok(());
    }
    for repo in repos {
        let sha = repo.head_sha.as_deref().map(|s| &s[..s.len().min(12)]);
        println!(
            "{}  {}  {}",
            repo.name,
            sha.unwrap_or("-"),
            repo.downloaded_at
        );
    }
    Ok(())
}

pub async fn run_remove(ctx: &Scribe, name: &str) -> Result<()> {
    let summary = remove_repository(ctx, name).await?;
    println!("remove {}", summary.name);
    println!("  descriptions removed: {}", summary.documents_removed);
    println!("  files removed: {}", summary.removed_files);
    println!("ok");
    Ok(())
}

pub fn run_diff(config: &ReposConfig, left: &str, right: &str) -> Result<()> {
    let diff = diff_files(config, left, right)?;
    if diff.is_empty() {
        println!("Files are identical.");
    } else {
        print!("{}", diff);
    }
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

    fn repos_config(root: &Path) -> ReposConfig {
        ReposConfig {
            root: root.to_path_buf(),
            ..ReposConfig::default()
        }
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_repo_slug_forms() {
        assert_eq!(repo_slug("https://github.com/octo/hello").unwrap(), "octo/hello");
        assert_eq!(repo_slug("https://github.com/octo/hello.git").unwrap(), "octo/hello");
        assert_eq!(repo_slug("https://github.com/octo/hello/").unwrap(), "octo/hello");
        assert_eq!(repo_slug("git@github.com:octo/hello.git").unwrap(), "octo/hello");
        assert_eq!(repo_slug("ssh://git@host:22/octo/hello").unwrap(), "octo/hello");
    }

    #[test]
    fn test_repo_slug_rejects_bad_urls() {
        assert!(repo_slug("file:///etc/passwd").is_err());
        assert!(repo_slug("https://github.com/octo").is_err());
        assert!(repo_slug("--upload-pack=evil").is_err());
        assert!(repo_slug("https://github.com/octo/..").is_err());
        assert!(repo_slug("https://gitlab.com/group/sub/repo").is_err());
        assert!(repo_slug("git@gitlab.com:group/sub/repo.git").is_err());
    }

    #[test]
    fn test_validate_repo_name() {
        assert!(validate_repo_name("octo/hello-world.rs").is_ok());
        assert!(validate_repo_name("octo").is_err());
        assert!(validate_repo_name("octo/hello/extra").is_err());
        assert!(validate_repo_name("../hello").is_err());
    }

    #[test]
    fn test_walk_files_filters() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("octo/hello");
        write(&root, "src/main.rs", b"fn main() {}");
        write(&root, "README.md", b"# hello");
        write(&root, "logo.png", b"\x89PNG");
        write(&root, "node_modules/dep/index.js", b"module.exports = 1");
        write(&root, "src/latin1.py", b"x = '\xe9'");
        write(&root, "big.txt.rs", &vec![b'a'; 64]);

        let mut config = repos_config(tmp.path());
        config.max_file_bytes = 32;

        let files = walk_files(&config, "octo/hello").unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.resource_path.as_str()).collect();
        assert_eq!(paths, vec!["octo/hello/README.md", "octo/hello/src/main.rs"]);
        assert_eq!(files[1].relative_path, "src/main.rs");
        assert_eq!(files[1].content, "fn main() {}");
    }

    #[test]
    fn test_walk_files_missing_repo() {
        let tmp = TempDir::new().unwrap();
        assert!(walk_files(&repos_config(tmp.path()), "octo/absent").is_err());
    }

    #[test]
    fn test_read_resource() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "octo/hello/src/lib.rs", b"pub fn hi() {}");
        let config = repos_config(tmp.path());

        let file = read_resource(&config, "octo\\hello\\src\\lib.rs").unwrap();
        assert_eq!(file.resource_path, "octo/hello/src/lib.rs");
        assert_eq!(file.relative_path, "src/lib.rs");

        let err = read_resource(&config, "octo/hello/missing.rs").unwrap_err();
        assert!(matches!(err, ScribeError::InvalidResource { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_resource_refuses_symlinks() {
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("secret.txt");
        std::fs::write(&outside, "TOP SECRET").unwrap();
        let root = tmp.path().join("repos");
        write(&root, "octo/hello/ok.py", b"ok");
        std::os::unix::fs::symlink(&outside, root.join("octo/hello/leak.py")).unwrap();
        let outside_dir = tmp.path().join("elsewhere");
        write(&outside_dir, "inner.py", b"hidden");
        std::os::unix::fs::symlink(&outside_dir, root.join("octo/hello/linked")).unwrap();
        let config = repos_config(&root);

        let err = read_resource(&config, "octo/hello/leak.py").unwrap_err();
        assert!(matches!(err, ScribeError::InvalidResource { .. }));
        let err = read_resource(&config, "octo/hello/linked/inner.py").unwrap_err();
        assert!(matches!(err, ScribeError::InvalidResource { .. }));
        assert!(diff_files(&config, "octo/hello/ok.py", "octo/hello/leak.py").is_err());

        assert_eq!(read_resource(&config, "octo/hello/ok.py").unwrap().content, "ok");
        let walked = walk_files(&config, "octo/hello").unwrap();
        assert_eq!(walked.len(), 1);
    }

    #[test]
    fn test_diff_files() {
        if Command::new("git").arg("--version").output().is_err() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "octo/hello/a.py", b"print('a')\n");
        write(tmp.path(), "octo/hello/b.py", b"print('b')\n");
        write(tmp.path(), "octo/hello/c.py", b"print('a')\n");
        let config = repos_config(tmp.path());

        let diff = diff_files(&config, "octo/hello/a.py", "octo/hello/b.py").unwrap();
        assert!(diff.contains("-print('a')"));
        assert!(diff.contains("+print('b')"));

        let same = diff_files(&config, "octo/hello/a.py", "octo/hello/c.py").unwrap();
        assert!(same.is_empty());
    }

    #[tokio::test]
    async fn test_remove_repository_clears_index_disk_and_record() {
        let tmp = TempDir::new().unwrap();
        let config = parse_config(&format!(
            "[db]\npath = \"{}\"\n[repos]\nroot = \"{}\"\n",
            tmp.path().join("scribe.sqlite").display(),
            tmp.path().join("repos").display()
        ))
        .unwrap();
        let pool = db::connect(&config).await.unwrap();
        migrate::apply_schema(&pool).await.unwrap();
        let ctx = Scribe::from_parts(
            config.clone(),
            pool,
            Arc::new(InMemoryIndex::new()),
            Arc::new(DisabledGenerator),
        );

        let root = config.repos.root.join("octo/hello");
        write(&root, "a.py", b"a");
        record_repository(
            &ctx.pool,
            &Repository {
                name: "octo/hello".to_string(),
                url: "https://github.com/octo/hello".to_string(),
                local_path: root.clone(),
                head_sha: None,
                downloaded_at: chrono::Utc::now().to_rfc3339(),
            },
        )
        .await
        .unwrap();
        ctx.manager.upsert_description("octo/hello/a.py", "a").await.unwrap();
        ctx.manager.upsert_description("octo/hello2/a.py", "b").await.unwrap();

        let summary = remove_repository(&ctx, "octo/hello").await.unwrap();
        assert_eq!(summary.documents_removed, 1);
        assert!(summary.removed_files);
        assert!(!root.exists());
        assert!(list_repositories(&ctx.pool).await.unwrap().is_empty());
        assert_eq!(ctx.index().count().await.unwrap(), 1);

        assert!(remove_repository(&ctx, "octo/hello").await.is_err());
    }
}
