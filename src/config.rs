//! TOML configuration.
//!
//! Only `[db]` is required; every other section falls back to defaults that
//! match a local Ollama install (`gemma2:2b` for descriptions,
//! `nomic-embed-text` for embeddings).
//!
//! ```toml
//! [db]
//! path = "./data/scribe.sqlite"
//!
//! [repos]
//! root = "./data/repositories"
//!
//! [llm]
//! provider = "ollama"
//! model = "gemma2:2b"
//!
//! [embedding]
//! provider = "ollama"
//! model = "nomic-embed-text"
//! dims = 768
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub repos: ReposConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReposConfig {
    /// Downloaded repositories live at `<root>/<owner>/<repo>`.
    #[serde(default = "default_repos_root")]
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_true")]
    pub shallow: bool,
}

impl Default for ReposConfig {
    fn default() -> Self {
        Self {
            root: default_repos_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            max_file_bytes: default_max_file_bytes(),
            shallow: true,
        }
    }
}

fn default_repos_root() -> PathBuf {
    PathBuf::from("./data/repositories")
}

fn default_include_globs() -> Vec<String> {
    [
        "rs", "py", "js", "jsx", "ts", "tsx", "go", "java", "kt", "c", "h", "cpp", "hpp", "cs",
        "rb", "php", "swift", "scala", "sh", "sql", "html", "css", "scss", "vue", "svelte", "md",
        "toml", "yaml", "yml", "json",
    ]
    .iter()
    .map(|ext| format!("**/*.{}", ext))
    .collect()
}

fn default_max_file_bytes() -> u64 {
    1_048_576
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// `ollama`, `openai`, or `disabled`.
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on generated tokens per description.
    #[serde(default = "default_num_predict")]
    pub num_predict: u32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            base_url: None,
            model: default_llm_model(),
            temperature: default_temperature(),
            num_predict: default_num_predict(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_provider() -> String {
    "ollama".to_string()
}
fn default_llm_model() -> String {
    "gemma2:2b".to_string()
}
fn default_temperature() -> f32 {
    0.8
}
fn default_num_predict() -> u32 {
    256
}
fn default_llm_timeout() -> u64 {
    120
}

impl LlmConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// `ollama`, `openai`, or `disabled`.
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_dims")]
    pub dims: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            base_url: None,
            model: default_embedding_model(),
            dims: default_dims(),
            batch_size: default_batch_size(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

fn default_embedding_provider() -> String {
    "ollama".to_string()
}
fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}
fn default_dims() -> usize {
    768
}
fn default_batch_size() -> usize {
    32
}
fn default_embedding_timeout() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize {
    1
}
fn default_max_limit() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Files described in parallel during a repository run.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.repos.max_file_bytes == 0 {
        anyhow::bail!("repos.max_file_bytes must be > 0");
    }

    if config.retrieval.default_limit < 1 {
        anyhow::bail!("retrieval.default_limit must be >= 1");
    }
    if config.retrieval.max_limit < config.retrieval.default_limit {
        anyhow::bail!("retrieval.max_limit must be >= retrieval.default_limit");
    }

    if config.ingest.concurrency < 1 {
        anyhow::bail!("ingest.concurrency must be >= 1");
    }

    match config.llm.provider.as_str() {
        "disabled" | "ollama" | "openai" => {}
        other => anyhow::bail!(
            "Unknown llm provider: '{}'. Must be disabled, ollama, or openai.",
            other
        ),
    }

    match config.embedding.provider.as_str() {
        "disabled" | "ollama" | "openai" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled, ollama, or openai.",
            other
        ),
    }

    if config.embedding.is_enabled() {
        if config.embedding.dims == 0 {
            anyhow::bail!(
                "embedding.dims must be > 0 when provider is '{}'",
                config.embedding.provider
            );
        }
        if config.embedding.batch_size == 0 {
            anyhow::bail!("embedding.batch_size must be > 0");
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("[db]\npath = \"/tmp/scribe.sqlite\"\n").unwrap();
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.model, "gemma2:2b");
        assert_eq!(config.llm.num_predict, 256);
        assert_eq!(config.embedding.model, "nomic-embed-text");
        assert_eq!(config.embedding.dims, 768);
        assert_eq!(config.retrieval.default_limit, 1);
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert!(config.repos.include_globs.contains(&"**/*.py".to_string()));
    }

    #[test]
    fn test_missing_db_section_fails() {
        assert!(parse_config("[server]\nbind = \"0.0.0.0:80\"\n").is_err());
    }

    #[test]
    fn test_unknown_llm_provider() {
        let err = parse_config("[db]\npath = \"x\"\n[llm]\nprovider = \"gpt-local\"\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("Unknown llm provider"));
    }

    #[test]
    fn test_zero_dims_rejected_when_enabled() {
        let err = parse_config("[db]\npath = \"x\"\n[embedding]\nprovider = \"openai\"\ndims = 0\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("embedding.dims"));
    }

    #[test]
    fn test_zero_dims_allowed_when_disabled() {
        let config =
            parse_config("[db]\npath = \"x\"\n[embedding]\nprovider = \"disabled\"\ndims = 0\n")
                .unwrap();
        assert!(!config.embedding.is_enabled());
    }

    #[test]
    fn test_limits_validated() {
        let err = parse_config(
            "[db]\npath = \"x\"\n[retrieval]\ndefault_limit = 10\nmax_limit = 5\n",
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("max_limit"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(parse_config("[db]\npath = \"x\"\n[ingest]\nconcurrency = 0\n").is_err());
    }
}
