//! Core data models.
//!
//! These types represent the description documents stored in the content
//! index, the hits returned from it, and the repositories and files that
//! feed the description pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::identity::ResourceKey;

/// Metadata stored alongside each description.
///
/// Keys are opaque hashes, so the human-readable path travels with the
/// document and comes back unchanged on every hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source_path: String,
}

/// The persisted unit: one description per resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub key: ResourceKey,
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// A document returned from an index query, best match first.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub key: ResourceKey,
    pub text: String,
    pub metadata: DocumentMetadata,
    pub score: f64,
}

/// A downloaded repository.
#[derive(Debug, Clone, Serialize)]
pub struct Repository {
    /// `owner/repo`; also the resource-path prefix of every file in it.
    pub name: String,
    pub url: String,
    pub local_path: PathBuf,
    pub head_sha: Option<String>,
    pub downloaded_at: String, // ISO8601
}

/// A text file read from a downloaded repository.
#[derive(Debug, Clone)]
pub struct RepoFile {
    /// `owner/repo/relative/path`, the input to key derivation.
    pub resource_path: String,
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub content: String,
}
