//! Stable document keys for repository files.
//!
//! Every file description in the index is keyed by a [`ResourceKey`]: the
//! lowercase hex SHA-256 of the file's normalized logical path
//! (`owner/repo/relative/path`). The same path always yields the same key,
//! across calls and process restarts, so re-describing a file replaces its
//! document instead of adding a second one.
//!
//! Normalization rules:
//!
//! | Input | Normalized |
//! |-------|------------|
//! | `  owner/repo/a.py ` | `owner/repo/a.py` |
//! | `owner\repo\a.py` | `owner/repo/a.py` |
//! | `./owner//repo/./a.py` | `owner/repo/a.py` |
//! | `owner/../a.py` | rejected |
//! | `""`, `"/"`, `"./"` | rejected |

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::ScribeError;

/// Opaque, fixed-length identifier of one indexed description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Length in characters of every derived key.
    pub const LEN: usize = 64;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a key read back from storage. No validation is performed.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        ResourceKey(raw.into())
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a resource path into its canonical `a/b/c` form.
pub fn normalize_path(raw: &str) -> Result<String, ScribeError> {
    if raw.contains('\0') {
        return Err(ScribeError::invalid_resource(raw, "contains a NUL byte"));
    }

    let unified = raw.trim().replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(ScribeError::invalid_resource(
                    raw,
                    "parent directory segments are not allowed",
                ))
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(ScribeError::invalid_resource(raw, "path is empty"));
    }

    Ok(segments.join("/"))
}

/// Derive the index key for a resource path.
pub fn derive_key(resource_path: &str) -> Result<ResourceKey, ScribeError> {
    let normalized = normalize_path(resource_path)?;
    Ok(key_for_normalized(&normalized))
}

/// Hash an already-normalized path. Callers that hold both the normalized
/// path and the key use this to avoid normalizing twice.
pub(crate) fn key_for_normalized(normalized: &str) -> ResourceKey {
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    ResourceKey(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_deterministic() {
        let a = derive_key("octo/widgets/src/lib.rs").unwrap();
        let b = derive_key("octo/widgets/src/lib.rs").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stable_across_processes() {
        // SHA-256("repo/file.py"); pinned so a change of hash function or
        // normalization is caught.
        let key = derive_key("repo/file.py").unwrap();
        let mut hasher = Sha256::new();
        hasher.update(b"repo/file.py");
        assert_eq!(key.as_str(), hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_fixed_length_lower_hex() {
        for p in ["a", "a/b/c.txt", "日本語/ファイル.md", "x/".repeat(500).as_str()] {
            let key = derive_key(p).unwrap();
            assert_eq!(key.as_str().len(), ResourceKey::LEN);
            assert!(key
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_equivalent_spellings_share_key() {
        let canonical = derive_key("owner/repo/src/main.rs").unwrap();
        for variant in [
            "./owner/repo/src/main.rs",
            "owner//repo/src/./main.rs",
            "owner\\repo\\src\\main.rs",
            "  owner/repo/src/main.rs\n",
            "/owner/repo/src/main.rs",
        ] {
            assert_eq!(derive_key(variant).unwrap(), canonical, "{variant}");
        }
    }

    #[test]
    fn test_case_is_significant() {
        assert_ne!(
            derive_key("repo/README.md").unwrap(),
            derive_key("repo/readme.md").unwrap()
        );
    }

    #[test]
    fn test_no_collisions_on_realistic_paths() {
        let dirs = ["src", "tests", "docs", "src/api", "lib/utils", "crates/core/src"];
        let exts = ["rs", "py", "ts", "md", "json"];
        let mut seen = HashSet::new();
        let mut count = 0;
        for owner in 0..10 {
            for (d, dir) in dirs.iter().enumerate() {
                for file in 0..35 {
                    let ext = exts[(file + d) % exts.len()];
                    let path = format!("owner{owner}/project{d}/{dir}/module_{file}.{ext}");
                    assert!(seen.insert(derive_key(&path).unwrap()), "collision at {path}");
                    count += 1;
                }
            }
        }
        for i in 0..8_000 {
            let path = format!("bulk/repo/file_{i}.txt");
            assert!(seen.insert(derive_key(&path).unwrap()));
            count += 1;
        }
        assert!(count >= 10_000);
        assert_eq!(seen.len(), count);
    }

    #[test]
    fn test_empty_paths_rejected() {
        for p in ["", "   ", "/", "./", "//./"] {
            let err = derive_key(p).unwrap_err();
            assert!(matches!(err, ScribeError::InvalidResource { .. }), "{p:?}");
        }
    }

    #[test]
    fn test_parent_segments_rejected() {
        let err = normalize_path("owner/repo/../../etc/passwd").unwrap_err();
        assert!(err.to_string().contains("parent directory"));
    }

    #[test]
    fn test_nul_rejected() {
        assert!(normalize_path("a/b\0c").is_err());
    }

    #[test]
    fn test_unicode_accepted() {
        assert_eq!(
            normalize_path("équipe/dépôt/résumé.md").unwrap(),
            "équipe/dépôt/résumé.md"
        );
    }
}
