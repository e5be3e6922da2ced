//! Error taxonomy for the description lifecycle.
//!
//! Application plumbing (config, repositories, CLI) uses `anyhow`; the
//! operations that create and replace indexed descriptions return
//! [`ScribeError`] so callers can tell a bad identifier from a transient
//! backend failure.

use thiserror::Error;

/// Failures surfaced by key derivation, description generation, and
/// index writes. Nothing here is retried internally.
#[derive(Debug, Clone, Error)]
pub enum ScribeError {
    /// The resource path is empty or cannot be normalized. Caller bug.
    #[error("invalid resource path {path:?}: {reason}")]
    InvalidResource { path: String, reason: String },

    /// The content index (or the embedding backend it depends on) failed.
    /// Safe to retry at the caller.
    #[error("content index unavailable: {0}")]
    IndexUnavailable(String),

    /// The language model produced no usable text or could not be reached.
    #[error("description generation failed: {0}")]
    GenerationFailed(String),
}

impl ScribeError {
    pub fn invalid_resource(path: &str, reason: impl Into<String>) -> Self {
        ScribeError::InvalidResource {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap a backend error, keeping its full context chain in the message.
    pub fn index_unavailable(err: anyhow::Error) -> Self {
        ScribeError::IndexUnavailable(format!("{:#}", err))
    }

    pub fn generation_failed(err: anyhow::Error) -> Self {
        ScribeError::GenerationFailed(format!("{:#}", err))
    }

    /// Machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ScribeError::InvalidResource { .. } => "invalid_resource",
            ScribeError::IndexUnavailable(_) => "index_unavailable",
            ScribeError::GenerationFailed(_) => "generation_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_unavailable_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("embedding request failed");
        let wrapped = ScribeError::index_unavailable(err);
        let msg = wrapped.to_string();
        assert!(msg.contains("embedding request failed"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            ScribeError::invalid_resource("", "empty").code(),
            "invalid_resource"
        );
        assert_eq!(
            ScribeError::IndexUnavailable("x".into()).code(),
            "index_unavailable"
        );
        assert_eq!(
            ScribeError::GenerationFailed("x".into()).code(),
            "generation_failed"
        );
    }
}
