//! Error types for postbrief.
//!
//! Library crates use [`PostbriefError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all postbrief operations.
#[derive(Debug, thiserror::Error)]
pub enum PostbriefError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to the publishing platform or a model endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The publication exists but has no post under this slug (or the host is unknown).
    #[error("post not found on {host} (slug: {slug})")]
    PostNotFound { host: String, slug: String },

    /// A URL or slug/host pair that cannot address a post.
    #[error("invalid post locator: {0}")]
    InvalidLocator(String),

    /// Language-model backend error (HTTP status, empty choice, step budget).
    #[error("model error: {0}")]
    Model(String),

    /// A judge reply that does not match the scorer's verdict schema.
    #[error("judge error in {scorer}: {message}")]
    Judge { scorer: String, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PostbriefError>;

impl PostbriefError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a judge error attributed to a scorer.
    pub fn judge(scorer: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Judge {
            scorer: scorer.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
