//! Error types for wikihtml.
//!
//! Library crates use [`WikiHtmlError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for every stage of a page conversion.
#[derive(Debug, thiserror::Error)]
pub enum WikiHtmlError {
    /// The input is not a recognizable wiki page URL.
    #[error("invalid wiki page URL format: {message}")]
    Format { message: String },

    /// Retrieving the raw Markdown source failed.
    #[error("failed to fetch markdown content from {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The remote Markdown rendering call failed.
    #[error("failed to convert markdown to HTML: {reason}")]
    Render { reason: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or HTTP client setup error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WikiHtmlError>;

impl WikiHtmlError {
    /// Create a format error from any displayable message.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format {
            message: msg.into(),
        }
    }

    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a render error from any displayable message.
    pub fn render(reason: impl Into<String>) -> Self {
        Self::Render {
            reason: reason.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
