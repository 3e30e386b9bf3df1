//! Values handed from one pipeline stage to the next.

use url::Url;

use crate::error::{Result, WikiHtmlError};

// ---------------------------------------------------------------------------
// RawContentLocation
// ---------------------------------------------------------------------------

/// Fully qualified URL of a wiki page's Markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContentLocation(Url);

impl RawContentLocation {
    /// Parse an absolute raw-content URL.
    pub fn parse(raw: &str) -> Result<Self> {
        Url::parse(raw)
            .map(Self)
            .map_err(|e| WikiHtmlError::format(format!("cannot build raw-content URL '{raw}': {e}")))
    }

    /// The location as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The location as a parsed URL.
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl std::fmt::Display for RawContentLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

// ---------------------------------------------------------------------------
// RenderedDocument
// ---------------------------------------------------------------------------

/// HTML produced by the rendering service. Opaque; never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub html_fragment: String,
}

impl RenderedDocument {
    pub fn new(html_fragment: impl Into<String>) -> Self {
        Self {
            html_fragment: html_fragment.into(),
        }
    }
}
