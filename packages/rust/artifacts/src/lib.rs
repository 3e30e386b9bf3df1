//! Standalone HTML document generation.
//!
//! Wraps a rendered Markdown fragment in a minimal page that pulls in the
//! github-markdown-css stylesheet, then writes it to disk.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use wikihtml_shared::{
    DEFAULT_STYLESHEET_INTEGRITY, DEFAULT_STYLESHEET_URL, OutputConfig, RenderedDocument, Result,
    WikiHtmlError,
};

/// Extension of every output document.
pub const HTML_EXTENSION: &str = "html";

// ---------------------------------------------------------------------------
// Stylesheet
// ---------------------------------------------------------------------------

/// External stylesheet linked from the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub href: String,
    /// Subresource integrity hash; the attribute is omitted when `None`.
    pub integrity: Option<String>,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            href: DEFAULT_STYLESHEET_URL.into(),
            integrity: Some(DEFAULT_STYLESHEET_INTEGRITY.into()),
        }
    }
}

impl From<&OutputConfig> for Stylesheet {
    fn from(config: &OutputConfig) -> Self {
        Self {
            href: config.stylesheet_url.clone(),
            integrity: config.stylesheet_integrity.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Output path for a page: `<dir>/<page_name>.html`.
pub fn output_path(dir: &Path, page_name: &str) -> PathBuf {
    dir.join(format!("{page_name}.{HTML_EXTENSION}"))
}

/// Build the full HTML document around a rendered fragment.
pub fn build_document(doc: &RenderedDocument, title: &str, style: &Stylesheet) -> String {
    let integrity = style
        .integrity
        .as_deref()
        .map(|hash| format!("\n      integrity=\"{}\"", escape_html(hash)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>{title}</title>
    <link
      rel="stylesheet"
      href="{href}"{integrity}
      crossorigin="anonymous"
      referrerpolicy="no-referrer"
    />
  </head>
  <body>
    <div class="markdown-body">
{fragment}
    </div>
  </body>
</html>
"#,
        title = escape_html(title),
        href = escape_html(&style.href),
        fragment = doc.html_fragment,
    )
}

/// Write the document for `doc` to `path`, replacing any existing file.
#[instrument(skip(doc, path, style), fields(path = %path.display()))]
pub fn write_document(
    doc: &RenderedDocument,
    title: &str,
    path: &Path,
    style: &Stylesheet,
) -> Result<usize> {
    let html = build_document(doc, title, style);
    std::fs::write(path, &html).map_err(|e| WikiHtmlError::io(path, e))?;
    debug!(bytes = html.len(), "wrote HTML document");
    Ok(html.len())
}

/// Escape text for use inside element content or a quoted attribute.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
