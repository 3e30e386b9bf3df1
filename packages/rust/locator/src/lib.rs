//! Wiki page URL → raw Markdown source URL translation.
//!
//! A wiki page such as `https://github.com/acme/widgets/wiki/Getting-Started`
//! is backed by a Markdown file served from the raw-content host at
//! `https://raw.githubusercontent.com/wiki/acme/widgets/Getting-Started.md`.
//! Translation is pure string work; nothing here touches the network.

pub mod encoding;

use tracing::debug;
use url::Url;

use wikihtml_shared::{RawContentLocation, Result, WikiHtmlError};

pub use encoding::EncodedPageName;

/// Path segment separating the repository from the page name.
const WIKI_SEGMENT: &str = "/wiki/";

// ---------------------------------------------------------------------------
// WikiPageReference
// ---------------------------------------------------------------------------

/// The two halves of a wiki page URL's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPageReference {
    /// Owner/repository path with its leading slash, e.g. `/acme/widgets`.
    pub repository_path: String,
    /// Page name exactly as it appeared in the URL.
    pub page_name_raw: String,
}

impl WikiPageReference {
    /// Split a wiki page URL into repository path and page name.
    ///
    /// The path must contain `/wiki/` exactly once.
    pub fn parse(wiki_url: &str) -> Result<Self> {
        let path = url_path(wiki_url)?;

        let parts: Vec<&str> = path.split(WIKI_SEGMENT).collect();
        let [repository_path, page_name_raw] = parts.as_slice() else {
            return Err(WikiHtmlError::format(format!(
                "expected exactly one '{WIKI_SEGMENT}' segment in '{wiki_url}', found {}",
                parts.len() - 1
            )));
        };

        if repository_path.trim_matches('/').is_empty() {
            return Err(WikiHtmlError::format(format!(
                "no repository path before '{WIKI_SEGMENT}' in '{wiki_url}'"
            )));
        }
        if page_name_raw.is_empty() {
            return Err(WikiHtmlError::format(format!(
                "no page name after '{WIKI_SEGMENT}' in '{wiki_url}'"
            )));
        }

        Ok(Self {
            repository_path: (*repository_path).to_string(),
            page_name_raw: (*page_name_raw).to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// A wiki page resolved to its Markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    /// Where the Markdown source lives.
    pub location: RawContentLocation,
    /// Page name escaped once and decoded.
    pub name: EncodedPageName,
}

impl ResolvedPage {
    /// Human-readable page name, used for the output file name.
    pub fn page_name(&self) -> &str {
        self.name.decoded()
    }
}

/// Translate a wiki page URL into its raw-content location.
///
/// `raw_base` is the raw-content origin without a trailing slash, normally
/// `https://raw.githubusercontent.com`.
pub fn translate(wiki_url: &str, raw_base: &str) -> Result<ResolvedPage> {
    let reference = WikiPageReference::parse(wiki_url)?;
    let name = EncodedPageName::from_raw(&reference.page_name_raw);
    if escapes_output_dir(name.decoded()) {
        return Err(WikiHtmlError::format(format!(
            "page name '{}' would be written outside the output directory",
            name.decoded()
        )));
    }

    let raw = format!(
        "{raw_base}/wiki{}/{}.md",
        reference.repository_path,
        name.encoded()
    );
    let location = RawContentLocation::parse(&raw)?;

    debug!(
        repository = %reference.repository_path,
        page = %name.decoded(),
        raw_url = %location,
        "translated wiki URL"
    );

    Ok(ResolvedPage { location, name })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether a decoded page name, used as a file name, leaves the output directory.
fn escapes_output_dir(name: &str) -> bool {
    name.starts_with(['/', '\\']) || name.split(['/', '\\']).any(|segment| segment == "..")
}

/// Return the path of an absolute http(s) URL exactly as written.
///
/// The URL is validated with [`Url::parse`], but the path is sliced out of
/// the original string: `Url` would re-escape spaces and other characters,
/// which would hide whether the page name was already encoded.
fn url_path(input: &str) -> Result<&str> {
    let parsed = Url::parse(input)
        .map_err(|e| WikiHtmlError::format(format!("'{input}' is not a valid URL: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(WikiHtmlError::format(format!(
            "'{input}' must use http or https"
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(WikiHtmlError::format(format!("'{input}' has no host")));
    }

    let rest = input
        .split_once("://")
        .map(|(_, rest)| rest)
        .ok_or_else(|| WikiHtmlError::format(format!("'{input}' has no authority")))?;

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let tail = &rest[authority_end..];
    let path_end = tail.find(['?', '#']).unwrap_or(tail.len());

    Ok(&tail[..path_end])
}
