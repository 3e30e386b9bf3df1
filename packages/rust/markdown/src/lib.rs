//! Markdown → HTML rendering through GitHub's Markdown API.
//!
//! The Markdown text is posted to `<api_base>/markdown`; the response body is
//! the rendered HTML fragment, returned untouched. Authentication is a static
//! bearer token resolved once at start-up and handed in via [`RenderOptions`].

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use wikihtml_shared::{RenderedDocument, Result, ServiceConfig, WikiHtmlError};

/// Media type requested from the API.
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Header carrying the REST API version.
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// How much of an error response body to keep in the error message.
const ERROR_BODY_LIMIT: usize = 300;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Endpoint and credential for the rendering API.
#[derive(Clone)]
pub struct RenderOptions {
    /// API base URL without a trailing slash.
    pub api_base: String,
    /// `X-GitHub-Api-Version` header value.
    pub api_version: String,
    /// Bearer token. Without one the request is sent anonymously.
    pub token: Option<String>,
}

impl From<&ServiceConfig> for RenderOptions {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            api_version: config.api_version.clone(),
            token: config.token.clone(),
        }
    }
}

impl RenderOptions {
    fn endpoint(&self) -> String {
        format!("{}/markdown", self.api_base)
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// JSON body of `POST /markdown`.
#[derive(Serialize)]
struct RenderRequest<'a> {
    text: &'a str,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render Markdown text to an HTML fragment.
#[instrument(skip_all, fields(endpoint = %opts.endpoint(), markdown_len = markdown.len()))]
pub async fn render(
    client: &Client,
    opts: &RenderOptions,
    markdown: &str,
) -> Result<RenderedDocument> {
    let version = HeaderValue::from_str(&opts.api_version).map_err(|e| {
        WikiHtmlError::render(format!("invalid API version '{}': {e}", opts.api_version))
    })?;

    let mut request = client
        .post(opts.endpoint())
        .header(ACCEPT, GITHUB_JSON)
        .header(API_VERSION_HEADER, version)
        .json(&RenderRequest { text: markdown });

    match &opts.token {
        Some(token) => request = request.bearer_auth(token),
        None => warn!("no API token configured, rendering anonymously"),
    }

    debug!("posting markdown for rendering");

    let response = request
        .send()
        .await
        .map_err(|e| WikiHtmlError::render(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WikiHtmlError::render(describe_failure(status, &body)));
    }

    let html = response
        .text()
        .await
        .map_err(|e| WikiHtmlError::render(format!("failed to read response body: {e}")))?;

    info!(bytes = html.len(), "rendered markdown");
    Ok(RenderedDocument::new(html))
}

/// Build an error message from a failed response, keeping a prefix of the body.
fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {status}");
    }
    let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if snippet.len() < body.len() {
        format!("HTTP {status}: {snippet}…")
    } else {
        format!("HTTP {status}: {snippet}")
    }
}
