//! Raw Markdown retrieval for wiki pages.
//!
//! A single unauthenticated `GET` against the raw-content host. Any
//! non-success status ends the run; there is no retry.

use reqwest::Client;
use tracing::{debug, info, instrument};

use wikihtml_shared::{RawContentLocation, Result, WikiHtmlError};

/// Fetch the Markdown source at `location` and return it as text.
#[instrument(skip_all, fields(url = %location))]
pub async fn fetch_markdown(client: &Client, location: &RawContentLocation) -> Result<String> {
    let url = location.as_str();
    debug!("requesting raw markdown");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| WikiHtmlError::fetch(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(WikiHtmlError::fetch(url, format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| WikiHtmlError::fetch(url, format!("failed to read body: {e}")))?;

    info!(bytes = body.len(), "fetched markdown");
    Ok(body)
}
