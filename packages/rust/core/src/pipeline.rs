//! End-to-end conversion: wiki URL → raw Markdown → rendered HTML → file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{info, instrument};

use wikihtml_artifacts::Stylesheet;
use wikihtml_markdown::RenderOptions;
use wikihtml_shared::{RawContentLocation, Result, ServiceConfig, WikiHtmlError};

/// User-Agent string for all outbound requests.
const USER_AGENT: &str = concat!("wikihtml/", env!("CARGO_PKG_VERSION"));

/// Configuration for one `convert_page` run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Wiki page URL to convert.
    pub wiki_url: String,
    /// Directory the HTML file is written to.
    pub output_dir: PathBuf,
    /// Endpoints and credential, resolved once at start-up.
    pub service: ServiceConfig,
    /// Stylesheet linked from the output document.
    pub stylesheet: Stylesheet,
}

/// Result of a successful `convert_page` run.
#[derive(Debug)]
pub struct ConvertResult {
    /// Path of the written HTML file.
    pub output_path: PathBuf,
    /// Raw Markdown source URL the page was fetched from.
    pub raw_url: RawContentLocation,
    /// Decoded page name.
    pub page_name: String,
    /// Size of the fetched Markdown.
    pub markdown_bytes: usize,
    /// Size of the written document.
    pub html_bytes: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Build the HTTP client shared by the fetch and render steps.
pub fn build_client(service: &ServiceConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = service.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| WikiHtmlError::config(format!("failed to build HTTP client: {e}")))
}

/// Run the full conversion pipeline.
///
/// 1. Translate the wiki URL into its raw Markdown location
/// 2. Fetch the Markdown
/// 3. Render it through the Markdown API
/// 4. Write `<page name>.html` into the output directory
///
/// The first failure aborts the run. Nothing is written before step 4.
#[instrument(skip_all, fields(url = %config.wiki_url))]
pub async fn convert_page(
    config: &ConvertConfig,
    progress: &dyn ProgressReporter,
) -> Result<ConvertResult> {
    let start = Instant::now();

    // --- Phase 1: Translate ---
    progress.phase("Resolving wiki page");
    let page = wikihtml_locator::translate(&config.wiki_url, &config.service.raw_base)?;
    info!(raw_url = %page.location, page = %page.page_name(), "resolved wiki page");

    let client = build_client(&config.service)?;

    // --- Phase 2: Fetch ---
    progress.phase("Fetching markdown");
    let markdown = wikihtml_fetcher::fetch_markdown(&client, &page.location).await?;

    // --- Phase 3: Render ---
    progress.phase("Rendering HTML");
    let render_opts = RenderOptions::from(&config.service);
    let rendered = wikihtml_markdown::render(&client, &render_opts, &markdown).await?;

    // --- Phase 4: Write ---
    progress.phase("Writing document");
    let output_path = wikihtml_artifacts::output_path(&config.output_dir, page.page_name());
    let html_bytes = wikihtml_artifacts::write_document(
        &rendered,
        page.page_name(),
        &output_path,
        &config.stylesheet,
    )?;

    let result = ConvertResult {
        output_path,
        page_name: page.page_name().to_string(),
        raw_url: page.location,
        markdown_bytes: markdown.len(),
        html_bytes,
        elapsed: start.elapsed(),
    };

    info!(
        output = %result.output_path.display(),
        elapsed_ms = result.elapsed.as_millis(),
        "conversion complete"
    );

    progress.done(&result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wikihtml-pipeline-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_config(server: &MockServer, wiki_url: &str, output_dir: PathBuf) -> ConvertConfig {
        ConvertConfig {
            wiki_url: wiki_url.to_string(),
            output_dir,
            service: ServiceConfig {
                raw_base: server.uri(),
                api_base: server.uri(),
                api_version: "2022-11-28".into(),
                token: Some("ghp_test".into()),
                timeout_secs: Some(10),
            },
            stylesheet: Stylesheet::default(),
        }
    }

    async fn mount_markdown(server: &MockServer, raw_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(raw_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn converts_encoded_page_url() {
        let server = MockServer::start().await;
        mount_markdown(
            &server,
            "/wiki/acme/widgets/Getting%20Started.md",
            "# Getting Started\n\nInstall it.",
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/markdown"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<h1>Getting Started</h1>\n<p>Install it.</p>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tmp = temp_dir();
        let config = make_config(
            &server,
            "https://github.com/acme/widgets/wiki/Getting%20Started",
            tmp.clone(),
        );
        let result = convert_page(&config, &SilentProgress).await.unwrap();

        assert_eq!(result.page_name, "Getting Started");
        assert_eq!(
            result.raw_url.as_str(),
            format!("{}/wiki/acme/widgets/Getting%20Started.md", server.uri())
        );
        assert_eq!(result.output_path, tmp.join("Getting Started.html"));

        let html = std::fs::read_to_string(&result.output_path).unwrap();
        assert_eq!(html.len(), result.html_bytes);
        assert!(html.contains("<div class=\"markdown-body\">"));
        assert!(html.contains("<h1>Getting Started</h1>\n<p>Install it.</p>"));
        assert!(html.contains("github-markdown-light.min.css"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn converts_unencoded_page_url_to_same_file() {
        let server = MockServer::start().await;
        mount_markdown(&server, "/wiki/acme/widgets/Getting%20Started.md", "# Hi").await;
        Mock::given(method("POST"))
            .and(path("/markdown"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Hi</h1>"))
            .mount(&server)
            .await;

        let tmp = temp_dir();
        let config = make_config(
            &server,
            "https://github.com/acme/widgets/wiki/Getting Started",
            tmp.clone(),
        );
        let result = convert_page(&config, &SilentProgress).await.unwrap();

        assert_eq!(result.output_path, tmp.join("Getting Started.html"));
        assert!(result.output_path.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn fetch_failure_skips_renderer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/markdown"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tmp = temp_dir();
        let config = make_config(&server, "https://github.com/acme/widgets/wiki/Home", tmp.clone());
        let err = convert_page(&config, &SilentProgress).await.unwrap_err();

        assert!(matches!(err, WikiHtmlError::Fetch { .. }));
        assert!(!tmp.join("Home.html").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn render_failure_writes_nothing() {
        let server = MockServer::start().await;
        mount_markdown(&server, "/wiki/acme/widgets/Home.md", "# Home").await;
        Mock::given(method("POST"))
            .and(path("/markdown"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = temp_dir();
        let config = make_config(&server, "https://github.com/acme/widgets/wiki/Home", tmp.clone());
        let err = convert_page(&config, &SilentProgress).await.unwrap_err();

        assert!(matches!(err, WikiHtmlError::Render { .. }));
        assert!(!tmp.join("Home.html").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn malformed_url_makes_no_requests() {
        let server = MockServer::start().await;

        let tmp = temp_dir();
        let config = make_config(&server, "https://github.com/acme/widgets/issues/1", tmp.clone());
        let err = convert_page(&config, &SilentProgress).await.unwrap_err();

        assert!(matches!(err, WikiHtmlError::Format { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn client_builds_without_timeout() {
        let service = ServiceConfig {
            raw_base: "https://raw.githubusercontent.com".into(),
            api_base: "https://api.github.com".into(),
            api_version: "2022-11-28".into(),
            token: None,
            timeout_secs: None,
        };
        assert!(build_client(&service).is_ok());
    }
}
