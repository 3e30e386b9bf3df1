//! Application configuration for wikihtml.
//!
//! User config lives at `~/.wikihtml/wikihtml.toml` and is optional.
//! CLI flags override config file values, which override defaults.
//! The rendering credential is never stored in the file: the file only
//! names the environment variable that holds it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WikiHtmlError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "wikihtml.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".wikihtml";

/// Default github-markdown-css stylesheet linked from every output document.
pub const DEFAULT_STYLESHEET_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/github-markdown-css/5.1.0/github-markdown-light.min.css";

/// Subresource integrity hash of [`DEFAULT_STYLESHEET_URL`].
pub const DEFAULT_STYLESHEET_INTEGRITY: &str =
    "sha512-zb2pp+R+czM7GAemdSUQt6jFmr3qCo6ikvBgVU6F5GvwEDR0C2sefFiPEJ9QUpmAKdD5EqDUdNRtbOYnbF/eyQ==";

// ---------------------------------------------------------------------------
// Config structs (matching wikihtml.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// GitHub endpoints and credential lookup.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Output document settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Name of the env var holding the bearer token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Base URL of the REST API hosting the `/markdown` endpoint.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL serving raw wiki sources.
    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    /// Value sent in the `X-GitHub-Api-Version` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            api_version: default_api_version(),
        }
    }
}

fn default_token_env() -> String {
    "GITHUB_ACCESS_TOKEN".into()
}
fn default_api_base() -> String {
    "https://api.github.com".into()
}
fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_api_version() -> String {
    "2022-11-28".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the HTML file is written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Stylesheet linked from the document head.
    #[serde(default = "default_stylesheet_url")]
    pub stylesheet_url: String,

    /// SRI hash for the stylesheet. Omitted from the link when unset.
    #[serde(default = "default_stylesheet_integrity")]
    pub stylesheet_integrity: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            stylesheet_url: default_stylesheet_url(),
            stylesheet_integrity: default_stylesheet_integrity(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_stylesheet_url() -> String {
    DEFAULT_STYLESHEET_URL.into()
}
fn default_stylesheet_integrity() -> Option<String> {
    Some(DEFAULT_STYLESHEET_INTEGRITY.into())
}

/// `[http]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout. Unset means the transport default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// Service config (runtime, resolved once at start-up)
// ---------------------------------------------------------------------------

/// Resolved endpoints and credential for one run.
///
/// Built once from [`AppConfig`] and the environment, then passed by
/// reference to the components that talk to the network. Never mutated.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Raw-content base URL without a trailing slash.
    pub raw_base: String,
    /// REST API base URL without a trailing slash.
    pub api_base: String,
    /// `X-GitHub-Api-Version` header value.
    pub api_version: String,
    /// Bearer token for the rendering API, if one was provided.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    /// Resolve the runtime service config, reading the token from the
    /// environment variable named in the config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            raw_base: normalize_base(&config.github.raw_base)?,
            api_base: normalize_base(&config.github.api_base)?,
            api_version: config.github.api_version.clone(),
            token: resolve_token(config),
            timeout_secs: config.http.timeout_secs,
        })
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("raw_base", &self.raw_base)
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Validate a base URL and strip its trailing slash.
fn normalize_base(raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| WikiHtmlError::config(format!("invalid base URL '{raw}': {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(WikiHtmlError::config(format!(
            "base URL '{raw}' must use http or https"
        )));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Read the bearer token from the configured env var. Empty counts as unset.
pub fn resolve_token(config: &AppConfig) -> Option<String> {
    let var_name = &config.github.token_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Some(val.trim().to_string()),
        _ => {
            tracing::debug!(var = %var_name, "no rendering token in environment");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.wikihtml/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WikiHtmlError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.wikihtml/wikihtml.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| WikiHtmlError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        WikiHtmlError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| WikiHtmlError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| WikiHtmlError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| WikiHtmlError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("GITHUB_ACCESS_TOKEN"));
        assert!(toml_str.contains("github-markdown-light.min.css"));
        assert!(!toml_str.contains("timeout_secs"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.github.api_version, "2022-11-28");
        assert_eq!(parsed.output.dir, ".");
        assert_eq!(
            parsed.output.stylesheet_integrity.as_deref(),
            Some(DEFAULT_STYLESHEET_INTEGRITY)
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[output]
dir = "/tmp/wiki-out"

[http]
timeout_secs = 15
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.output.dir, "/tmp/wiki-out");
        assert_eq!(config.output.stylesheet_url, DEFAULT_STYLESHEET_URL);
        assert_eq!(config.github.raw_base, "https://raw.githubusercontent.com");
        assert_eq!(config.http.timeout_secs, Some(15));
    }

    #[test]
    fn service_config_strips_trailing_slash() {
        let mut config = AppConfig::default();
        config.github.api_base = "http://127.0.0.1:8080/".into();
        config.github.token_env = "WIKIHTML_TEST_NONEXISTENT_TOKEN_1".into();
        let service = ServiceConfig::from_app_config(&config).expect("resolve");
        assert_eq!(service.api_base, "http://127.0.0.1:8080");
        assert_eq!(service.raw_base, "https://raw.githubusercontent.com");
        assert!(service.token.is_none());
    }

    #[test]
    fn service_config_rejects_bad_base() {
        let mut config = AppConfig::default();
        config.github.raw_base = "not a url".into();
        let err = ServiceConfig::from_app_config(&config).unwrap_err();
        assert!(matches!(err, WikiHtmlError::Config { .. }));

        config.github.raw_base = "ftp://raw.example.com".into();
        assert!(ServiceConfig::from_app_config(&config).is_err());
    }

    #[test]
    fn missing_token_resolves_to_none() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.github.token_env = "WIKIHTML_TEST_NONEXISTENT_TOKEN_2".into();
        assert!(resolve_token(&config).is_none());
    }

    #[test]
    fn debug_output_redacts_token() {
        let service = ServiceConfig {
            raw_base: default_raw_base(),
            api_base: default_api_base(),
            api_version: default_api_version(),
            token: Some("ghp_secret".into()),
            timeout_secs: None,
        };
        let debug = format!("{service:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
