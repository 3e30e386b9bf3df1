//! Shared types, error model, and configuration for wikihtml.
//!
//! This crate is the foundation depended on by all other wikihtml crates.
//! It provides:
//! - [`WikiHtmlError`] — the unified error type
//! - Stage hand-off types ([`RawContentLocation`], [`RenderedDocument`])
//! - Configuration ([`AppConfig`], [`ServiceConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_STYLESHEET_INTEGRITY, DEFAULT_STYLESHEET_URL, GitHubConfig, HttpConfig,
    OutputConfig, ServiceConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from, resolve_token,
};
pub use error::{Result, WikiHtmlError};
pub use types::{RawContentLocation, RenderedDocument};
