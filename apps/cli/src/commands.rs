//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use wikihtml_artifacts::Stylesheet;
use wikihtml_core::pipeline::{ConvertConfig, ConvertResult, ProgressReporter};
use wikihtml_shared::{AppConfig, ServiceConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// wikihtml — turn a wiki page into a standalone HTML file.
#[derive(Debug, Parser)]
#[command(
    name = "wikihtml",
    version,
    about = "Convert a GitHub wiki page into a standalone, styled HTML file.",
    long_about = None,
    arg_required_else_help = true,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true,
)]
pub(crate) struct Cli {
    /// Wiki page URL, e.g. https://github.com/org/repo/wiki/Home
    #[arg(value_name = "WIKI_URL", required = true)]
    pub url: Option<String>,

    /// Directory to write the HTML file to (defaults to the config value, then `.`).
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.wikihtml/wikihtml.toml.
    #[arg(short, long, value_name = "FILE", env = "WIKIHTML_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Subcommands other than the default conversion.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "wikihtml=info",
        1 => "wikihtml=debug",
        _ => "wikihtml=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    if let Some(Command::Config { action }) = cli.command {
        return match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&resolve_config(cli.config.as_deref())?),
        };
    }

    // clap requires WIKI_URL whenever no subcommand is given.
    let url = cli.url.ok_or_else(|| eyre!("missing WIKI_URL argument"))?;
    let config = resolve_config(cli.config.as_deref())?;
    cmd_convert(&url, cli.out_dir, &config).await
}

/// Load the config from an explicit path, or the default location.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_convert(url: &str, out_dir: Option<PathBuf>, config: &AppConfig) -> Result<()> {
    // The token is read from the environment exactly once, here.
    let service = ServiceConfig::from_app_config(config)?;

    let convert_config = ConvertConfig {
        wiki_url: url.to_string(),
        output_dir: resolve_output_dir(out_dir, config),
        service,
        stylesheet: Stylesheet::from(&config.output),
    };

    info!(
        url,
        out_dir = %convert_config.output_dir.display(),
        authenticated = convert_config.service.token.is_some(),
        "converting wiki page"
    );

    let reporter = CliProgress::new();
    let result = wikihtml_core::pipeline::convert_page(&convert_config, &reporter).await;
    reporter.clear();
    let result = result?;

    println!("Converted {url} to {}", shown_path(&result.output_path).display());
    Ok(())
}

/// `--out-dir` wins over `output.dir` from the config file.
fn resolve_output_dir(out_dir: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    out_dir.unwrap_or_else(|| PathBuf::from(&config.output.dir))
}

/// Drop a leading `./` so files in the working directory print as bare names.
fn shown_path(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");

    let token_state = if wikihtml_shared::resolve_token(config).is_some() {
        "set"
    } else {
        "not set"
    };
    println!("# {} is {token_state}", config.github.token_env);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _result: &ConvertResult) {
        self.spinner.finish_and_clear();
    }
}
