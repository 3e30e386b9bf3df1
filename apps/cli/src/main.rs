//! wikihtml CLI — convert a single wiki page into a standalone HTML file.
//!
//! Fetches the page's Markdown source, renders it through GitHub's Markdown
//! API, and writes `<page name>.html` styled with github-markdown-css.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
