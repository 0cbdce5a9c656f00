//! quote-vault shell binary.
//!
//! Reads `quote-vault.toml` (or the path given with `--config`), connects to
//! the quote service, and runs an interactive session on stdin.

mod command;
mod settings;
mod shell;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use quote_vault_ai::HttpQuoteService;
use quote_vault_core::QuoteCollection;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::shell::Shell;

#[derive(Parser)]
#[command(author, version, about = "Collect, discover, and explore quotes")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "quote-vault.toml")]
  config: PathBuf,

  /// Print one JSON object per command instead of text.
  #[arg(long)]
  json: bool,

  /// Start with an empty vault instead of the built-in quotes.
  #[arg(long)]
  empty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so stdout stays clean for `--json`.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = settings::load(&cli.config)?;

  let service = HttpQuoteService::new(cfg.service.clone())
    .context("failed to build quote service client")?;
  tracing::info!(base_url = %cfg.service.base_url, "using quote service");

  let collection = if cfg.seed && !cli.empty {
    QuoteCollection::seeded()
  } else {
    QuoteCollection::new()
  };
  tracing::debug!(quotes = collection.len(), "vault ready");

  Shell::new(
    Arc::new(service),
    Arc::new(collection),
    cfg.discover_count,
    cli.json,
  )
  .run()
  .await
}
