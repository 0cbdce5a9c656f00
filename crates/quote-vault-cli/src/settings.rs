//! Layered configuration: an optional TOML file, then `QUOTE_VAULT_*`
//! environment variables (`__` separates nested keys, e.g.
//! `QUOTE_VAULT_SERVICE__API_KEY`).

use std::path::Path;

use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use quote_vault_ai::{DEFAULT_DISCOVER_COUNT, ServiceConfig};
use serde::Deserialize;

fn default_discover_count() -> usize { DEFAULT_DISCOVER_COUNT }

fn default_seed() -> bool { true }

/// Everything the shell needs to start a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VaultConfig {
  #[serde(default)]
  pub service:        ServiceConfig,
  /// Quotes requested per discovery search.
  #[serde(default = "default_discover_count")]
  pub discover_count: usize,
  /// Start with the built-in quotes.
  #[serde(default = "default_seed")]
  pub seed:           bool,
}

impl Default for VaultConfig {
  fn default() -> Self {
    Self {
      service:        ServiceConfig::default(),
      discover_count: default_discover_count(),
      seed:           default_seed(),
    }
  }
}

/// Read `path` (if it exists) and the environment.
pub fn load(path: &Path) -> anyhow::Result<VaultConfig> {
  let builder = Config::builder()
    .add_source(File::from(path).required(false))
    .add_source(
      Environment::with_prefix("QUOTE_VAULT")
        .prefix_separator("_")
        .separator("__"),
    );
  finish(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<VaultConfig> {
  let settings = builder.build().context("failed to read configuration")?;
  let cfg: VaultConfig = settings
    .try_deserialize()
    .context("failed to deserialise VaultConfig")?;
  anyhow::ensure!(cfg.discover_count > 0, "discover_count must be at least 1");
  anyhow::ensure!(
    cfg.service.timeout_secs > 0,
    "service.timeout_secs must be at least 1"
  );
  Ok(cfg)
}
