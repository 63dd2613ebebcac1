//! sahay-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite record store, loads the guideline table, builds the HTTP advice
//! oracle, and serves the JSON API.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use sahay_api::ServerConfig;
use sahay_core::{guideline::GuidelineStore, knowledge::KnowledgeGraph};
use sahay_engine::{TriageService, oracle::HttpAdviceOracle};
use sahay_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Sahay triage server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SAHAY").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite record store.
  let db_path = expand_tilde(&server_cfg.db_path);
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  // Load the guideline table. A missing or unreadable file is never fatal:
  // every lookup then degrades to the fallback guidance string.
  let guidelines = match GuidelineStore::load(&server_cfg.guidelines_path) {
    Ok(g) => {
      tracing::info!(entries = g.len(), path = ?server_cfg.guidelines_path, "guidelines loaded");
      g
    }
    Err(e) => {
      tracing::warn!(
        path = ?server_cfg.guidelines_path,
        error = %e,
        "guidelines unavailable; using fallback guidance only"
      );
      GuidelineStore::empty()
    }
  };

  let oracle = HttpAdviceOracle::new(server_cfg.oracle.clone())
    .map_err(|e| anyhow::anyhow!("failed to build advice oracle: {e}"))?;

  let service = TriageService::new(
    store,
    oracle,
    Arc::new(guidelines),
    Arc::new(KnowledgeGraph::builtin()),
  )
  .with_oracle_timeout(Duration::from_secs(server_cfg.oracle.timeout_seconds));

  let app = sahay_api::api_router(Arc::new(service)).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
