//! personnel server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `PERSONNEL_*` environment variables, opens the SQLite store, and serves
//! the JSON API over HTTP until Ctrl-C.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use personnel_server::ServerConfig;
use personnel_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Person records REST API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(cli.config)?;
  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, "store opened");

  let app = personnel_server::router(Arc::new(store.clone()));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await.context("failed to close store")?;
  tracing::info!("store closed, bye");

  Ok(())
}

/// File first, then `PERSONNEL_HOST`, `PERSONNEL_PORT` and
/// `PERSONNEL_STORE_PATH` on top. A missing file is not an error.
fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("PERSONNEL"))
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("invalid server configuration")
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for Ctrl-C: {e}");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown requested");
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
