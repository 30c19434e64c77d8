//! HTTP server wiring for the personnel API.
//!
//! Wraps the [`personnel_api`] router with the CORS filter and request
//! tracing, and holds the runtime configuration.

pub mod cors;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use personnel_core::store::PersonStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PERSONNEL_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; created on first start.
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("persons.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: API routes, CORS filter, request tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: PersonStore + 'static,
{
  personnel_api::api_router(store)
    .layer(middleware::from_fn(cors::cors))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
