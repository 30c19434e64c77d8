//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure renders as `{"error": "<message>"}`. Not-found is 404;
//! everything else, storage failures included, is 400. Existing clients
//! rely on that status, so storage faults are not promoted to 500.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use personnel_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  /// A backend failure, prefixed with what the handler was doing.
  #[error("{context}: {source}")]
  Store {
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a store error. Domain causes carried by the backend (duplicate
  /// email, vanished row) keep their own status and message.
  pub fn from_store<E: StoreError>(context: &'static str, e: E) -> Self {
    match e.as_core() {
      Some(core) => core.clone().into(),
      None => ApiError::Store { context, source: Box::new(e) },
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) | ApiError::Store { .. } => StatusCode::BAD_REQUEST,
    }
  }
}

impl From<personnel_core::Error> for ApiError {
  fn from(e: personnel_core::Error) -> Self {
    match e {
      personnel_core::Error::PersonNotFound(_) => ApiError::NotFound(e.to_string()),
      personnel_core::Error::Validation(_) | personnel_core::Error::EmailTaken(_) => {
        ApiError::BadRequest(e.to_string())
      }
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if let ApiError::Store { context, source } = &self {
      tracing::warn!(%context, error = %source, "store operation failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
