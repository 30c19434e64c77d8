//! Error type for `personnel-store-sqlite`.

use personnel_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] personnel_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A transactional write failed and was rolled back.
  #[error("Error {action} person: {source}")]
  Write {
    action: &'static str,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("date parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn as_core(&self) -> Option<&personnel_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
