//! Error types for `personnel-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// A field failed validation. The message is shown to the client verbatim.
  #[error("{0}")]
  Validation(String),

  #[error("Email '{0}' already exists")]
  EmailTaken(String),

  #[error("Person with id {0} not found")]
  PersonNotFound(i64),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Error::Validation(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
