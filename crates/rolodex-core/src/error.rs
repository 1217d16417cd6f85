//! Error types for `rolodex-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("contact name cannot be empty")]
  EmptyName,

  #[error("contact not found: {0:?}")]
  ContactNotFound(String),

  #[error("invalid search pattern: {0}")]
  InvalidPattern(#[from] regex::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
