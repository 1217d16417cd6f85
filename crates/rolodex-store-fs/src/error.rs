//! Error type for `rolodex-store-fs`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rolodex_core::Error),

  /// Reading or writing a file failed.
  #[error("cannot access {}: {source}", .path.display())]
  Persistence {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("csv error in {}: {source}", .path.display())]
  Csv {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Input file content has the wrong shape.
  #[error("malformed input: {0}")]
  Format(String),

  /// Undo was requested but the snapshot slot is empty.
  #[error("no previous snapshot available to undo")]
  NoSnapshot,

  #[error("not found: {}", .0.display())]
  NotFound(PathBuf),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Persistence {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
    Self::Csv {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
