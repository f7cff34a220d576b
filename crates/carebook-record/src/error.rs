//! Error types for the carebook-record codec.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person's {0} field is missing")]
  MissingField(&'static str),

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  #[error(transparent)]
  Core(#[from] carebook_core::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("i/o error on {}: {source}", .path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A whole-store load was abandoned; nothing from it was installed.
  #[error("failed to load store{}: {source}", at_record(.index))]
  LoadFailure {
    /// Position of the offending record, when one can be singled out.
    index:  Option<usize>,
    source: Box<Error>,
  },
}

impl Error {
  pub fn load_failure(index: Option<usize>, source: impl Into<Error>) -> Self {
    Self::LoadFailure { index, source: Box::new(source.into()) }
  }
}

fn at_record(index: &Option<usize>) -> String {
  index.map(|i| format!(" at record {i}")).unwrap_or_default()
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
