//! Error type for `tassel-blob-fs`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The reference does not have the `student-dir/file-name` shape this
  /// backend produces. Refuses path traversal through stored references.
  #[error("invalid file reference: {0:?}")]
  InvalidRef(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
