//! Error type for `tassel-store-sqlite`.

use tassel_core::{document::DocKind, student::MatricNo};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A discriminant column holds a value no current enum variant maps to,
  /// e.g. after a downgrade.
  #[error("unknown {column} value in database: {value:?}")]
  Decode {
    column: &'static str,
    value:  String,
  },

  #[error("student not found: {0}")]
  StudentNotFound(MatricNo),

  #[error("student already exists: {0}")]
  StudentExists(MatricNo),

  /// A record write targeted a row that was never materialised.
  #[error("no {kind} record for student {matric}")]
  RecordNotFound {
    matric: MatricNo,
    kind:   DocKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
