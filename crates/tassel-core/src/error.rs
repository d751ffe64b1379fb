//! Error types for `tassel-core`.
//!
//! One flat taxonomy for the whole portal surface: not-found, auth,
//! validation, illegal transition, and boxed collaborator failures.
//! Validation and transition errors are raised before any mutation.

use thiserror::Error;

use crate::{
  document::{DocKind, DocStatus},
  student::MatricNo,
  transition::Action,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("student not found: {0}")]
  StudentNotFound(MatricNo),

  #[error("no stored file for {matric}/{kind}")]
  FileNotFound { matric: MatricNo, kind: DocKind },

  /// Unknown matric and wrong password are deliberately indistinguishable.
  #[error("invalid credentials")]
  BadCredentials,

  /// A live session attempted an operation its capability does not cover.
  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The state machine refused the (state, action) pair. Nothing was
  /// mutated.
  #[error("illegal transition: cannot {action} {kind} while {status}")]
  IllegalTransition {
    kind:   DocKind,
    status: DocStatus,
    action: Action,
  },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("blob store error: {0}")]
  Blob(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a [`crate::store::ClearanceStore`] failure.
  pub fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Storage(Box::new(e))
  }

  /// Wrap a [`crate::blob::BlobStore`] failure.
  pub fn blob<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Blob(Box::new(e))
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Rejections detected before any record or blob is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("file is {size} bytes; the limit is {max}")]
  TooLarge { size: u64, max: u64 },

  #[error("unsupported file type: {0:?} (accepted: jpg, jpeg, png, pdf)")]
  UnsupportedType(String),

  #[error("declared content type {mime:?} does not match extension {extension:?}")]
  MimeMismatch { mime: String, extension: String },

  #[error("administrators may only set status to verified or rejected, not {0}")]
  TargetStatus(DocStatus),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
