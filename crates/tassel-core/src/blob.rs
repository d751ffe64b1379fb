//! The `BlobStore` trait — where uploaded document bytes live.
//!
//! Record rows and blobs are two separate resources with no two-phase
//! commit between them: an upload saves the blob first and then writes the
//! record, so a failure between the two leaves an orphaned blob. That is an
//! accepted inconsistency, repaired only by the explicit
//! [reconciliation sweep](crate::portal::reconcile_blobs) — never by a
//! background task.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  document::{DocKind, FileRef},
  student::MatricNo,
};

/// Naming metadata handed to [`BlobStore::save`] alongside the bytes.
#[derive(Debug, Clone)]
pub struct BlobMeta {
  pub matric:    MatricNo,
  pub kind:      DocKind,
  /// Normalised (lower-case) extension, already validated.
  pub extension: String,
}

/// Abstraction over the document blob store.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `bytes` and return the reference to store on the record.
  /// Saving identical bytes under the same metadata yields the same
  /// reference.
  fn save<'a>(
    &'a self,
    bytes: &'a [u8],
    meta: &'a BlobMeta,
  ) -> impl Future<Output = Result<FileRef, Self::Error>> + Send + 'a;

  /// Fetch a stored blob. Returns `None` if the reference is unknown.
  fn read<'a>(
    &'a self,
    file_ref: &'a FileRef,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + 'a;

  /// Remove a stored blob. Deleting an unknown reference is a no-op.
  fn delete<'a>(
    &'a self,
    file_ref: &'a FileRef,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every reference currently held, for the reconciliation sweep.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<FileRef>, Self::Error>> + Send + '_;
}

// ─── Sweep report ────────────────────────────────────────────────────────────

/// Outcome of one reconciliation sweep over the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
  /// Blobs present before the sweep.
  pub scanned: usize,
  /// Blobs a record still references, left in place.
  pub kept:    usize,
  /// Orphans removed, in blob-store order.
  pub deleted: Vec<FileRef>,
}
