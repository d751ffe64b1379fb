//! The `ClearanceStore` trait.
//!
//! Implemented by storage backends (e.g. `tassel-store-sqlite`). The record
//! primitives are deliberately unconditional: legality lives in
//! [`crate::transition`], and the [`Portal`](crate::portal::Portal) always
//! validates before writing. In particular the store must not prevent an
//! administrative force reset of a `verified` record, even though no portal
//! action performs one.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  document::{ClearanceRecord, DocKind, DocStatus, FileRef},
  student::{MatricNo, NewStudent, Student},
};

/// Abstraction over the durable `students` + `clearance_data` tables.
pub trait ClearanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Students ──────────────────────────────────────────────────────────

  /// Provision a student row. Onboarding happens outside the portal's
  /// lifecycle: only the server's administrative subcommands and tests
  /// call this. Fails if the matric is already taken.
  fn create_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Retrieve a student by matric. Returns `None` if not provisioned.
  fn get_student<'a>(
    &'a self,
    matric: &'a MatricNo,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + 'a;

  /// All students, ordered by matric for a stable roster.
  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Externally-asserted flag writes (registry staff via the server's
  /// subcommands); not part of the clearance lifecycle.
  fn set_certificate_ready<'a>(
    &'a self,
    matric: &'a MatricNo,
    ready: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn set_payment_confirmed<'a>(
    &'a self,
    matric: &'a MatricNo,
    confirmed: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Records ───────────────────────────────────────────────────────────

  /// Materialise the student's records lazily: one row per [`DocKind`],
  /// each `pending` with no file, committed in a single all-or-nothing
  /// transaction. Idempotent — rows that already exist are left untouched
  /// and the call never yields more than one record per kind, including
  /// under concurrent first logins. Returns the full record set.
  ///
  /// Callers guarantee the student exists; the schema's foreign key backs
  /// that up.
  fn ensure_records<'a>(
    &'a self,
    matric: &'a MatricNo,
  ) -> impl Future<Output = Result<Vec<ClearanceRecord>, Self::Error>> + Send + 'a;

  /// All existing records for a student, in canonical kind order. Does not
  /// materialise missing ones.
  fn get_records<'a>(
    &'a self,
    matric: &'a MatricNo,
  ) -> impl Future<Output = Result<Vec<ClearanceRecord>, Self::Error>> + Send + 'a;

  fn get_record<'a>(
    &'a self,
    matric: &'a MatricNo,
    kind: DocKind,
  ) -> impl Future<Output = Result<Option<ClearanceRecord>, Self::Error>> + Send + 'a;

  /// Unconditional status write, used after [`crate::transition::apply`]
  /// has validated the step. Stamps `updated_at` and returns the stored
  /// row. Performs no legality checks of its own.
  fn set_status<'a>(
    &'a self,
    matric: &'a MatricNo,
    kind: DocKind,
    status: DocStatus,
    file_ref: Option<&'a FileRef>,
  ) -> impl Future<Output = Result<ClearanceRecord, Self::Error>> + Send + 'a;

  /// Reset a record to `pending` with no file. The blob itself is not
  /// touched; reclaiming it is the reconciliation sweep's job.
  fn clear_file<'a>(
    &'a self,
    matric: &'a MatricNo,
    kind: DocKind,
  ) -> impl Future<Output = Result<ClearanceRecord, Self::Error>> + Send + 'a;

  /// Every non-null `file_ref` across all records; the live set the
  /// reconciliation sweep keeps.
  fn list_file_refs(
    &self,
  ) -> impl Future<Output = Result<Vec<FileRef>, Self::Error>> + Send + '_;
}
