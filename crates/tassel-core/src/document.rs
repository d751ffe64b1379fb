//! Clearance documents — the fundamental unit of the Tassel portal.
//!
//! Every student owes exactly one record per [`DocKind`]. Records are
//! materialised lazily (all five at once, in one transaction) and are never
//! hard-deleted: a student "delete" resets the record to
//! [`DocStatus::Pending`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::student::MatricNo;

// ─── Document kinds ──────────────────────────────────────────────────────────

/// The five fixed artifact kinds a student must satisfy before certificate
/// release. The kebab-case wire names are part of the external contract and
/// must not be renamed without a migration plan.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum DocKind {
  ResultStatement,
  FeesReceipt,
  ClearanceForm,
  CertificatePaymentReceipt,
  /// Submitted physically at the registry, never uploaded. Its record moves
  /// `pending → submitted_physically → verified` and never carries a file.
  IdCard,
}

impl DocKind {
  /// All kinds, in the canonical display order.
  pub const ALL: [DocKind; 5] = [
    DocKind::ResultStatement,
    DocKind::FeesReceipt,
    DocKind::ClearanceForm,
    DocKind::CertificatePaymentReceipt,
    DocKind::IdCard,
  ];

  /// The discriminant string stored in the `doc_kind` column.
  /// Must match the `rename_all = "kebab-case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      DocKind::ResultStatement => "result-statement",
      DocKind::FeesReceipt => "fees-receipt",
      DocKind::ClearanceForm => "clearance-form",
      DocKind::CertificatePaymentReceipt => "certificate-payment-receipt",
      DocKind::IdCard => "id-card",
    }
  }

  /// Whether this kind is satisfied by an electronic upload.
  /// False only for [`DocKind::IdCard`].
  pub fn requires_upload(self) -> bool { !matches!(self, DocKind::IdCard) }
}

impl fmt::Display for DocKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle state of one clearance record.
///
/// `pending`, `uploaded`, `verified` and `rejected` are the contract-fixed
/// names for the electronic-upload lifecycle. `submitted_physically` is the
/// explicit intermediate state of the id-card path (the student, or an
/// administrator on their behalf, has recorded that the physical card was
/// handed in but it is not yet verified).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
  Pending,
  Uploaded,
  SubmittedPhysically,
  Verified,
  Rejected,
}

impl DocStatus {
  /// The discriminant string stored in the `status` column.
  pub fn as_str(self) -> &'static str {
    match self {
      DocStatus::Pending => "pending",
      DocStatus::Uploaded => "uploaded",
      DocStatus::SubmittedPhysically => "submitted_physically",
      DocStatus::Verified => "verified",
      DocStatus::Rejected => "rejected",
    }
  }
}

impl fmt::Display for DocStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── File references ─────────────────────────────────────────────────────────

/// An opaque reference to a stored document blob.
///
/// Produced by [`crate::blob::BlobStore::save`] and persisted verbatim in the
/// `file_ref` column; the core never interprets its contents.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
  pub fn new(raw: impl Into<String>) -> Self { Self(raw.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for FileRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One (student, document kind) clearance record.
///
/// `file_ref` is `Some` exactly while an upload is on file: `uploaded`,
/// `verified`-after-upload, and `rejected` (the rejected submission stays
/// readable to administrators). It is always `None` while `pending`, and for
/// every id-card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceRecord {
  pub matric:     MatricNo,
  pub kind:       DocKind,
  pub status:     DocStatus,
  pub file_ref:   Option<FileRef>,
  /// Server-assigned; stamped on every store write, untouched by no-ops.
  pub updated_at: DateTime<Utc>,
}

impl ClearanceRecord {
  pub fn has_file(&self) -> bool { self.file_ref.is_some() }

  /// The derived "admin has been notified" flag of the id-card lifecycle.
  ///
  /// True from the moment the physical submission is recorded, and it stays
  /// true after verification — which is what makes a repeated verify an
  /// idempotent no-op rather than an error.
  pub fn physically_submitted(&self) -> bool {
    self.kind == DocKind::IdCard
      && matches!(
        self.status,
        DocStatus::SubmittedPhysically | DocStatus::Verified
      )
  }
}
