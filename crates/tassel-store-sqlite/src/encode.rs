//! Decoding helpers between the plain-text SQLite columns and the domain
//! types.
//!
//! Timestamps are stored as RFC 3339 strings. Discriminants (`doc_kind`,
//! `status`, `role`) are stored as their canonical wire strings; the
//! encode direction is just `as_str()` on the domain enums, so only the
//! decode direction lives here.

use chrono::{DateTime, Utc};
use tassel_core::{
  document::{ClearanceRecord, DocKind, DocStatus, FileRef},
  student::{MatricNo, Role, Student},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Discriminants ───────────────────────────────────────────────────────────

pub fn decode_kind(s: &str) -> Result<DocKind> {
  match s {
    "result-statement" => Ok(DocKind::ResultStatement),
    "fees-receipt" => Ok(DocKind::FeesReceipt),
    "clearance-form" => Ok(DocKind::ClearanceForm),
    "certificate-payment-receipt" => Ok(DocKind::CertificatePaymentReceipt),
    "id-card" => Ok(DocKind::IdCard),
    other => Err(Error::Decode {
      column: "doc_kind",
      value:  other.to_owned(),
    }),
  }
}

pub fn decode_status(s: &str) -> Result<DocStatus> {
  match s {
    "pending" => Ok(DocStatus::Pending),
    "uploaded" => Ok(DocStatus::Uploaded),
    "submitted_physically" => Ok(DocStatus::SubmittedPhysically),
    "verified" => Ok(DocStatus::Verified),
    "rejected" => Ok(DocStatus::Rejected),
    other => Err(Error::Decode {
      column: "status",
      value:  other.to_owned(),
    }),
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "student" => Ok(Role::Student),
    "admin" => Ok(Role::Admin),
    other => Err(Error::Decode {
      column: "role",
      value:  other.to_owned(),
    }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `students` row.
pub struct RawStudent {
  pub matric_no:         String,
  pub password_hash:     String,
  pub role:              String,
  pub email:             String,
  pub payment_confirmed: bool,
  pub certificate_ready: bool,
  pub created_at:        String,
}

impl RawStudent {
  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      matric:            MatricNo::new(self.matric_no),
      password_hash:     self.password_hash,
      role:              decode_role(&self.role)?,
      email:             self.email,
      payment_confirmed: self.payment_confirmed,
      certificate_ready: self.certificate_ready,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `clearance_data` row.
pub struct RawRecord {
  pub matric_no:  String,
  pub doc_kind:   String,
  pub status:     String,
  pub file_ref:   Option<String>,
  pub updated_at: String,
}

impl RawRecord {
  pub fn into_record(self) -> Result<ClearanceRecord> {
    Ok(ClearanceRecord {
      matric:     MatricNo::new(self.matric_no),
      kind:       decode_kind(&self.doc_kind)?,
      status:     decode_status(&self.status)?,
      file_ref:   self.file_ref.map(FileRef::new),
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
