//! The readiness aggregator — computed read models, never stored.
//!
//! [`StudentClearance`] is the student-facing composition; [`RosterEntry`]
//! rows joined with [`queue`] build the administrator review queues. Both
//! are pure reads over the record store.

use serde::{Deserialize, Serialize};

use crate::{
  document::{ClearanceRecord, DocKind},
  student::{Student, StudentSummary},
};

// ─── Student view ────────────────────────────────────────────────────────────

/// Everything a student's portal page needs in one read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentClearance {
  /// Externally asserted; true when the certificate can be collected.
  pub certificate_ready: bool,
  pub payment_confirmed: bool,
  /// All five records, in canonical kind order.
  pub documents:         Vec<ClearanceRecord>,
}

impl StudentClearance {
  pub fn compose(student: &Student, documents: Vec<ClearanceRecord>) -> Self {
    Self {
      certificate_ready: student.certificate_ready,
      payment_confirmed: student.payment_confirmed,
      documents,
    }
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

/// One student joined with whatever records exist for them. Students who
/// have never opened their portal page appear with an empty document list —
/// the roster is a pure read and materialises nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
  pub student:   StudentSummary,
  pub documents: Vec<ClearanceRecord>,
}

/// One row of an administrator review queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
  pub student: StudentSummary,
  pub record:  ClearanceRecord,
}

/// Read-side filter over the roster: the records of one kind, one row per
/// student who has a record of it. The two administrator queues are
/// `queue(roster, CertificatePaymentReceipt)` and `queue(roster, IdCard)`;
/// neither is ever stored.
pub fn queue(roster: &[RosterEntry], kind: DocKind) -> Vec<QueueItem> {
  roster
    .iter()
    .filter_map(|entry| {
      entry
        .documents
        .iter()
        .find(|record| record.kind == kind)
        .map(|record| QueueItem {
          student: entry.student.clone(),
          record:  record.clone(),
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{
    document::{DocStatus, FileRef},
    student::{MatricNo, Role},
  };

  fn summary(matric: &str) -> StudentSummary {
    StudentSummary {
      matric:            MatricNo::new(matric),
      role:              Role::Student,
      email:             format!("{matric}@school.example"),
      payment_confirmed: true,
      certificate_ready: false,
    }
  }

  fn record(matric: &str, kind: DocKind, status: DocStatus) -> ClearanceRecord {
    ClearanceRecord {
      matric: MatricNo::new(matric),
      kind,
      status,
      file_ref: (status == DocStatus::Uploaded)
        .then(|| FileRef::new("some/blob.pdf")),
      updated_at: Utc::now(),
    }
  }

  fn full_entry(matric: &str) -> RosterEntry {
    RosterEntry {
      student:   summary(matric),
      documents: DocKind::ALL
        .into_iter()
        .map(|kind| record(matric, kind, DocStatus::Pending))
        .collect(),
    }
  }

  #[test]
  fn queue_picks_exactly_one_record_per_student() {
    let roster = vec![full_entry("eng/2020/001"), full_entry("eng/2020/002")];

    let receipts = queue(&roster, DocKind::CertificatePaymentReceipt);
    assert_eq!(receipts.len(), 2);
    assert!(
      receipts
        .iter()
        .all(|item| item.record.kind == DocKind::CertificatePaymentReceipt)
    );

    let id_cards = queue(&roster, DocKind::IdCard);
    assert_eq!(id_cards.len(), 2);
  }

  #[test]
  fn queue_skips_students_without_materialised_records() {
    let roster = vec![
      full_entry("eng/2020/001"),
      RosterEntry { student: summary("eng/2020/009"), documents: vec![] },
    ];

    let items = queue(&roster, DocKind::IdCard);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].student.matric, MatricNo::new("eng/2020/001"));
  }

  #[test]
  fn queue_carries_record_state_through() {
    let mut entry = full_entry("eng/2020/001");
    entry.documents[3] = record(
      "eng/2020/001",
      DocKind::CertificatePaymentReceipt,
      DocStatus::Uploaded,
    );

    let items = queue(&[entry], DocKind::CertificatePaymentReceipt);
    assert_eq!(items[0].record.status, DocStatus::Uploaded);
    assert!(items[0].record.has_file());
  }
}
