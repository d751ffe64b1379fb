//! The portal facade: every operation the clearance service exposes,
//! composed from the access gate ([`Session`]), the state machine
//! ([`crate::transition`]), a [`ClearanceStore`] and a [`BlobStore`].
//!
//! Every operation follows the same shape: check the session's authority,
//! validate input, consult the transition table, and only then write.
//! Collaborator failures surface as [`Error::Storage`] / [`Error::Blob`];
//! everything else is a domain error from [`crate::error`].

use std::collections::HashSet;

use crate::{
  blob::{BlobMeta, BlobStore, SweepReport},
  document::{ClearanceRecord, DocKind, DocStatus, FileRef},
  error::{Error, Result, ValidationError},
  session::Session,
  store::ClearanceStore,
  student::{MatricNo, Role, Student, StudentSummary},
  transition::{self, Action},
  upload::{self, UploadPayload},
  verify::CredentialVerifier,
  view::{self, QueueItem, RosterEntry, StudentClearance},
};

// ─── Stored documents ────────────────────────────────────────────────────────

/// A document pulled back out of the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
  pub file_ref: FileRef,
  pub bytes:    Vec<u8>,
}

impl StoredDocument {
  /// The extension recorded in the file reference, if any.
  pub fn extension(&self) -> Option<&str> {
    self.file_ref.as_str().rsplit_once('.').map(|(_, ext)| ext)
  }

  /// Media type to serve the bytes under. Unknown extensions fall back to
  /// `application/octet-stream`.
  pub fn media_type(&self) -> &'static str {
    upload::media_type_for(self.extension().unwrap_or_default())
  }
}

// ─── The portal ──────────────────────────────────────────────────────────────

/// The clearance service. Generic over its collaborators so the HTTP
/// layer, the maintenance CLI, and tests can assemble it from whatever
/// backends suit them.
#[derive(Debug, Clone)]
pub struct Portal<S, B, V> {
  store:    S,
  blobs:    B,
  verifier: V,
}

impl<S, B, V> Portal<S, B, V>
where
  S: ClearanceStore,
  B: BlobStore,
  V: CredentialVerifier,
{
  pub fn new(store: S, blobs: B, verifier: V) -> Self {
    Self { store, blobs, verifier }
  }

  // ─── Authentication ────────────────────────────────────────────────────

  /// Verify credentials and open a session. An unknown matric number and a
  /// wrong password both come back [`Error::BadCredentials`]; callers
  /// cannot tell which was the case.
  pub async fn login(
    &self,
    matric: &MatricNo,
    password: &str,
  ) -> Result<Session> {
    let student = self
      .store
      .get_student(matric)
      .await
      .map_err(Error::storage)?
      .ok_or(Error::BadCredentials)?;

    if !self.verifier.verify(password, &student.password_hash) {
      return Err(Error::BadCredentials);
    }

    Ok(Session::issue(&student))
  }

  // ─── Student operations ────────────────────────────────────────────────

  /// Whether the student's certificate is ready for collection.
  pub async fn readiness(
    &self,
    session: &Session,
    matric: &MatricNo,
  ) -> Result<bool> {
    session.require_self_or_admin(matric)?;
    Ok(self.student(matric).await?.certificate_ready)
  }

  /// The full clearance view: provisioning flags plus all five records,
  /// materialising any that do not exist yet.
  pub async fn clearance(
    &self,
    session: &Session,
    matric: &MatricNo,
  ) -> Result<StudentClearance> {
    session.require_self_or_admin(matric)?;
    let student = self.student(matric).await?;
    let records =
      self.store.ensure_records(matric).await.map_err(Error::storage)?;
    Ok(StudentClearance::compose(&student, records))
  }

  /// Attach an electronic document. The payload is validated and the
  /// transition checked before anything is written; the blob goes in
  /// before the record, so a crash between the two leaves only an orphan
  /// blob for [`Portal::sweep_blobs`] to reclaim.
  pub async fn upload(
    &self,
    session: &Session,
    matric: &MatricNo,
    kind: DocKind,
    payload: UploadPayload,
  ) -> Result<ClearanceRecord> {
    session.require_self(matric)?;
    let extension = payload.validate()?;

    let record = self.record(matric, kind).await?;
    let step = transition::apply(kind, record.status, Action::Upload)?;

    let meta = BlobMeta { matric: matric.clone(), kind, extension };
    let file_ref =
      self.blobs.save(&payload.bytes, &meta).await.map_err(Error::blob)?;

    self
      .store
      .set_status(matric, kind, step.next, Some(&file_ref))
      .await
      .map_err(Error::storage)
  }

  /// Withdraw a submission: the record returns to `pending` and its file
  /// reference is dropped. The blob itself stays behind until the next
  /// sweep.
  pub async fn delete_document(
    &self,
    session: &Session,
    matric: &MatricNo,
    kind: DocKind,
  ) -> Result<ClearanceRecord> {
    session.require_self(matric)?;
    let record = self.record(matric, kind).await?;
    transition::apply(kind, record.status, Action::Delete)?;
    self.store.clear_file(matric, kind).await.map_err(Error::storage)
  }

  /// Record that the physical id-card has been handed in. A repeat call
  /// is an idempotent success: nothing is written and `updated_at` stays
  /// put.
  pub async fn notify_id_card(
    &self,
    session: &Session,
    matric: &MatricNo,
  ) -> Result<ClearanceRecord> {
    session.require_self_or_admin(matric)?;
    let record = self.record(matric, DocKind::IdCard).await?;
    let step =
      transition::apply(DocKind::IdCard, record.status, Action::NotifyAdmin)?;

    if step.is_noop(record.status) {
      return Ok(record);
    }

    self
      .store
      .set_status(matric, DocKind::IdCard, step.next, record.file_ref.as_ref())
      .await
      .map_err(Error::storage)
  }

  /// Fetch the stored bytes behind a record. [`Error::FileNotFound`] when
  /// the record holds no reference, and also when the reference dangles —
  /// a record pointing at a missing blob reads the same as no file at all.
  pub async fn read_document(
    &self,
    session: &Session,
    matric: &MatricNo,
    kind: DocKind,
  ) -> Result<StoredDocument> {
    session.require_self_or_admin(matric)?;
    let record = self.record(matric, kind).await?;

    let file_ref = record
      .file_ref
      .ok_or_else(|| Error::FileNotFound { matric: matric.clone(), kind })?;

    let bytes = self
      .blobs
      .read(&file_ref)
      .await
      .map_err(Error::blob)?
      .ok_or_else(|| Error::FileNotFound { matric: matric.clone(), kind })?;

    Ok(StoredDocument { file_ref, bytes })
  }

  // ─── Administrator operations ──────────────────────────────────────────

  /// Every student-role account joined with whatever records exist for
  /// them. A pure read: students who have never opened their portal page
  /// appear with an empty document list, and nothing is materialised.
  pub async fn admin_roster(
    &self,
    session: &Session,
  ) -> Result<Vec<RosterEntry>> {
    session.require_admin()?;

    let students =
      self.store.list_students().await.map_err(Error::storage)?;

    let mut roster = Vec::with_capacity(students.len());
    for student in students {
      if student.role != Role::Student {
        continue;
      }
      let documents = self
        .store
        .get_records(&student.matric)
        .await
        .map_err(Error::storage)?;
      roster
        .push(RosterEntry { student: StudentSummary::from(&student), documents });
    }

    Ok(roster)
  }

  /// The review queue for one document kind: each student's record of that
  /// kind, where one exists.
  pub async fn admin_queue(
    &self,
    session: &Session,
    kind: DocKind,
  ) -> Result<Vec<QueueItem>> {
    let roster = self.admin_roster(session).await?;
    Ok(view::queue(&roster, kind))
  }

  /// Administrative review: move a record to `verified` or `rejected`.
  /// Every other target status is a validation error, so arbitrary status
  /// writes cannot come in through this door. Re-verifying an id-card that
  /// is already verified succeeds without a write.
  pub async fn admin_update_status(
    &self,
    session: &Session,
    matric: &MatricNo,
    kind: DocKind,
    target: DocStatus,
  ) -> Result<ClearanceRecord> {
    session.require_admin()?;

    let action = match target {
      DocStatus::Verified => Action::Verify,
      DocStatus::Rejected => Action::Reject,
      other => {
        return Err(Error::Validation(ValidationError::TargetStatus(other)));
      }
    };

    let record = self.record(matric, kind).await?;
    let step = transition::apply(kind, record.status, action)?;

    if step.is_noop(record.status) {
      return Ok(record);
    }

    self
      .store
      .set_status(matric, kind, step.next, record.file_ref.as_ref())
      .await
      .map_err(Error::storage)
  }

  /// Delete blobs no record references any more. See [`reconcile_blobs`].
  pub async fn sweep_blobs(&self, session: &Session) -> Result<SweepReport> {
    session.require_admin()?;
    reconcile_blobs(&self.store, &self.blobs).await
  }

  // ─── Internals ─────────────────────────────────────────────────────────

  async fn student(&self, matric: &MatricNo) -> Result<Student> {
    self
      .store
      .get_student(matric)
      .await
      .map_err(Error::storage)?
      .ok_or_else(|| Error::StudentNotFound(matric.clone()))
  }

  /// One record for `(matric, kind)`, materialising the student's row set
  /// first so an untouched record reads as `pending`.
  async fn record(
    &self,
    matric: &MatricNo,
    kind: DocKind,
  ) -> Result<ClearanceRecord> {
    self.student(matric).await?;
    let records =
      self.store.ensure_records(matric).await.map_err(Error::storage)?;
    records.into_iter().find(|record| record.kind == kind).ok_or_else(|| {
      // `ensure_records` guarantees all five kinds; reaching this is a
      // broken store contract.
      Error::Storage(
        format!("no {kind} record for {matric} after materialisation").into(),
      )
    })
  }
}

// ─── Blob reconciliation ─────────────────────────────────────────────────────

/// Compare the blob store against every live file reference and delete the
/// orphans: leftovers of withdrawn submissions and of uploads that crashed
/// between the blob write and the record write. Run on demand, from the
/// administrator endpoint or the maintenance CLI.
pub async fn reconcile_blobs<S, B>(store: &S, blobs: &B) -> Result<SweepReport>
where
  S: ClearanceStore,
  B: BlobStore,
{
  let live: HashSet<FileRef> = store
    .list_file_refs()
    .await
    .map_err(Error::storage)?
    .into_iter()
    .collect();

  let held = blobs.list().await.map_err(Error::blob)?;
  let scanned = held.len();

  let mut deleted = Vec::new();
  for file_ref in held {
    if !live.contains(&file_ref) {
      blobs.delete(&file_ref).await.map_err(Error::blob)?;
      deleted.push(file_ref);
    }
  }

  Ok(SweepReport { scanned, kept: scanned - deleted.len(), deleted })
}
