//! The clearance state machine.
//!
//! One pure function, [`apply`], owns every legality rule. Callers (the
//! [`Portal`](crate::portal::Portal)) validate here first and only then
//! write through the store's unconditional primitives; an illegal
//! (state, action) pair therefore never mutates anything.
//!
//! Upload-path kinds move `pending → uploaded → {verified, rejected}` with
//! `rejected → uploaded` re-upload allowed; `verified` is terminal for the
//! action set (the store itself will not stop an administrative force
//! reset, but no action performs one). The id-card moves
//! `pending → submitted_physically → verified` and never carries a file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  document::{DocKind, DocStatus},
  error::{Error, Result},
};

// ─── Actions ─────────────────────────────────────────────────────────────────

/// Everything a caller can ask the machine to do to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  /// Student attaches an electronic document.
  Upload,
  /// Student withdraws a submission; the record resets to pending.
  Delete,
  /// The id-card was handed in physically (recorded by the student, or by
  /// an administrator on receipt).
  NotifyAdmin,
  /// Administrator approves the submission.
  Verify,
  /// Administrator rejects the submission; the file stays on record.
  Reject,
}

impl Action {
  pub fn as_str(self) -> &'static str {
    match self {
      Action::Upload => "upload",
      Action::Delete => "delete",
      Action::NotifyAdmin => "notify_admin",
      Action::Verify => "verify",
      Action::Reject => "reject",
    }
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Steps ───────────────────────────────────────────────────────────────────

/// What happens to the record's stored-file reference when a step commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEffect {
  /// The caller supplies a fresh reference (upload).
  Attach,
  /// The reference is dropped (delete / reset to pending).
  Clear,
  /// Whatever is on record stays (verify, reject, notify).
  Retain,
}

/// A validated transition: the status to write and the file side-effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
  pub next: DocStatus,
  pub file: FileEffect,
}

impl Step {
  /// True when the step changes nothing — the idempotent repeat of an
  /// id-card notify or verify. Callers skip the store write entirely so
  /// `updated_at` is untouched.
  pub fn is_noop(&self, current: DocStatus) -> bool {
    self.next == current && self.file == FileEffect::Retain
  }
}

// ─── The table ───────────────────────────────────────────────────────────────

/// Validate `action` against the record's `(kind, status)` and return the
/// step to take. Every arm not listed is an [`Error::IllegalTransition`]
/// naming the current state and the attempted action.
pub fn apply(kind: DocKind, status: DocStatus, action: Action) -> Result<Step> {
  use DocStatus::*;
  use FileEffect::*;

  let step = match (action, status) {
    // Electronic submission; re-upload after rejection is allowed.
    (Action::Upload, Pending | Rejected) if kind.requires_upload() => {
      Step { next: Uploaded, file: Attach }
    }

    // Withdrawal. Never legal once verified: verified records are
    // immutable to students.
    (Action::Delete, Uploaded | Rejected) => Step { next: Pending, file: Clear },

    // Physical id-card hand-in. Once recorded (or verified) the repeat
    // call is an idempotent no-op, not an error.
    (Action::NotifyAdmin, Pending) if kind == DocKind::IdCard => {
      Step { next: SubmittedPhysically, file: Retain }
    }
    (Action::NotifyAdmin, SubmittedPhysically | Verified)
      if kind == DocKind::IdCard =>
    {
      Step { next: status, file: Retain }
    }

    // Approval: any uploaded document, or an id-card that has been handed
    // in. A re-verify of an already-verified id-card succeeds idempotently
    // because its derived notified flag never goes false again.
    (Action::Verify, Uploaded) => Step { next: Verified, file: Retain },
    (Action::Verify, SubmittedPhysically | Verified)
      if kind == DocKind::IdCard =>
    {
      Step { next: Verified, file: Retain }
    }

    // Rejection keeps the file so the administrator can still open the
    // submission that was turned down.
    (Action::Reject, Uploaded) => Step { next: Rejected, file: Retain },

    _ => return Err(Error::IllegalTransition { kind, status, action }),
  };

  Ok(step)
}
