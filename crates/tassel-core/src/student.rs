//! Students — the thin envelope that owns clearance records.
//!
//! A student row is provisioned outside the portal's lifecycle (external
//! onboarding); the core only ever reads it, except for the provisioning
//! writes exposed to the server's administrative subcommands.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Matriculation numbers ───────────────────────────────────────────────────

/// A matriculation number, e.g. `eng/2020/001`.
///
/// Functions as primary key and login username. Compared byte-for-byte; the
/// portal performs no case folding or format validation of its own.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatricNo(String);

impl MatricNo {
  pub fn new(raw: impl Into<String>) -> Self { Self(raw.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for MatricNo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Roles ───────────────────────────────────────────────────────────────────

/// The capability class of an account, assigned at provisioning time.
///
/// An explicit column — never inferred from the shape of the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Admin,
}

impl Role {
  /// The discriminant string stored in the `role` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Student => "student",
      Role::Admin => "admin",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Student ─────────────────────────────────────────────────────────────────

/// A full student row, credential hash included.
///
/// This type never crosses the API boundary; read-side views carry
/// [`StudentSummary`] instead, which has no hash field at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
  pub matric:            MatricNo,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash:     String,
  pub role:              Role,
  pub email:             String,
  pub payment_confirmed: bool,
  /// Externally asserted: set by registry staff when the physical
  /// certificate is available for collection. Read-only to the portal's
  /// own lifecycle.
  pub certificate_ready: bool,
  pub created_at:        DateTime<Utc>,
}

/// Input to [`crate::store::ClearanceStore::create_student`].
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewStudent {
  pub matric:        MatricNo,
  pub password_hash: String,
  pub role:          Role,
  pub email:         String,
}

// ─── Read-side summary ───────────────────────────────────────────────────────

/// The serialisable face of a student. Omitting the credential hash here is
/// structural: no view type in this crate can leak it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
  pub matric:            MatricNo,
  pub role:              Role,
  pub email:             String,
  pub payment_confirmed: bool,
  pub certificate_ready: bool,
}

impl From<&Student> for StudentSummary {
  fn from(s: &Student) -> Self {
    Self {
      matric:            s.matric.clone(),
      role:              s.role,
      email:             s.email.clone(),
      payment_confirmed: s.payment_confirmed,
      certificate_ready: s.certificate_ready,
    }
  }
}
