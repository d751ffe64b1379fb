//! Sessions — the explicit capability object of the access gate.
//!
//! A [`Session`] is produced by [`Portal::login`](crate::portal::Portal::login)
//! and passed into every core operation; the core holds no ambient or
//! process-wide session state. The capability rules:
//!
//! - upload / delete: the student themself, on their own matric only;
//! - notify (id-card hand-in): the student themself, or an administrator
//!   recording the receipt for any matric;
//! - clearance / readiness reads: the student themself or an administrator;
//! - roster, status updates, blob sweep: administrators only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  student::{MatricNo, Role, Student},
};

/// A live capability: who is acting, and with which role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub token:     Uuid,
  pub matric:    MatricNo,
  pub role:      Role,
  pub issued_at: DateTime<Utc>,
}

impl Session {
  /// Mint a fresh session for a successfully authenticated account.
  pub fn issue(student: &Student) -> Self {
    Self {
      token:     Uuid::new_v4(),
      matric:    student.matric.clone(),
      role:      student.role,
      issued_at: Utc::now(),
    }
  }

  pub fn is_admin(&self) -> bool { self.role == Role::Admin }

  /// Student-only operations on the student's own records (upload, delete).
  /// Administrators review submissions; they do not make them.
  pub fn require_self(&self, matric: &MatricNo) -> Result<()> {
    if self.role != Role::Student {
      return Err(Error::Forbidden(
        "administrators cannot submit or withdraw documents".to_string(),
      ));
    }
    if &self.matric != matric {
      return Err(Error::Forbidden(format!(
        "{} may not act on records of {matric}",
        self.matric
      )));
    }
    Ok(())
  }

  /// Reads and the id-card hand-in: the student themself, or any
  /// administrator.
  pub fn require_self_or_admin(&self, matric: &MatricNo) -> Result<()> {
    if self.is_admin() || &self.matric == matric {
      Ok(())
    } else {
      Err(Error::Forbidden(format!(
        "{} may not access records of {matric}",
        self.matric
      )))
    }
  }

  /// Administrator-only operations.
  pub fn require_admin(&self) -> Result<()> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(Error::Forbidden(
        "administrator capability required".to_string(),
      ))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn session(matric: &str, role: Role) -> Session {
    Session {
      token:     Uuid::new_v4(),
      matric:    MatricNo::new(matric),
      role,
      issued_at: Utc::now(),
    }
  }

  #[test]
  fn student_may_only_act_on_own_matric() {
    let s = session("eng/2020/001", Role::Student);
    assert!(s.require_self(&MatricNo::new("eng/2020/001")).is_ok());
    assert!(matches!(
      s.require_self(&MatricNo::new("eng/2020/002")),
      Err(Error::Forbidden(_))
    ));
  }

  #[test]
  fn admin_cannot_submit_documents() {
    let a = session("staff/0001", Role::Admin);
    assert!(matches!(
      a.require_self(&MatricNo::new("staff/0001")),
      Err(Error::Forbidden(_))
    ));
  }

  #[test]
  fn admin_reads_any_record_student_reads_own() {
    let a = session("staff/0001", Role::Admin);
    let s = session("eng/2020/001", Role::Student);
    let other = MatricNo::new("eng/2020/002");

    assert!(a.require_self_or_admin(&other).is_ok());
    assert!(s.require_self_or_admin(&s.matric.clone()).is_ok());
    assert!(s.require_self_or_admin(&other).is_err());
  }

  #[test]
  fn admin_gate_refuses_students() {
    assert!(session("staff/0001", Role::Admin).require_admin().is_ok());
    assert!(
      session("eng/2020/001", Role::Student)
        .require_admin()
        .is_err()
    );
  }
}
