//! [`SqliteStore`] — the SQLite implementation of [`ClearanceStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tassel_core::{
  document::{ClearanceRecord, DocKind, DocStatus, FileRef},
  store::ClearanceStore,
  student::{MatricNo, NewStudent, Student},
};

use crate::{
  encode::{RawRecord, RawStudent, encode_dt},
  schema::SCHEMA,
  Error, Result,
};

const STUDENT_COLUMNS: &str = "matric_no, password_hash, role, email, \
                               payment_confirmed, certificate_ready, created_at";
const RECORD_COLUMNS: &str =
  "matric_no, doc_kind, status, file_ref, updated_at";

fn read_student(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStudent> {
  Ok(RawStudent {
    matric_no:         row.get(0)?,
    password_hash:     row.get(1)?,
    role:              row.get(2)?,
    email:             row.get(3)?,
    payment_confirmed: row.get(4)?,
    certificate_ready: row.get(5)?,
    created_at:        row.get(6)?,
  })
}

fn read_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
  Ok(RawRecord {
    matric_no:  row.get(0)?,
    doc_kind:   row.get(1)?,
    status:     row.get(2)?,
    file_ref:   row.get(3)?,
    updated_at: row.get(4)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tassel clearance store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one `clearance_data` row, decoded.
  async fn fetch_record(
    &self,
    matric: &MatricNo,
    kind: DocKind,
  ) -> Result<Option<ClearanceRecord>> {
    let matric_str = matric.as_str().to_owned();
    let kind_str = kind.as_str();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RECORD_COLUMNS} FROM clearance_data
                   WHERE matric_no = ?1 AND doc_kind = ?2"
              ),
              rusqlite::params![matric_str, kind_str],
              read_record,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }
}

// ─── ClearanceStore impl ─────────────────────────────────────────────────────

impl ClearanceStore for SqliteStore {
  type Error = Error;

  // ── Students ──────────────────────────────────────────────────────────────

  async fn create_student(&self, input: NewStudent) -> Result<Student> {
    let student = Student {
      matric:            input.matric,
      password_hash:     input.password_hash,
      role:              input.role,
      email:             input.email,
      payment_confirmed: false,
      certificate_ready: false,
      created_at:        Utc::now(),
    };

    let matric_str = student.matric.as_str().to_owned();
    let hash_str = student.password_hash.clone();
    let role_str = student.role.as_str();
    let email_str = student.email.clone();
    let at_str = encode_dt(student.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM students WHERE matric_no = ?1",
            rusqlite::params![matric_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if exists {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO students (matric_no, password_hash, role, email,
             payment_confirmed, certificate_ready, created_at)
           VALUES (?1, ?2, ?3, ?4, 0, 0, ?5)",
          rusqlite::params![matric_str, hash_str, role_str, email_str, at_str],
        )?;

        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::StudentExists(student.matric));
    }
    Ok(student)
  }

  async fn get_student(&self, matric: &MatricNo) -> Result<Option<Student>> {
    let matric_str = matric.as_str().to_owned();

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {STUDENT_COLUMNS} FROM students WHERE matric_no = ?1"
              ),
              rusqlite::params![matric_str],
              read_student,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn list_students(&self) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} FROM students ORDER BY matric_no"
        ))?;
        let rows = stmt
          .query_map([], read_student)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn set_certificate_ready(
    &self,
    matric: &MatricNo,
    ready: bool,
  ) -> Result<()> {
    let matric_str = matric.as_str().to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE students SET certificate_ready = ?2 WHERE matric_no = ?1",
          rusqlite::params![matric_str, ready],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::StudentNotFound(matric.clone()));
    }
    Ok(())
  }

  async fn set_payment_confirmed(
    &self,
    matric: &MatricNo,
    confirmed: bool,
  ) -> Result<()> {
    let matric_str = matric.as_str().to_owned();

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE students SET payment_confirmed = ?2 WHERE matric_no = ?1",
          rusqlite::params![matric_str, confirmed],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::StudentNotFound(matric.clone()));
    }
    Ok(())
  }

  // ── Records ───────────────────────────────────────────────────────────────

  async fn ensure_records(
    &self,
    matric: &MatricNo,
  ) -> Result<Vec<ClearanceRecord>> {
    let matric_str = matric.as_str().to_owned();
    let now_str = encode_dt(Utc::now());

    // One transaction for the whole materialisation: either all five rows
    // exist on commit or nothing changed. INSERT OR IGNORE against the
    // (matric_no, doc_kind) primary key makes concurrent first reads
    // collapse onto the same rows instead of duplicating them.
    let raws: Option<Vec<RawRecord>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM students WHERE matric_no = ?1",
            rusqlite::params![matric_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        for kind in DocKind::ALL {
          tx.execute(
            "INSERT OR IGNORE INTO clearance_data
               (matric_no, doc_kind, status, file_ref, updated_at)
             VALUES (?1, ?2, 'pending', NULL, ?3)",
            rusqlite::params![matric_str, kind.as_str(), now_str],
          )?;
        }

        let rows = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM clearance_data WHERE matric_no = ?1"
          ))?;
          stmt
            .query_map(rusqlite::params![matric_str], read_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;
        Ok(Some(rows))
      })
      .await?;

    let raws = raws.ok_or_else(|| Error::StudentNotFound(matric.clone()))?;
    let mut records = raws
      .into_iter()
      .map(RawRecord::into_record)
      .collect::<Result<Vec<_>>>()?;
    records.sort_by_key(|record| record.kind);
    Ok(records)
  }

  async fn get_records(
    &self,
    matric: &MatricNo,
  ) -> Result<Vec<ClearanceRecord>> {
    let matric_str = matric.as_str().to_owned();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM clearance_data WHERE matric_no = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![matric_str], read_record)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut records = raws
      .into_iter()
      .map(RawRecord::into_record)
      .collect::<Result<Vec<_>>>()?;
    records.sort_by_key(|record| record.kind);
    Ok(records)
  }

  async fn get_record(
    &self,
    matric: &MatricNo,
    kind: DocKind,
  ) -> Result<Option<ClearanceRecord>> {
    self.fetch_record(matric, kind).await
  }

  async fn set_status(
    &self,
    matric: &MatricNo,
    kind: DocKind,
    status: DocStatus,
    file_ref: Option<&FileRef>,
  ) -> Result<ClearanceRecord> {
    let matric_str = matric.as_str().to_owned();
    let kind_str = kind.as_str();
    let status_str = status.as_str();
    let file_str = file_ref.map(|r| r.as_str().to_owned());
    let now_str = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE clearance_data
             SET status = ?3, file_ref = ?4, updated_at = ?5
           WHERE matric_no = ?1 AND doc_kind = ?2",
          rusqlite::params![matric_str, kind_str, status_str, file_str, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RecordNotFound { matric: matric.clone(), kind });
    }

    self.fetch_record(matric, kind).await?.ok_or_else(|| {
      Error::RecordNotFound { matric: matric.clone(), kind }
    })
  }

  async fn clear_file(
    &self,
    matric: &MatricNo,
    kind: DocKind,
  ) -> Result<ClearanceRecord> {
    self.set_status(matric, kind, DocStatus::Pending, None).await
  }

  async fn list_file_refs(&self) -> Result<Vec<FileRef>> {
    let refs: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT file_ref FROM clearance_data WHERE file_ref IS NOT NULL",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(refs.into_iter().map(FileRef::new).collect())
  }
}
