//! SQL schema for the Tassel SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS students (
    matric_no          TEXT PRIMARY KEY,
    password_hash      TEXT NOT NULL,   -- PHC string (argon2id)
    role               TEXT NOT NULL DEFAULT 'student',  -- 'student' | 'admin'
    email              TEXT NOT NULL,
    payment_confirmed  INTEGER NOT NULL DEFAULT 0,
    certificate_ready  INTEGER NOT NULL DEFAULT 0,
    created_at         TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- One row per (student, document kind), materialised lazily on the first
-- portal read. The composite primary key is what makes materialisation
-- race-safe: concurrent INSERT OR IGNOREs collapse onto a single row.
CREATE TABLE IF NOT EXISTS clearance_data (
    matric_no   TEXT NOT NULL REFERENCES students(matric_no),
    doc_kind    TEXT NOT NULL,   -- kebab-case DocKind discriminant
    status      TEXT NOT NULL DEFAULT 'pending',
    file_ref    TEXT,            -- blob-store reference; NULL when no file
    updated_at  TEXT NOT NULL,   -- ISO 8601 UTC; stamped on every write
    PRIMARY KEY (matric_no, doc_kind)
);

CREATE INDEX IF NOT EXISTS clearance_kind_idx   ON clearance_data(doc_kind);
CREATE INDEX IF NOT EXISTS clearance_status_idx ON clearance_data(status);

PRAGMA user_version = 1;
";
