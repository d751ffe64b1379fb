//! Argon2 password hashing and the bearer-session extractor.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use rand_core::OsRng;
use tassel_core::{
  blob::BlobStore, session::Session, store::ClearanceStore,
  verify::CredentialVerifier,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Password hashing ────────────────────────────────────────────────────────

/// Argon2 verification of stored PHC strings, plugged into the core's
/// [`CredentialVerifier`] seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl CredentialVerifier for Argon2Verifier {
  fn verify(&self, password: &str, phc_hash: &str) -> bool {
    match PasswordHash::new(phc_hash) {
      Ok(parsed) => Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok(),
      // A malformed stored hash authenticates nobody.
      Err(_) => false,
    }
  }
}

/// Hash a password into a PHC string, e.g. `$argon2id$v=19$…`, suitable for
/// the `students.password_hash` column.
pub fn hash_password(
  password: &str,
) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

// ─── Bearer-session extractor ────────────────────────────────────────────────

/// Present in a handler's signature means the request carried a live session
/// token; the wrapped [`Session`] is what the portal's access gate inspects.
pub struct Authed(pub Session);

/// Pull the bearer token out of an `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)?
    .to_str()
    .ok()?;
  let token = header_val.strip_prefix("Bearer ")?;
  Uuid::parse_str(token).ok()
}

impl<S, B> FromRequestParts<AppState<S, B>> for Authed
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, B>,
  ) -> Result<Self, Self::Rejection> {
    let token =
      bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let session =
      state.sessions.get(&token).ok_or(ApiError::Unauthorized)?;
    Ok(Authed(session))
  }
}

#[cfg(test)]
mod tests {
  use std::{path::PathBuf, sync::Arc};

  use axum::http::{Request, header};
  use chrono::Duration;
  use tassel_core::{
    Portal,
    document::{ClearanceRecord, DocKind, DocStatus, FileRef},
    student::{MatricNo, NewStudent, Role, Student},
  };

  use super::*;
  use crate::{AppState, ServerConfig, sessions::SessionRegistry};

  // Minimal no-op backends: these tests exercise the extractor only.
  #[derive(Clone)]
  struct NoopStore;

  impl ClearanceStore for NoopStore {
    type Error = std::convert::Infallible;
    async fn create_student(&self, _: NewStudent) -> Result<Student, Self::Error> { unimplemented!() }
    async fn get_student(&self, _: &MatricNo) -> Result<Option<Student>, Self::Error> { unimplemented!() }
    async fn list_students(&self) -> Result<Vec<Student>, Self::Error> { unimplemented!() }
    async fn set_certificate_ready(&self, _: &MatricNo, _: bool) -> Result<(), Self::Error> { unimplemented!() }
    async fn set_payment_confirmed(&self, _: &MatricNo, _: bool) -> Result<(), Self::Error> { unimplemented!() }
    async fn ensure_records(&self, _: &MatricNo) -> Result<Vec<ClearanceRecord>, Self::Error> { unimplemented!() }
    async fn get_records(&self, _: &MatricNo) -> Result<Vec<ClearanceRecord>, Self::Error> { unimplemented!() }
    async fn get_record(&self, _: &MatricNo, _: DocKind) -> Result<Option<ClearanceRecord>, Self::Error> { unimplemented!() }
    async fn set_status(&self, _: &MatricNo, _: DocKind, _: DocStatus, _: Option<&FileRef>) -> Result<ClearanceRecord, Self::Error> { unimplemented!() }
    async fn clear_file(&self, _: &MatricNo, _: DocKind) -> Result<ClearanceRecord, Self::Error> { unimplemented!() }
    async fn list_file_refs(&self) -> Result<Vec<FileRef>, Self::Error> { unimplemented!() }
  }

  #[derive(Clone)]
  struct NoopBlobs;

  impl BlobStore for NoopBlobs {
    type Error = std::convert::Infallible;
    async fn save(&self, _: &[u8], _: &tassel_core::blob::BlobMeta) -> Result<FileRef, Self::Error> { unimplemented!() }
    async fn read(&self, _: &FileRef) -> Result<Option<Vec<u8>>, Self::Error> { unimplemented!() }
    async fn delete(&self, _: &FileRef) -> Result<(), Self::Error> { unimplemented!() }
    async fn list(&self) -> Result<Vec<FileRef>, Self::Error> { unimplemented!() }
  }

  fn make_state() -> AppState<NoopStore, NoopBlobs> {
    AppState {
      portal:   Arc::new(Portal::new(NoopStore, NoopBlobs, Argon2Verifier)),
      sessions: Arc::new(SessionRegistry::new(Duration::hours(12))),
      config:   Arc::new(ServerConfig {
        host:                "127.0.0.1".to_string(),
        port:                8533,
        store_path:          PathBuf::from(":memory:"),
        blob_root:           PathBuf::from("blobs"),
        session_ttl_minutes: 720,
      }),
    }
  }

  fn live_session(state: &AppState<NoopStore, NoopBlobs>) -> Uuid {
    state.sessions.insert(Session {
      token:     Uuid::new_v4(),
      matric:    MatricNo::new("eng/2020/001"),
      role:      Role::Student,
      issued_at: chrono::Utc::now(),
    })
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<NoopStore, NoopBlobs>,
  ) -> Result<Authed, ApiError> {
    let (mut parts, _) = req.into_parts();
    Authed::from_request_parts(&mut parts, state).await
  }

  #[tokio::test]
  async fn live_token_is_accepted() {
    let state = make_state();
    let token = live_session(&state);
    let req = Request::builder()
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .body(axum::body::Body::empty())
      .unwrap();

    let authed = extract(req, &state).await.unwrap();
    assert_eq!(authed.0.matric, MatricNo::new("eng/2020/001"));
  }

  #[tokio::test]
  async fn unknown_token_is_rejected() {
    let state = make_state();
    let req = Request::builder()
      .header(header::AUTHORIZATION, format!("Bearer {}", Uuid::new_v4()))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn missing_header_is_rejected() {
    let state = make_state();
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn non_bearer_scheme_is_rejected() {
    let state = make_state();
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn malformed_token_is_rejected() {
    let state = make_state();
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Bearer not-a-uuid")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn hash_then_verify_roundtrip() {
    let hash = hash_password("hunter2").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(Argon2Verifier.verify("hunter2", &hash));
    assert!(!Argon2Verifier.verify("wrong", &hash));
  }

  #[test]
  fn malformed_stored_hash_never_verifies() {
    assert!(!Argon2Verifier.verify("anything", "not-a-phc-string"));
    assert!(!Argon2Verifier.verify("anything", ""));
  }
}
