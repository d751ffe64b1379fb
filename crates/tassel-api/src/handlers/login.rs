//! Handlers for session endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/login` | Body: [`LoginBody`]; returns a bearer token |
//! | `POST` | `/api/logout` | Revokes the presented token; returns 204 |

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tassel_core::{
  blob::BlobStore,
  store::ClearanceStore,
  student::{MatricNo, Role},
};
use uuid::Uuid;

use crate::{AppState, auth::Authed, error::ApiError};

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub matric:   String,
  pub password: String,
}

/// What a successful login hands back. The token goes into the
/// `Authorization: Bearer …` header of every subsequent request.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token:      Uuid,
  pub matric:     MatricNo,
  pub role:       Role,
  pub expires_at: DateTime<Utc>,
}

/// `POST /api/login`
pub async fn login<S, B>(
  State(state): State<AppState<S, B>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = MatricNo::new(body.matric);
  let session = state.portal.login(&matric, &body.password).await?;

  let expires_at = session.issued_at + state.sessions.ttl();
  let response = LoginResponse {
    token:      session.token,
    matric:     session.matric.clone(),
    role:       session.role,
    expires_at,
  };
  state.sessions.insert(session);

  Ok(Json(response))
}

// ─── Logout ──────────────────────────────────────────────────────────────────

/// `POST /api/logout`
pub async fn logout<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
) -> StatusCode
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  state.sessions.revoke(&session.token);
  StatusCode::NO_CONTENT
}
