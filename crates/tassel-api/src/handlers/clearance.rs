//! Handlers for the student-facing clearance endpoints.
//!
//! Every route here acts on the session's own matric; the portal's access
//! gate enforces that again underneath.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/readiness` | Certificate-collection flag only |
//! | `GET`    | `/api/clearance` | Full view; materialises missing records |
//! | `POST`   | `/api/clearance/{kind}` | Raw document bytes; `?filename=` required |
//! | `DELETE` | `/api/clearance/{kind}` | Withdraw a submission |
//! | `GET`    | `/api/clearance/{kind}/file` | Stored bytes, original media type |
//! | `POST`   | `/api/id-card/notify` | Declare the physical id-card handed in |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tassel_core::{
  blob::BlobStore,
  document::{ClearanceRecord, DocKind},
  store::ClearanceStore,
  upload::UploadPayload,
  view::StudentClearance,
};

use crate::{AppState, auth::Authed, error::ApiError};

// ─── Readiness ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
  pub certificate_ready: bool,
}

/// `GET /api/readiness`
pub async fn readiness<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
) -> Result<Json<ReadinessResponse>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = session.matric.clone();
  let certificate_ready = state.portal.readiness(&session, &matric).await?;
  Ok(Json(ReadinessResponse { certificate_ready }))
}

// ─── Overview ────────────────────────────────────────────────────────────────

/// `GET /api/clearance`
pub async fn overview<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
) -> Result<Json<StudentClearance>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = session.matric.clone();
  let view = state.portal.clearance(&session, &matric).await?;
  Ok(Json(view))
}

// ─── Upload ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  /// Client-side filename; only its extension is consulted.
  pub filename: String,
}

/// `POST /api/clearance/{kind}?filename=form.pdf`
///
/// The document goes in the request body as-is; the declared `Content-Type`
/// is checked against the filename's extension.
pub async fn upload<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
  Path(kind): Path<DocKind>,
  Query(params): Query<UploadParams>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<(StatusCode, Json<ClearanceRecord>), ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);

  let payload = UploadPayload {
    filename: params.filename,
    content_type,
    bytes:    body.to_vec(),
  };

  let matric = session.matric.clone();
  let record = state.portal.upload(&session, &matric, kind, payload).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Withdraw ────────────────────────────────────────────────────────────────

/// `DELETE /api/clearance/{kind}`
pub async fn withdraw<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
  Path(kind): Path<DocKind>,
) -> Result<Json<ClearanceRecord>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = session.matric.clone();
  let record = state.portal.delete_document(&session, &matric, kind).await?;
  Ok(Json(record))
}

// ─── Download ────────────────────────────────────────────────────────────────

/// `GET /api/clearance/{kind}/file`
pub async fn download<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
  Path(kind): Path<DocKind>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = session.matric.clone();
  let doc = state.portal.read_document(&session, &matric, kind).await?;
  Ok(([(header::CONTENT_TYPE, doc.media_type())], doc.bytes))
}

// ─── Id-card hand-in ─────────────────────────────────────────────────────────

/// `POST /api/id-card/notify`
pub async fn notify_id_card<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
) -> Result<Json<ClearanceRecord>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = session.matric.clone();
  let record = state.portal.notify_id_card(&session, &matric).await?;
  Ok(Json(record))
}
