//! Handlers for the administrator endpoints.
//!
//! Matric numbers contain slashes, so they arrive URL-encoded in path
//! segments (`eng%2F2020%2F001`); `Path` hands them back decoded.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/admin/students` | Roster: every student with their records |
//! | `GET`  | `/api/admin/queue/{kind}` | Review queue for one document kind |
//! | `POST` | `/api/admin/clearance/{matric}/{kind}` | Body: [`StatusBody`]; verdict only |
//! | `GET`  | `/api/admin/clearance/{matric}/{kind}/file` | Stored bytes for review |
//! | `POST` | `/api/admin/id-card/{matric}/notify` | Record a physical hand-in |
//! | `POST` | `/api/admin/blobs/sweep` | Reconcile blobs against records |

use axum::{
  Json,
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use serde::Deserialize;
use tassel_core::{
  blob::{BlobStore, SweepReport},
  document::{ClearanceRecord, DocKind, DocStatus},
  store::ClearanceStore,
  student::MatricNo,
  view::{QueueItem, RosterEntry},
};

use crate::{AppState, auth::Authed, error::ApiError};

// ─── Roster ──────────────────────────────────────────────────────────────────

/// `GET /api/admin/students`
pub async fn roster<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
) -> Result<Json<Vec<RosterEntry>>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.portal.admin_roster(&session).await?))
}

// ─── Queues ──────────────────────────────────────────────────────────────────

/// `GET /api/admin/queue/{kind}`
pub async fn queue<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
  Path(kind): Path<DocKind>,
) -> Result<Json<Vec<QueueItem>>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.portal.admin_queue(&session, kind).await?))
}

// ─── Review verdicts ─────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/admin/clearance/{matric}/{kind}`.
/// Only `"verified"` and `"rejected"` pass validation underneath.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: DocStatus,
}

/// `POST /api/admin/clearance/{matric}/{kind}`
pub async fn update_status<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
  Path((matric, kind)): Path<(String, DocKind)>,
  Json(body): Json<StatusBody>,
) -> Result<Json<ClearanceRecord>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = MatricNo::new(matric);
  let record = state
    .portal
    .admin_update_status(&session, &matric, kind, body.status)
    .await?;
  Ok(Json(record))
}

// ─── Download ────────────────────────────────────────────────────────────────

/// `GET /api/admin/clearance/{matric}/{kind}/file`
pub async fn download<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
  Path((matric, kind)): Path<(String, DocKind)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = MatricNo::new(matric);
  let doc = state.portal.read_document(&session, &matric, kind).await?;
  Ok(([(header::CONTENT_TYPE, doc.media_type())], doc.bytes))
}

// ─── Id-card hand-in ─────────────────────────────────────────────────────────

/// `POST /api/admin/id-card/{matric}/notify`
pub async fn notify_id_card<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
  Path(matric): Path<String>,
) -> Result<Json<ClearanceRecord>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let matric = MatricNo::new(matric);
  let record = state.portal.notify_id_card(&session, &matric).await?;
  Ok(Json(record))
}

// ─── Blob sweep ──────────────────────────────────────────────────────────────

/// `POST /api/admin/blobs/sweep`
pub async fn sweep<S, B>(
  State(state): State<AppState<S, B>>,
  Authed(session): Authed,
) -> Result<Json<SweepReport>, ApiError>
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.portal.sweep_blobs(&session).await?))
}
