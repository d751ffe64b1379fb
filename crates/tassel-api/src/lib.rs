//! HTTP API layer for the Tassel clearance portal.
//!
//! Exposes an axum [`Router`] over a [`Portal`] assembled from any
//! [`ClearanceStore`] and [`BlobStore`]. Authentication is a bearer token
//! from `POST /api/login`, held in an in-memory [`SessionRegistry`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod sessions;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use serde::Deserialize;
use tassel_core::{Portal, blob::BlobStore, store::ClearanceStore};
use tower_http::trace::TraceLayer;

use auth::Argon2Verifier;
use sessions::SessionRegistry;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub blob_root:           PathBuf,
  /// Sessions expire this many minutes after login.
  pub session_ttl_minutes: i64,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ClearanceStore, B: BlobStore> {
  pub portal:   Arc<Portal<S, B, Argon2Verifier>>,
  pub sessions: Arc<SessionRegistry>,
  pub config:   Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the clearance portal API.
///
/// Request bodies are capped at 16 MiB. That is deliberately above the
/// 10 MiB document limit: an oversized document reaches the core and is
/// refused with a proper validation error, while only grossly oversized
/// bodies die at the transport with `413`.
pub fn router<S, B>(state: AppState<S, B>) -> Router
where
  S: ClearanceStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/api/login", post(handlers::login::login::<S, B>))
    .route("/api/logout", post(handlers::login::logout::<S, B>))
    .route("/api/readiness", get(handlers::clearance::readiness::<S, B>))
    .route("/api/clearance", get(handlers::clearance::overview::<S, B>))
    .route(
      "/api/clearance/{kind}",
      post(handlers::clearance::upload::<S, B>)
        .delete(handlers::clearance::withdraw::<S, B>),
    )
    .route(
      "/api/clearance/{kind}/file",
      get(handlers::clearance::download::<S, B>),
    )
    .route(
      "/api/id-card/notify",
      post(handlers::clearance::notify_id_card::<S, B>),
    )
    .route("/api/admin/students", get(handlers::admin::roster::<S, B>))
    .route("/api/admin/queue/{kind}", get(handlers::admin::queue::<S, B>))
    .route(
      "/api/admin/clearance/{matric}/{kind}",
      post(handlers::admin::update_status::<S, B>),
    )
    .route(
      "/api/admin/clearance/{matric}/{kind}/file",
      get(handlers::admin::download::<S, B>),
    )
    .route(
      "/api/admin/id-card/{matric}/notify",
      post(handlers::admin::notify_id_card::<S, B>),
    )
    .route("/api/admin/blobs/sweep", post(handlers::admin::sweep::<S, B>))
    .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
