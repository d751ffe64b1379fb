//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use tassel_core::Error as CoreError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, malformed, expired or revoked bearer token.
  #[error("unauthorized")]
  Unauthorized,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_owned())
      }
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Core(e) => (core_status(e), e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

/// HTTP status for each core failure. `BadCredentials` stays one opaque 401
/// for unknown matric and wrong password alike.
fn core_status(e: &CoreError) -> StatusCode {
  match e {
    CoreError::StudentNotFound(_) | CoreError::FileNotFound { .. } => {
      StatusCode::NOT_FOUND
    }
    CoreError::BadCredentials => StatusCode::UNAUTHORIZED,
    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
    CoreError::IllegalTransition { .. } => StatusCode::CONFLICT,
    CoreError::Storage(_) | CoreError::Blob(_) => {
      StatusCode::INTERNAL_SERVER_ERROR
    }
  }
}
