//! API error type and [`axum::response::IntoResponse`] implementation.

use aerobase_core::store::StoreError;
use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::envelope;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Request shape or field validation failed — 400.
  #[error("{0}")]
  Validation(String),

  /// Missing, malformed, or expired credentials — 401.
  #[error("{0}")]
  Unauthorized(String),

  /// Authenticated but not allowed — 403.
  #[error("{0}")]
  Forbidden(String),

  /// No such record in the caller's org — 404.
  #[error("{0}")]
  NotFound(String),

  /// Anything the backend failed at — 500.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error: typed "no such row" errors become 404,
  /// everything else 500.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if e.is_not_found() {
      ApiError::NotFound(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    envelope::error(status, &message)
  }
}
