//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as the standard `{ok:false, code, message}` envelope.
//! Policy rejections are data and keep HTTP 200; only infrastructure faults
//! change the status.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use kiosk_core::{
  outcome::{ErrorCode, Rejection},
  wire::Envelope,
};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("rejected: {}", .0.message)]
  Rejected(Rejection),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store not connected")]
  DbNotReady,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, envelope) = match self {
      ApiError::Rejected(r) => (StatusCode::OK, Envelope::<()>::from(r)),
      ApiError::BadRequest(m) => (
        StatusCode::BAD_REQUEST,
        Envelope::failure(ErrorCode::BadRequest, m),
      ),
      ApiError::DbNotReady => (
        StatusCode::SERVICE_UNAVAILABLE,
        Envelope::failure(ErrorCode::DbNotReady, "Database not ready"),
      ),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "feedback insert failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Envelope::failure(ErrorCode::ServerError, "Failed to submit feedback"),
        )
      }
    };
    (status, Json(envelope)).into_response()
  }
}
