//! The `{code, status, message, data}` response envelope.
//!
//! Every response — success and error alike — is wrapped in this shape.
//! `code` mirrors the HTTP status; `status` is `"ok"` or `"error"`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub code:    u16,
  pub status:  &'static str,
  pub message: String,
  pub data:    Option<T>,
}

/// 200 with the payload under `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
  respond(StatusCode::OK, "ok", Some(data))
}

/// 201 with the created record under `data`.
pub fn created<T: Serialize>(data: T) -> Response {
  respond(StatusCode::CREATED, "created", Some(data))
}

/// 200 with a message and no payload — used by deletes and logout.
pub fn ok_message(message: &str) -> Response {
  respond::<serde_json::Value>(StatusCode::OK, message, None)
}

fn respond<T: Serialize>(
  code: StatusCode,
  message: &str,
  data: Option<T>,
) -> Response {
  (
    code,
    Json(Envelope {
      code: code.as_u16(),
      status: "ok",
      message: message.to_string(),
      data,
    }),
  )
    .into_response()
}

/// The error half of the envelope, rendered by [`crate::ApiError`].
pub fn error(code: StatusCode, message: &str) -> Response {
  (
    code,
    Json(Envelope::<serde_json::Value> {
      code:    code.as_u16(),
      status:  "error",
      message: message.to_string(),
      data:    None,
    }),
  )
    .into_response()
}
