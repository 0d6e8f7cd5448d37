//! Handlers for `/shifts` — crew duty scheduling.

use aerobase_core::{
  shift::{NewShift, ShiftUpdate},
  store::{OpsStore, ShiftQuery},
};
use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, envelope, error::ApiError, validate};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id: Option<Uuid>,
  pub from:    Option<DateTime<Utc>>,
  pub to:      Option<DateTime<Utc>>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

/// `GET /shifts` — `from`/`to` select shifts overlapping the window.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let shifts = state
    .store
    .list_shifts(current.org_id(), ShiftQuery {
      user_id: params.user_id,
      from:    params.from,
      to:      params.to,
      limit:   params.limit,
      offset:  params.offset,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(shifts))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub user_id:    Uuid,
  pub role_label: String,
  pub starts_at:  DateTime<Utc>,
  pub ends_at:    DateTime<Utc>,
}

/// `POST /shifts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  validate::non_empty("role_label", &body.role_label)?;
  validate::window("starts_at", body.starts_at, "ends_at", body.ends_at)?;
  state
    .store
    .get_user(current.org_id(), body.user_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::Validation("user_id: no such user in org".into())
    })?;

  let shift = state
    .store
    .create_shift(NewShift {
      org_id:     current.org_id(),
      user_id:    body.user_id,
      role_label: body.role_label,
      starts_at:  body.starts_at,
      ends_at:    body.ends_at,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::created(shift))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub role_label: Option<String>,
  pub starts_at:  Option<DateTime<Utc>>,
  pub ends_at:    Option<DateTime<Utc>>,
}

/// `PATCH /shifts/:id` — the resulting duty window must stay ordered, even
/// when only one end moves.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let existing = state
    .store
    .get_shift(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("shift {id} not found")))?;

  if let Some(label) = &body.role_label {
    validate::non_empty("role_label", label)?;
  }
  let starts = body.starts_at.unwrap_or(existing.starts_at);
  let ends = body.ends_at.unwrap_or(existing.ends_at);
  validate::window("starts_at", starts, "ends_at", ends)?;

  let shift = state
    .store
    .update_shift(current.org_id(), id, ShiftUpdate {
      role_label: body.role_label,
      starts_at:  body.starts_at,
      ends_at:    body.ends_at,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(shift))
}

/// `DELETE /shifts/:id` — hard delete; shifts carry no history requirement.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  state
    .store
    .delete_shift(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok_message("shift deleted"))
}
