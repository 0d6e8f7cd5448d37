//! Handlers for `/notifications` — always scoped to the calling user.

use aerobase_core::{notification::NewNotification, store::OpsStore};
use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, envelope, error::ApiError, validate};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub unread_only: Option<bool>,
}

/// `GET /notifications[?unread_only=true]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let notifications = state
    .store
    .list_notifications(
      current.org_id(),
      current.user.user_id,
      params.unread_only.unwrap_or(false),
    )
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(notifications))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub user_id: Uuid,
  pub kind:    String,
  pub body:    String,
}

/// `POST /notifications` — manager+; targets a user in the caller's org.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  current.require_manager()?;
  validate::non_empty("kind", &body.kind)?;
  validate::non_empty("body", &body.body)?;
  state
    .store
    .get_user(current.org_id(), body.user_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::Validation("user_id: no such user in org".into())
    })?;

  let notification = state
    .store
    .create_notification(NewNotification {
      org_id:  current.org_id(),
      user_id: body.user_id,
      kind:    body.kind,
      body:    body.body,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::created(notification))
}

/// `POST /notifications/:id/read` — idempotent.
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let notification = state
    .store
    .mark_notification_read(current.org_id(), current.user.user_id, id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(notification))
}

#[derive(Debug, Serialize)]
pub struct ReadAllData {
  pub updated: u64,
}

/// `POST /notifications/read_all`
pub async fn mark_all_read<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let updated = state
    .store
    .mark_all_notifications_read(current.org_id(), current.user.user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(ReadAllData { updated }))
}
