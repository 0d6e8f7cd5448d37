//! Handlers for `/missions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/missions` | `status`, `pilot_in_command`, `from`, `to`, `limit`, `offset` |
//! | `POST`   | `/missions` | 201; new missions start `planned` |
//! | `GET`    | `/missions/:id` | 404 if not found |
//! | `PATCH`  | `/missions/:id` | partial update |
//! | `POST`   | `/missions/:id/status` | direct status transition |
//! | `DELETE` | `/missions/:id` | soft delete |

use aerobase_core::{
  mission::{MissionStatus, MissionUpdate, NewMission},
  store::{MissionQuery, OpsStore},
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

/// 400 unless `user_id` names a user inside the caller's org.
async fn require_org_user<S>(
  state: &AppState<S>,
  org_id: Uuid,
  field: &str,
  user_id: Uuid,
) -> Result<(), ApiError>
where
  S: OpsStore + 'static,
{
  state
    .store
    .get_user(org_id, user_id)
    .await
    .map_err(ApiError::from_store)?
    .map(|_| ())
    .ok_or_else(|| {
      ApiError::Validation(format!("{field}: no such user in org"))
    })
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:           Option<MissionStatus>,
  pub pilot_in_command: Option<Uuid>,
  pub from:             Option<DateTime<Utc>>,
  pub to:               Option<DateTime<Utc>>,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

/// `GET /missions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let missions = state
    .store
    .list_missions(current.org_id(), MissionQuery {
      status:           params.status,
      pilot_in_command: params.pilot_in_command,
      from:             params.from,
      to:               params.to,
      limit:            params.limit,
      offset:           params.offset,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(missions))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:             String,
  pub site:             String,
  pub pilot_in_command: Uuid,
  pub aircraft:         String,
  pub scheduled_start:  DateTime<Utc>,
  pub scheduled_end:    DateTime<Utc>,
  pub notes:            Option<String>,
}

/// `POST /missions`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  validate::non_empty("name", &body.name)?;
  validate::non_empty("site", &body.site)?;
  validate::non_empty("aircraft", &body.aircraft)?;
  validate::window(
    "scheduled_start",
    body.scheduled_start,
    "scheduled_end",
    body.scheduled_end,
  )?;
  require_org_user(
    &state,
    current.org_id(),
    "pilot_in_command",
    body.pilot_in_command,
  )
  .await?;

  let mission = state
    .store
    .create_mission(NewMission {
      org_id:           current.org_id(),
      name:             body.name,
      site:             body.site,
      pilot_in_command: body.pilot_in_command,
      aircraft:         body.aircraft,
      scheduled_start:  body.scheduled_start,
      scheduled_end:    body.scheduled_end,
      notes:            body.notes,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::created(mission))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /missions/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let mission = state
    .store
    .get_mission(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("mission {id} not found")))?;
  Ok(envelope::ok(mission))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:             Option<String>,
  pub site:             Option<String>,
  pub pilot_in_command: Option<Uuid>,
  pub aircraft:         Option<String>,
  pub scheduled_start:  Option<DateTime<Utc>>,
  pub scheduled_end:    Option<DateTime<Utc>>,
  pub notes:            Option<String>,
}

/// `PATCH /missions/:id` — the resulting schedule window must stay ordered,
/// even when only one end moves.
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
    .get_mission(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("mission {id} not found")))?;

  if let Some(name) = &body.name {
    validate::non_empty("name", name)?;
  }
  if let Some(site) = &body.site {
    validate::non_empty("site", site)?;
  }
  if let Some(aircraft) = &body.aircraft {
    validate::non_empty("aircraft", aircraft)?;
  }
  let start = body.scheduled_start.unwrap_or(existing.scheduled_start);
  let end = body.scheduled_end.unwrap_or(existing.scheduled_end);
  validate::window("scheduled_start", start, "scheduled_end", end)?;
  if let Some(pic) = body.pilot_in_command {
    require_org_user(&state, current.org_id(), "pilot_in_command", pic)
      .await?;
  }

  let mission = state
    .store
    .update_mission(current.org_id(), id, MissionUpdate {
      name:             body.name,
      site:             body.site,
      pilot_in_command: body.pilot_in_command,
      aircraft:         body.aircraft,
      scheduled_start:  body.scheduled_start,
      scheduled_end:    body.scheduled_end,
      notes:            body.notes,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(mission))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: MissionStatus,
}

/// `POST /missions/:id/status` — direct field update, any transition goes.
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let mission = state
    .store
    .set_mission_status(current.org_id(), id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(mission))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /missions/:id` — soft delete.
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
    .delete_mission(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok_message("mission deleted"))
}
