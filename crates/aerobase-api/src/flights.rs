//! Handlers for flight logbook endpoints.
//!
//! The logbook is append-only: entries can be listed and added, never
//! edited or removed.

use aerobase_core::{
  flight::NewFlightLog,
  store::{FlightQuery, OpsStore},
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
  pub mission_id: Option<Uuid>,
  pub pilot_id:   Option<Uuid>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

/// `GET /flights` — the whole org logbook, newest takeoff first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let logs = state
    .store
    .list_flight_logs(current.org_id(), FlightQuery {
      mission_id: params.mission_id,
      pilot_id:   params.pilot_id,
      limit:      params.limit,
      offset:     params.offset,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(logs))
}

/// `GET /missions/:id/flights`
pub async fn list_for_mission<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  // 404 rather than an empty list for unknown missions.
  state
    .store
    .get_mission(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("mission {id} not found")))?;

  let logs = state
    .store
    .list_flight_logs(current.org_id(), FlightQuery {
      mission_id: Some(id),
      pilot_id:   params.pilot_id,
      limit:      params.limit,
      offset:     params.offset,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(logs))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  /// Defaults to the caller; logging on someone else's behalf requires
  /// manager role.
  pub pilot_id:       Option<Uuid>,
  pub aircraft:       String,
  pub takeoff_at:     DateTime<Utc>,
  pub landing_at:     DateTime<Utc>,
  pub battery_cycles: Option<u32>,
  pub remarks:        Option<String>,
}

/// `POST /missions/:id/flights`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  validate::non_empty("aircraft", &body.aircraft)?;
  validate::flight_times(body.takeoff_at, body.landing_at)?;

  let pilot_id = body.pilot_id.unwrap_or(current.user.user_id);
  if pilot_id != current.user.user_id {
    current.require_manager()?;
    state
      .store
      .get_user(current.org_id(), pilot_id)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| {
        ApiError::Validation("pilot_id: no such user in org".into())
      })?;
  }

  let log = state
    .store
    .add_flight_log(NewFlightLog {
      org_id:         current.org_id(),
      mission_id:     id,
      pilot_id,
      aircraft:       body.aircraft,
      takeoff_at:     body.takeoff_at,
      landing_at:     body.landing_at,
      battery_cycles: body.battery_cycles,
      remarks:        body.remarks,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::created(log))
}
