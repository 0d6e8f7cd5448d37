//! Handlers for `/tickets` — maintenance findings against aircraft.

use aerobase_core::{
  store::{OpsStore, TicketQuery},
  ticket::{NewTicket, TicketPriority, TicketStatus, TicketUpdate},
};
use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, envelope, error::ApiError, validate};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:   Option<TicketStatus>,
  pub priority: Option<TicketPriority>,
  pub assignee: Option<Uuid>,
  pub aircraft: Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /tickets`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let tickets = state
    .store
    .list_tickets(current.org_id(), TicketQuery {
      status:   params.status,
      priority: params.priority,
      assignee: params.assignee,
      aircraft: params.aircraft,
      limit:    params.limit,
      offset:   params.offset,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(tickets))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub aircraft:    String,
  pub title:       String,
  pub description: String,
  /// Defaults to `normal`.
  pub priority:    Option<TicketPriority>,
  pub assignee:    Option<Uuid>,
}

/// `POST /tickets` — anyone in the org can report a finding.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  validate::non_empty("aircraft", &body.aircraft)?;
  validate::non_empty("title", &body.title)?;
  if let Some(assignee) = body.assignee {
    state
      .store
      .get_user(current.org_id(), assignee)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| {
        ApiError::Validation("assignee: no such user in org".into())
      })?;
  }

  let ticket = state
    .store
    .create_ticket(NewTicket {
      org_id:      current.org_id(),
      aircraft:    body.aircraft,
      title:       body.title,
      description: body.description,
      priority:    body.priority.unwrap_or(TicketPriority::Normal),
      assignee:    body.assignee,
      created_by:  current.user.user_id,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::created(ticket))
}

/// `GET /tickets/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let ticket = state
    .store
    .get_ticket(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("ticket {id} not found")))?;
  Ok(envelope::ok(ticket))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub priority:    Option<TicketPriority>,
  pub assignee:    Option<Uuid>,
}

/// `PATCH /tickets/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  if let Some(title) = &body.title {
    validate::non_empty("title", title)?;
  }
  if let Some(assignee) = body.assignee {
    state
      .store
      .get_user(current.org_id(), assignee)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| {
        ApiError::Validation("assignee: no such user in org".into())
      })?;
  }

  let ticket = state
    .store
    .update_ticket(current.org_id(), id, TicketUpdate {
      title:       body.title,
      description: body.description,
      priority:    body.priority,
      assignee:    body.assignee,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(ticket))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: TicketStatus,
}

/// `POST /tickets/:id/status`
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let ticket = state
    .store
    .set_ticket_status(current.org_id(), id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(ticket))
}
