//! Handlers for `/procedures` — the LUC operations-manual workflow.

use aerobase_core::{
  procedure::{NewProcedure, ProcedureStatus, ProcedureUpdate},
  store::{OpsStore, ProcedureQuery},
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
  pub status: Option<ProcedureStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /procedures`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let procedures = state
    .store
    .list_procedures(current.org_id(), ProcedureQuery {
      status: params.status,
      limit:  params.limit,
      offset: params.offset,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(procedures))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub code:  String,
  pub title: String,
  pub owner: Option<Uuid>,
}

/// `POST /procedures` — starts as `draft` at revision 1.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  validate::non_empty("code", &body.code)?;
  validate::non_empty("title", &body.title)?;
  if let Some(owner) = body.owner {
    state
      .store
      .get_user(current.org_id(), owner)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| {
        ApiError::Validation("owner: no such user in org".into())
      })?;
  }

  let procedure = state
    .store
    .create_procedure(NewProcedure {
      org_id: current.org_id(),
      code:   body.code,
      title:  body.title,
      owner:  body.owner,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::created(procedure))
}

/// `GET /procedures/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let procedure = state
    .store
    .get_procedure(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("procedure {id} not found")))?;
  Ok(envelope::ok(procedure))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub title:    Option<String>,
  pub revision: Option<u32>,
  pub owner:    Option<Uuid>,
}

/// `PATCH /procedures/:id`
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
  if let Some(owner) = body.owner {
    state
      .store
      .get_user(current.org_id(), owner)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| {
        ApiError::Validation("owner: no such user in org".into())
      })?;
  }

  let procedure = state
    .store
    .update_procedure(current.org_id(), id, ProcedureUpdate {
      title:    body.title,
      revision: body.revision,
      owner:    body.owner,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(procedure))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: ProcedureStatus,
}

/// `POST /procedures/:id/status` — manager+; approving or retiring manual
/// content is a supervisory act.
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  current.require_manager()?;
  let procedure = state
    .store
    .set_procedure_status(current.org_id(), id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(procedure))
}
