//! Handlers for `/dashboard` and `/kpis` — the safety/performance read
//! model.

use aerobase_core::{dashboard::NewKpi, store::OpsStore};
use axum::{
  Json,
  extract::{Query, State},
  response::Response,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{AppState, auth::CurrentUser, envelope, error::ApiError, validate};

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
  pub period: Option<String>,
}

/// `GET /dashboard[?period=YYYY-MM]` — defaults to the current month.
pub async fn summary<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<PeriodParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let now = Utc::now();
  let period = match params.period {
    Some(p) => {
      validate::period(&p)?;
      p
    }
    None => now.format("%Y-%m").to_string(),
  };

  let summary = state
    .store
    .dashboard_summary(current.org_id(), current.user.user_id, now, period)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(summary))
}

/// `GET /kpis[?period=YYYY-MM]`
pub async fn list_kpis<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<PeriodParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  if let Some(p) = &params.period {
    validate::period(p)?;
  }
  let kpis = state
    .store
    .list_kpis(current.org_id(), params.period)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(kpis))
}

#[derive(Debug, Deserialize)]
pub struct UpsertBody {
  pub name:   String,
  pub period: String,
  pub value:  f64,
  pub target: Option<f64>,
}

/// `PUT /kpis` — manager+; overwrites the record for
/// `(org, name, period)`.
pub async fn upsert_kpi<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<UpsertBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  current.require_manager()?;
  validate::non_empty("name", &body.name)?;
  validate::period(&body.period)?;

  let kpi = state
    .store
    .upsert_kpi(NewKpi {
      org_id: current.org_id(),
      name:   body.name,
      period: body.period,
      value:  body.value,
      target: body.target,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(kpi))
}
