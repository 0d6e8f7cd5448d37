//! Handlers for `/users` — admin-only user administration.

use aerobase_core::{
  org::{NewUser, Role},
  store::OpsStore,
};
use axum::{Json, extract::State, response::Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{self, CurrentUser},
  envelope,
  error::ApiError,
  validate,
};

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  current.require_admin()?;
  let users = state
    .store
    .list_users(current.org_id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(users))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub display_name: String,
  pub email:        String,
  pub role:         Role,
  pub reports_to:   Option<Uuid>,
  pub password:     String,
}

/// `POST /users` — hashes the password; the store never sees plaintext.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  current.require_admin()?;
  validate::non_empty("display_name", &body.display_name)?;
  validate::email(&body.email)?;
  validate::non_empty("password", &body.password)?;
  if let Some(reports_to) = body.reports_to {
    state
      .store
      .get_user(current.org_id(), reports_to)
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| {
        ApiError::Validation("reports_to: no such user in org".into())
      })?;
  }

  // Emails are unique platform-wide; reject here with a 400 rather than
  // letting the store surface it as an internal error.
  if state
    .store
    .get_user_by_email(body.email.clone())
    .await
    .map_err(ApiError::from_store)?
    .is_some()
  {
    return Err(ApiError::Validation("email is already registered".into()));
  }

  let password_hash = auth::hash_password(&body.password)?;
  let user = state
    .store
    .create_user(NewUser {
      org_id: current.org_id(),
      display_name: body.display_name,
      email: body.email,
      role: body.role,
      reports_to: body.reports_to,
      password_hash,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::created(user))
}
