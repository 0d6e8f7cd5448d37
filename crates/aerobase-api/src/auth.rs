//! Bearer-token sessions: login/logout handlers, password hashing, and the
//! [`CurrentUser`] extractor every protected handler pulls in.

use aerobase_core::{
  org::{Role, User},
  session::Session,
  store::OpsStore,
};
use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::request::Parts,
  response::Response,
};
use chrono::{DateTime, Duration, Utc};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, envelope, error::ApiError, validate};

/// How long a login session stays valid.
pub const SESSION_TTL_HOURS: i64 = 12;

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Store(format!("argon2 error: {e}").into()))
}

/// Verify a password against a stored PHC string. An unparseable hash is
/// treated as a mismatch.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The authenticated caller: resolved session plus the user behind it.
/// Present in a handler's arguments means the request carried a valid,
/// unexpired bearer token for an active user.
pub struct CurrentUser {
  pub session: Session,
  pub user:    User,
}

impl CurrentUser {
  pub fn org_id(&self) -> Uuid { self.user.org_id }

  /// Managers and admins pass.
  pub fn require_manager(&self) -> Result<(), ApiError> {
    match self.user.role {
      Role::Admin | Role::Manager => Ok(()),
      Role::Pilot => {
        Err(ApiError::Forbidden("requires manager role".into()))
      }
    }
  }

  pub fn require_admin(&self) -> Result<(), ApiError> {
    if self.user.role == Role::Admin {
      Ok(())
    } else {
      Err(ApiError::Forbidden("requires admin role".into()))
    }
  }
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: OpsStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

    let token = header
      .strip_prefix("Bearer ")
      .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    let token = Uuid::parse_str(token.trim())
      .map_err(|_| ApiError::Unauthorized("malformed bearer token".into()))?;

    let (session, user) = state
      .store
      .get_session(token, Utc::now())
      .await
      .map_err(ApiError::from_store)?
      .ok_or_else(|| {
        ApiError::Unauthorized("invalid or expired session".into())
      })?;

    Ok(CurrentUser { session, user })
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
  pub token:      Uuid,
  pub expires_at: DateTime<Utc>,
  pub user:       User,
}

/// `POST /auth/login` — the only unauthenticated endpoint.
///
/// Unknown emails, wrong passwords, and deactivated users all yield the
/// same 401 so the response does not leak which emails exist.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  validate::non_empty("email", &body.email)?;
  validate::non_empty("password", &body.password)?;

  let user = state
    .store
    .get_user_by_email(body.email)
    .await
    .map_err(ApiError::from_store)?
    .filter(|u| u.active)
    .ok_or_else(|| ApiError::Unauthorized("invalid credentials".into()))?;

  if !verify_password(&body.password, &user.password_hash) {
    return Err(ApiError::Unauthorized("invalid credentials".into()));
  }

  let expires_at = Utc::now() + Duration::hours(SESSION_TTL_HOURS);
  let session = state
    .store
    .create_session(user.user_id, expires_at)
    .await
    .map_err(ApiError::from_store)?;

  Ok(envelope::ok(LoginData {
    token: session.token,
    expires_at: session.expires_at,
    user,
  }))
}

/// `POST /auth/logout` — deletes the presented session.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  state
    .store
    .delete_session(current.session.token)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok_message("logged out"))
}

/// `GET /auth/me`
pub async fn me<S>(current: CurrentUser) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  Ok(envelope::ok(current.user))
}
