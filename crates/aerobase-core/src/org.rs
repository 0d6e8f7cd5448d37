//! Orgs (tenants) and the users who belong to them.
//!
//! Every other record in the store is scoped to an org. A record under one
//! org is invisible — and un-mutable — from every other org.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization using the platform: the tenant boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Org {
  pub org_id:     Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// What a user is allowed to do within their org.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Manager,
  Pilot,
}

/// A platform user, always belonging to exactly one org.
///
/// `password_hash` is an argon2 PHC string; it never leaves the server, so
/// it is skipped on serialization.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub user_id:      Uuid,
  pub org_id:       Uuid,
  pub display_name: String,
  pub email:        String,
  pub role:         Role,
  /// Direct supervisor, for the organization chart. `None` for roots.
  pub reports_to:   Option<Uuid>,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub active:       bool,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::OpsStore::create_user`].
/// The password is hashed by the caller; the store only sees the PHC string.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub org_id:        Uuid,
  pub display_name:  String,
  pub email:         String,
  pub role:          Role,
  pub reports_to:    Option<Uuid>,
  pub password_hash: String,
}
