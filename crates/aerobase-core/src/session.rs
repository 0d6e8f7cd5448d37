//! Login sessions.
//!
//! A session is issued at login and presented as a bearer token on every
//! subsequent request. Expired sessions are treated as absent on lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bearer-token session. The token itself is the primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub token:      Uuid,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }
}
