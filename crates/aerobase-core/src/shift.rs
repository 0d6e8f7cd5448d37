//! Crew shift scheduling records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled block of duty time for one crew member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
  pub shift_id:   Uuid,
  pub org_id:     Uuid,
  pub user_id:    Uuid,
  /// What the crew member does during the shift, e.g. "pilot", "spotter".
  pub role_label: String,
  pub starts_at:  DateTime<Utc>,
  pub ends_at:    DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::OpsStore::create_shift`].
#[derive(Debug, Clone)]
pub struct NewShift {
  pub org_id:     Uuid,
  pub user_id:    Uuid,
  pub role_label: String,
  pub starts_at:  DateTime<Utc>,
  pub ends_at:    DateTime<Utc>,
}

/// Partial update applied by [`crate::store::OpsStore::update_shift`].
#[derive(Debug, Clone, Default)]
pub struct ShiftUpdate {
  pub role_label: Option<String>,
  pub starts_at:  Option<DateTime<Utc>>,
  pub ends_at:    Option<DateTime<Utc>>,
}
