//! Missions — drone flight operation records.
//!
//! A mission's status is a stored enumeration transitioned by direct field
//! update; there is no in-process transition machine. Missions are
//! soft-deleted: `deleted_at` is set and the row drops out of every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a mission sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
  Planned,
  Briefed,
  Active,
  Completed,
  Aborted,
}

/// A planned or flown drone operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
  pub mission_id:       Uuid,
  pub org_id:           Uuid,
  pub name:             String,
  /// Free-text site or location designation.
  pub site:             String,
  /// PiC — the pilot in command.
  pub pilot_in_command: Uuid,
  /// Registration or callsign of the aircraft flown.
  pub aircraft:         String,
  pub status:           MissionStatus,
  pub scheduled_start:  DateTime<Utc>,
  pub scheduled_end:    DateTime<Utc>,
  pub notes:            Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deleted_at:       Option<DateTime<Utc>>,
}

/// Input to [`crate::store::OpsStore::create_mission`].
/// New missions always start as [`MissionStatus::Planned`].
#[derive(Debug, Clone)]
pub struct NewMission {
  pub org_id:           Uuid,
  pub name:             String,
  pub site:             String,
  pub pilot_in_command: Uuid,
  pub aircraft:         String,
  pub scheduled_start:  DateTime<Utc>,
  pub scheduled_end:    DateTime<Utc>,
  pub notes:            Option<String>,
}

/// Partial update applied by [`crate::store::OpsStore::update_mission`].
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MissionUpdate {
  pub name:             Option<String>,
  pub site:             Option<String>,
  pub pilot_in_command: Option<Uuid>,
  pub aircraft:         Option<String>,
  pub scheduled_start:  Option<DateTime<Utc>>,
  pub scheduled_end:    Option<DateTime<Utc>>,
  pub notes:            Option<String>,
}
