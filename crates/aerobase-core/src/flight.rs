//! Flight logbook entries.
//!
//! One entry per flight actually flown under a mission. Entries are
//! append-only: the logbook is an audit record, never edited after the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single flight: takeoff to landing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLog {
  pub log_id:         Uuid,
  pub org_id:         Uuid,
  pub mission_id:     Uuid,
  pub pilot_id:       Uuid,
  pub aircraft:       String,
  pub takeoff_at:     DateTime<Utc>,
  pub landing_at:     DateTime<Utc>,
  pub battery_cycles: Option<u32>,
  pub remarks:        Option<String>,
  pub created_at:     DateTime<Utc>,
}

impl FlightLog {
  /// Flight duration in whole minutes. Derived, never stored.
  pub fn duration_minutes(&self) -> i64 {
    (self.landing_at - self.takeoff_at).num_minutes()
  }
}

/// Input to [`crate::store::OpsStore::add_flight_log`].
#[derive(Debug, Clone)]
pub struct NewFlightLog {
  pub org_id:         Uuid,
  pub mission_id:     Uuid,
  pub pilot_id:       Uuid,
  pub aircraft:       String,
  pub takeoff_at:     DateTime<Utc>,
  pub landing_at:     DateTime<Utc>,
  pub battery_cycles: Option<u32>,
  pub remarks:        Option<String>,
}
