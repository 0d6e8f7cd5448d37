//! KPI records and the computed dashboard summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── KPI records ─────────────────────────────────────────────────────────────

/// A safety/performance indicator value for one reporting period.
/// Upsert key: `(org_id, name, period)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiRecord {
  pub kpi_id:      Uuid,
  pub org_id:      Uuid,
  /// Indicator name, e.g. "incident_rate" or "missions_per_aircraft".
  pub name:        String,
  /// Reporting period as `YYYY-MM`.
  pub period:      String,
  pub value:       f64,
  pub target:      Option<f64>,
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::OpsStore::upsert_kpi`]. An existing record for
/// the same `(org_id, name, period)` is overwritten.
#[derive(Debug, Clone)]
pub struct NewKpi {
  pub org_id: Uuid,
  pub name:   String,
  pub period: String,
  pub value:  f64,
  pub target: Option<f64>,
}

// ─── Dashboard summary ───────────────────────────────────────────────────────

/// Mission counts keyed by status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionStatusCounts {
  pub planned:   u64,
  pub briefed:   u64,
  pub active:    u64,
  pub completed: u64,
  pub aborted:   u64,
}

/// The computed read model behind `GET /dashboard` — never stored, always
/// derived from the live tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
  pub missions:               MissionStatusCounts,
  /// Tickets in `open` or `in_progress` status.
  pub open_tickets:           u64,
  /// Open tickets at `grounding` priority — aircraft that must not fly.
  pub grounding_tickets:      u64,
  /// Total logged flight time in hours, across the whole logbook.
  pub flight_hours:           f64,
  /// Shifts starting within the next seven days.
  pub upcoming_shifts:        u64,
  /// Unread notifications for the requesting user.
  pub unread_notifications:   u64,
  /// KPI records for the requested period.
  pub kpis:                   Vec<KpiRecord>,
}
