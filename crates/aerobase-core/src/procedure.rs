//! LUC procedures — operations-manual workflow records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureStatus {
  Draft,
  InReview,
  Approved,
  Retired,
}

/// One procedure in the operations manual, e.g. "PRE-FLT-01 rev 3".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Procedure {
  pub procedure_id: Uuid,
  pub org_id:       Uuid,
  /// Short manual reference, e.g. "PRE-FLT-01".
  pub code:         String,
  pub title:        String,
  pub revision:     u32,
  pub status:       ProcedureStatus,
  /// The user responsible for keeping the procedure current.
  pub owner:        Option<Uuid>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Input to [`crate::store::OpsStore::create_procedure`].
/// New procedures always start as [`ProcedureStatus::Draft`] at revision 1.
#[derive(Debug, Clone)]
pub struct NewProcedure {
  pub org_id: Uuid,
  pub code:   String,
  pub title:  String,
  pub owner:  Option<Uuid>,
}

/// Partial update applied by [`crate::store::OpsStore::update_procedure`].
#[derive(Debug, Clone, Default)]
pub struct ProcedureUpdate {
  pub title:    Option<String>,
  pub revision: Option<u32>,
  pub owner:    Option<Uuid>,
}
