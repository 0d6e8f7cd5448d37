//! Maintenance tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
  Open,
  InProgress,
  Resolved,
  Closed,
}

impl TicketStatus {
  /// Open and in-progress tickets count against the dashboard's open total.
  pub fn is_open(&self) -> bool {
    matches!(self, Self::Open | Self::InProgress)
  }
}

/// How urgently a ticket needs attention. `Grounding` means the aircraft
/// must not fly until the ticket is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
  Low,
  Normal,
  High,
  Grounding,
}

/// A maintenance finding or defect report against an aircraft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
  pub ticket_id:   Uuid,
  pub org_id:      Uuid,
  pub aircraft:    String,
  pub title:       String,
  pub description: String,
  pub status:      TicketStatus,
  pub priority:    TicketPriority,
  pub assignee:    Option<Uuid>,
  pub created_by:  Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::OpsStore::create_ticket`].
/// New tickets always start as [`TicketStatus::Open`].
#[derive(Debug, Clone)]
pub struct NewTicket {
  pub org_id:      Uuid,
  pub aircraft:    String,
  pub title:       String,
  pub description: String,
  pub priority:    TicketPriority,
  pub assignee:    Option<Uuid>,
  pub created_by:  Uuid,
}

/// Partial update applied by [`crate::store::OpsStore::update_ticket`].
#[derive(Debug, Clone, Default)]
pub struct TicketUpdate {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub priority:    Option<TicketPriority>,
  pub assignee:    Option<Uuid>,
}
