//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Status enumerations are
//! stored as their snake_case discriminants. UUIDs are stored as hyphenated
//! lowercase strings.

use aerobase_core::{
  dashboard::KpiRecord,
  document::{Document, DocumentStatus},
  flight::FlightLog,
  mission::{Mission, MissionStatus},
  notification::Notification,
  org::{Role, User},
  procedure::{Procedure, ProcedureStatus},
  session::Session,
  shift::Shift,
  ticket::{Ticket, TicketPriority, TicketStatus},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_uuid_opt(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn decode_dt_opt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::Manager => "manager",
    Role::Pilot => "pilot",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "manager" => Ok(Role::Manager),
    "pilot" => Ok(Role::Pilot),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── MissionStatus ───────────────────────────────────────────────────────────

pub fn encode_mission_status(s: MissionStatus) -> &'static str {
  match s {
    MissionStatus::Planned => "planned",
    MissionStatus::Briefed => "briefed",
    MissionStatus::Active => "active",
    MissionStatus::Completed => "completed",
    MissionStatus::Aborted => "aborted",
  }
}

pub fn decode_mission_status(s: &str) -> Result<MissionStatus> {
  match s {
    "planned" => Ok(MissionStatus::Planned),
    "briefed" => Ok(MissionStatus::Briefed),
    "active" => Ok(MissionStatus::Active),
    "completed" => Ok(MissionStatus::Completed),
    "aborted" => Ok(MissionStatus::Aborted),
    other => Err(Error::Decode(format!("unknown mission status: {other:?}"))),
  }
}

// ─── TicketStatus / TicketPriority ───────────────────────────────────────────

pub fn encode_ticket_status(s: TicketStatus) -> &'static str {
  match s {
    TicketStatus::Open => "open",
    TicketStatus::InProgress => "in_progress",
    TicketStatus::Resolved => "resolved",
    TicketStatus::Closed => "closed",
  }
}

pub fn decode_ticket_status(s: &str) -> Result<TicketStatus> {
  match s {
    "open" => Ok(TicketStatus::Open),
    "in_progress" => Ok(TicketStatus::InProgress),
    "resolved" => Ok(TicketStatus::Resolved),
    "closed" => Ok(TicketStatus::Closed),
    other => Err(Error::Decode(format!("unknown ticket status: {other:?}"))),
  }
}

pub fn encode_ticket_priority(p: TicketPriority) -> &'static str {
  match p {
    TicketPriority::Low => "low",
    TicketPriority::Normal => "normal",
    TicketPriority::High => "high",
    TicketPriority::Grounding => "grounding",
  }
}

pub fn decode_ticket_priority(s: &str) -> Result<TicketPriority> {
  match s {
    "low" => Ok(TicketPriority::Low),
    "normal" => Ok(TicketPriority::Normal),
    "high" => Ok(TicketPriority::High),
    "grounding" => Ok(TicketPriority::Grounding),
    other => Err(Error::Decode(format!("unknown ticket priority: {other:?}"))),
  }
}

// ─── DocumentStatus ──────────────────────────────────────────────────────────

pub fn encode_document_status(s: DocumentStatus) -> &'static str {
  match s {
    DocumentStatus::Draft => "draft",
    DocumentStatus::Published => "published",
    DocumentStatus::Archived => "archived",
  }
}

pub fn decode_document_status(s: &str) -> Result<DocumentStatus> {
  match s {
    "draft" => Ok(DocumentStatus::Draft),
    "published" => Ok(DocumentStatus::Published),
    "archived" => Ok(DocumentStatus::Archived),
    other => Err(Error::Decode(format!("unknown document status: {other:?}"))),
  }
}

// ─── ProcedureStatus ─────────────────────────────────────────────────────────

pub fn encode_procedure_status(s: ProcedureStatus) -> &'static str {
  match s {
    ProcedureStatus::Draft => "draft",
    ProcedureStatus::InReview => "in_review",
    ProcedureStatus::Approved => "approved",
    ProcedureStatus::Retired => "retired",
  }
}

pub fn decode_procedure_status(s: &str) -> Result<ProcedureStatus> {
  match s {
    "draft" => Ok(ProcedureStatus::Draft),
    "in_review" => Ok(ProcedureStatus::InReview),
    "approved" => Ok(ProcedureStatus::Approved),
    "retired" => Ok(ProcedureStatus::Retired),
    other => {
      Err(Error::Decode(format!("unknown procedure status: {other:?}")))
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub org_id:        String,
  pub display_name:  String,
  pub email:         String,
  pub role:          String,
  pub reports_to:    Option<String>,
  pub password_hash: String,
  pub active:        bool,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      org_id:        decode_uuid(&self.org_id)?,
      display_name:  self.display_name,
      email:         self.email,
      role:          decode_role(&self.role)?,
      reports_to:    decode_uuid_opt(self.reports_to.as_deref())?,
      password_hash: self.password_hash,
      active:        self.active,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `sessions` row.
pub struct RawSession {
  pub token:      String,
  pub user_id:    String,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      token:      decode_uuid(&self.token)?,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}

/// Raw strings read directly from a `missions` row.
pub struct RawMission {
  pub mission_id:       String,
  pub org_id:           String,
  pub name:             String,
  pub site:             String,
  pub pilot_in_command: String,
  pub aircraft:         String,
  pub status:           String,
  pub scheduled_start:  String,
  pub scheduled_end:    String,
  pub notes:            Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
  pub deleted_at:       Option<String>,
}

impl RawMission {
  pub fn into_mission(self) -> Result<Mission> {
    Ok(Mission {
      mission_id:       decode_uuid(&self.mission_id)?,
      org_id:           decode_uuid(&self.org_id)?,
      name:             self.name,
      site:             self.site,
      pilot_in_command: decode_uuid(&self.pilot_in_command)?,
      aircraft:         self.aircraft,
      status:           decode_mission_status(&self.status)?,
      scheduled_start:  decode_dt(&self.scheduled_start)?,
      scheduled_end:    decode_dt(&self.scheduled_end)?,
      notes:            self.notes,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
      deleted_at:       decode_dt_opt(self.deleted_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from a `flight_logs` row.
pub struct RawFlightLog {
  pub log_id:         String,
  pub org_id:         String,
  pub mission_id:     String,
  pub pilot_id:       String,
  pub aircraft:       String,
  pub takeoff_at:     String,
  pub landing_at:     String,
  pub battery_cycles: Option<u32>,
  pub remarks:        Option<String>,
  pub created_at:     String,
}

impl RawFlightLog {
  pub fn into_flight_log(self) -> Result<FlightLog> {
    Ok(FlightLog {
      log_id:         decode_uuid(&self.log_id)?,
      org_id:         decode_uuid(&self.org_id)?,
      mission_id:     decode_uuid(&self.mission_id)?,
      pilot_id:       decode_uuid(&self.pilot_id)?,
      aircraft:       self.aircraft,
      takeoff_at:     decode_dt(&self.takeoff_at)?,
      landing_at:     decode_dt(&self.landing_at)?,
      battery_cycles: self.battery_cycles,
      remarks:        self.remarks,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `tickets` row.
pub struct RawTicket {
  pub ticket_id:   String,
  pub org_id:      String,
  pub aircraft:    String,
  pub title:       String,
  pub description: String,
  pub status:      String,
  pub priority:    String,
  pub assignee:    Option<String>,
  pub created_by:  String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawTicket {
  pub fn into_ticket(self) -> Result<Ticket> {
    Ok(Ticket {
      ticket_id:   decode_uuid(&self.ticket_id)?,
      org_id:      decode_uuid(&self.org_id)?,
      aircraft:    self.aircraft,
      title:       self.title,
      description: self.description,
      status:      decode_ticket_status(&self.status)?,
      priority:    decode_ticket_priority(&self.priority)?,
      assignee:    decode_uuid_opt(self.assignee.as_deref())?,
      created_by:  decode_uuid(&self.created_by)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `shifts` row.
pub struct RawShift {
  pub shift_id:   String,
  pub org_id:     String,
  pub user_id:    String,
  pub role_label: String,
  pub starts_at:  String,
  pub ends_at:    String,
  pub created_at: String,
}

impl RawShift {
  pub fn into_shift(self) -> Result<Shift> {
    Ok(Shift {
      shift_id:   decode_uuid(&self.shift_id)?,
      org_id:     decode_uuid(&self.org_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      role_label: self.role_label,
      starts_at:  decode_dt(&self.starts_at)?,
      ends_at:    decode_dt(&self.ends_at)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub document_id: String,
  pub org_id:      String,
  pub title:       String,
  pub category:    String,
  pub storage_key: String,
  pub media_type:  String,
  pub size_bytes:  u64,
  pub status:      String,
  pub uploaded_by: String,
  pub created_at:  String,
  pub updated_at:  String,
  pub deleted_at:  Option<String>,
}

impl RawDocument {
  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id: decode_uuid(&self.document_id)?,
      org_id:      decode_uuid(&self.org_id)?,
      title:       self.title,
      category:    self.category,
      storage_key: self.storage_key,
      media_type:  self.media_type,
      size_bytes:  self.size_bytes,
      status:      decode_document_status(&self.status)?,
      uploaded_by: decode_uuid(&self.uploaded_by)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
      deleted_at:  decode_dt_opt(self.deleted_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from a `notifications` row.
pub struct RawNotification {
  pub notification_id: String,
  pub org_id:          String,
  pub user_id:         String,
  pub kind:            String,
  pub body:            String,
  pub created_at:      String,
  pub read_at:         Option<String>,
}

impl RawNotification {
  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      notification_id: decode_uuid(&self.notification_id)?,
      org_id:          decode_uuid(&self.org_id)?,
      user_id:         decode_uuid(&self.user_id)?,
      kind:            self.kind,
      body:            self.body,
      created_at:      decode_dt(&self.created_at)?,
      read_at:         decode_dt_opt(self.read_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from a `procedures` row.
pub struct RawProcedure {
  pub procedure_id: String,
  pub org_id:       String,
  pub code:         String,
  pub title:        String,
  pub revision:     u32,
  pub status:       String,
  pub owner:        Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawProcedure {
  pub fn into_procedure(self) -> Result<Procedure> {
    Ok(Procedure {
      procedure_id: decode_uuid(&self.procedure_id)?,
      org_id:       decode_uuid(&self.org_id)?,
      code:         self.code,
      title:        self.title,
      revision:     self.revision,
      status:       decode_procedure_status(&self.status)?,
      owner:        decode_uuid_opt(self.owner.as_deref())?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `kpis` row.
pub struct RawKpi {
  pub kpi_id:      String,
  pub org_id:      String,
  pub name:        String,
  pub period:      String,
  pub value:       f64,
  pub target:      Option<f64>,
  pub recorded_at: String,
}

impl RawKpi {
  pub fn into_kpi(self) -> Result<KpiRecord> {
    Ok(KpiRecord {
      kpi_id:      decode_uuid(&self.kpi_id)?,
      org_id:      decode_uuid(&self.org_id)?,
      name:        self.name,
      period:      self.period,
      value:       self.value,
      target:      self.target,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
