//! The `OpsStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `aerobase-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.
//!
//! Every operation that touches an org-scoped record takes the caller's
//! `org_id` and treats a record under any other org as not found.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  dashboard::{DashboardSummary, KpiRecord, NewKpi},
  document::{Document, DocumentStatus, NewDocument},
  flight::{FlightLog, NewFlightLog},
  mission::{Mission, MissionStatus, MissionUpdate, NewMission},
  notification::{NewNotification, Notification},
  org::{NewUser, Org, User},
  procedure::{NewProcedure, Procedure, ProcedureStatus, ProcedureUpdate},
  session::Session,
  shift::{NewShift, Shift, ShiftUpdate},
  ticket::{NewTicket, Ticket, TicketPriority, TicketStatus, TicketUpdate},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Filters for [`OpsStore::list_missions`].
#[derive(Debug, Clone, Default)]
pub struct MissionQuery {
  pub status:           Option<MissionStatus>,
  pub pilot_in_command: Option<Uuid>,
  /// Only missions scheduled to start at or after this instant.
  pub from:             Option<DateTime<Utc>>,
  /// Only missions scheduled to start at or before this instant.
  pub to:               Option<DateTime<Utc>>,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

/// Filters for [`OpsStore::list_flight_logs`].
#[derive(Debug, Clone, Default)]
pub struct FlightQuery {
  pub mission_id: Option<Uuid>,
  pub pilot_id:   Option<Uuid>,
  pub limit:      Option<usize>,
  pub offset:     Option<usize>,
}

/// Filters for [`OpsStore::list_tickets`].
#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
  pub status:   Option<TicketStatus>,
  pub priority: Option<TicketPriority>,
  pub assignee: Option<Uuid>,
  pub aircraft: Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// Filters for [`OpsStore::list_shifts`].
#[derive(Debug, Clone, Default)]
pub struct ShiftQuery {
  pub user_id: Option<Uuid>,
  /// Only shifts ending at or after this instant.
  pub from:    Option<DateTime<Utc>>,
  /// Only shifts starting at or before this instant.
  pub to:      Option<DateTime<Utc>>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

/// Filters for [`OpsStore::list_documents`].
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
  pub category: Option<String>,
  pub status:   Option<DocumentStatus>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// Filters for [`OpsStore::list_procedures`].
#[derive(Debug, Clone, Default)]
pub struct ProcedureQuery {
  pub status: Option<ProcedureStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Implemented by backend error types so callers can map "no such row"
/// errors (including cross-org and soft-deleted lookups) to 404 without
/// knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_not_found(&self) -> bool;
}

/// Abstraction over an Aerobase operations store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
///
/// Plain gets return `Option` for missing rows; mutations return a typed
/// not-found error instead, so handlers can map them to 404 without a
/// separate existence check.
pub trait OpsStore: Send + Sync {
  type Error: StoreError;

  // ── Orgs and users ────────────────────────────────────────────────────

  /// Create and persist a new org with the given name.
  fn create_org(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Org, Self::Error>> + Send + '_;

  /// Create a user. Fails if the email is already registered (emails are
  /// unique platform-wide, since login happens before an org is known).
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    org_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Unscoped lookup by email — the entry point for login.
  fn get_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// All users in the org, active and inactive.
  fn list_users(
    &self,
    org_id: Uuid,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Issue a session for `user_id` expiring at `expires_at`. The token is
  /// generated by the store.
  fn create_session(
    &self,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Resolve a bearer token to its session and user. Returns `None` for
  /// unknown tokens, expired sessions, and deactivated users.
  fn get_session(
    &self,
    token: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<(Session, User)>, Self::Error>> + Send + '_;

  /// Delete a session (logout). Deleting an unknown token is a no-op.
  fn delete_session(
    &self,
    token: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Missions ──────────────────────────────────────────────────────────

  fn create_mission(
    &self,
    input: NewMission,
  ) -> impl Future<Output = Result<Mission, Self::Error>> + Send + '_;

  fn get_mission(
    &self,
    org_id: Uuid,
    mission_id: Uuid,
  ) -> impl Future<Output = Result<Option<Mission>, Self::Error>> + Send + '_;

  fn list_missions(
    &self,
    org_id: Uuid,
    query: MissionQuery,
  ) -> impl Future<Output = Result<Vec<Mission>, Self::Error>> + Send + '_;

  fn update_mission(
    &self,
    org_id: Uuid,
    mission_id: Uuid,
    update: MissionUpdate,
  ) -> impl Future<Output = Result<Mission, Self::Error>> + Send + '_;

  /// Direct status transition — no transition validation by design; the
  /// status is a stored field, not a state machine.
  fn set_mission_status(
    &self,
    org_id: Uuid,
    mission_id: Uuid,
    status: MissionStatus,
  ) -> impl Future<Output = Result<Mission, Self::Error>> + Send + '_;

  /// Soft delete: sets `deleted_at`; the row drops out of all reads.
  fn delete_mission(
    &self,
    org_id: Uuid,
    mission_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Flight logbook ────────────────────────────────────────────────────

  /// Append a logbook entry. Fails if the mission does not exist in the
  /// org.
  fn add_flight_log(
    &self,
    input: NewFlightLog,
  ) -> impl Future<Output = Result<FlightLog, Self::Error>> + Send + '_;

  fn list_flight_logs(
    &self,
    org_id: Uuid,
    query: FlightQuery,
  ) -> impl Future<Output = Result<Vec<FlightLog>, Self::Error>> + Send + '_;

  // ── Maintenance tickets ───────────────────────────────────────────────

  fn create_ticket(
    &self,
    input: NewTicket,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  fn get_ticket(
    &self,
    org_id: Uuid,
    ticket_id: Uuid,
  ) -> impl Future<Output = Result<Option<Ticket>, Self::Error>> + Send + '_;

  fn list_tickets(
    &self,
    org_id: Uuid,
    query: TicketQuery,
  ) -> impl Future<Output = Result<Vec<Ticket>, Self::Error>> + Send + '_;

  fn update_ticket(
    &self,
    org_id: Uuid,
    ticket_id: Uuid,
    update: TicketUpdate,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  fn set_ticket_status(
    &self,
    org_id: Uuid,
    ticket_id: Uuid,
    status: TicketStatus,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  // ── Shifts ────────────────────────────────────────────────────────────

  fn create_shift(
    &self,
    input: NewShift,
  ) -> impl Future<Output = Result<Shift, Self::Error>> + Send + '_;

  fn get_shift(
    &self,
    org_id: Uuid,
    shift_id: Uuid,
  ) -> impl Future<Output = Result<Option<Shift>, Self::Error>> + Send + '_;

  fn list_shifts(
    &self,
    org_id: Uuid,
    query: ShiftQuery,
  ) -> impl Future<Output = Result<Vec<Shift>, Self::Error>> + Send + '_;

  fn update_shift(
    &self,
    org_id: Uuid,
    shift_id: Uuid,
    update: ShiftUpdate,
  ) -> impl Future<Output = Result<Shift, Self::Error>> + Send + '_;

  /// Hard delete — shifts carry no history requirement.
  fn delete_shift(
    &self,
    org_id: Uuid,
    shift_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Documents ─────────────────────────────────────────────────────────

  fn create_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  fn get_document(
    &self,
    org_id: Uuid,
    document_id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  fn list_documents(
    &self,
    org_id: Uuid,
    query: DocumentQuery,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  fn set_document_status(
    &self,
    org_id: Uuid,
    document_id: Uuid,
    status: DocumentStatus,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// Soft delete: sets `deleted_at`; the metadata drops out of all reads.
  /// The object-storage blob is untouched.
  fn delete_document(
    &self,
    org_id: Uuid,
    document_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  fn create_notification(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Notifications for one user, newest first.
  fn list_notifications(
    &self,
    org_id: Uuid,
    user_id: Uuid,
    unread_only: bool,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  /// Mark one notification read. Idempotent: re-reading keeps the original
  /// `read_at`.
  fn mark_notification_read(
    &self,
    org_id: Uuid,
    user_id: Uuid,
    notification_id: Uuid,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Mark everything read for one user; returns how many rows changed.
  fn mark_all_notifications_read(
    &self,
    org_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── LUC procedures ────────────────────────────────────────────────────

  fn create_procedure(
    &self,
    input: NewProcedure,
  ) -> impl Future<Output = Result<Procedure, Self::Error>> + Send + '_;

  fn get_procedure(
    &self,
    org_id: Uuid,
    procedure_id: Uuid,
  ) -> impl Future<Output = Result<Option<Procedure>, Self::Error>> + Send + '_;

  fn list_procedures(
    &self,
    org_id: Uuid,
    query: ProcedureQuery,
  ) -> impl Future<Output = Result<Vec<Procedure>, Self::Error>> + Send + '_;

  fn update_procedure(
    &self,
    org_id: Uuid,
    procedure_id: Uuid,
    update: ProcedureUpdate,
  ) -> impl Future<Output = Result<Procedure, Self::Error>> + Send + '_;

  fn set_procedure_status(
    &self,
    org_id: Uuid,
    procedure_id: Uuid,
    status: ProcedureStatus,
  ) -> impl Future<Output = Result<Procedure, Self::Error>> + Send + '_;

  // ── KPIs and dashboard ────────────────────────────────────────────────

  /// Insert or overwrite the record for `(org_id, name, period)`.
  fn upsert_kpi(
    &self,
    input: NewKpi,
  ) -> impl Future<Output = Result<KpiRecord, Self::Error>> + Send + '_;

  /// KPI records, optionally restricted to one period.
  fn list_kpis(
    &self,
    org_id: Uuid,
    period: Option<String>,
  ) -> impl Future<Output = Result<Vec<KpiRecord>, Self::Error>> + Send + '_;

  /// Materialise the dashboard read model for one org, as seen by one
  /// user (the unread-notification count is per-user). Aggregation is
  /// pushed down to the database.
  fn dashboard_summary(
    &self,
    org_id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
    period: String,
  ) -> impl Future<Output = Result<DashboardSummary, Self::Error>> + Send + '_;
}
