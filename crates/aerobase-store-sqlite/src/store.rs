//! [`SqliteStore`] — the SQLite implementation of [`OpsStore`].
//!
//! List queries use the `(?N IS NULL OR col = ?N)` pattern so each query is a
//! single static SQL string regardless of which filters are set. Partial
//! updates are read-modify-write: fetch the row, apply the `Some` fields,
//! write every mutable column back and bump `updated_at`.

use std::path::Path;

use chrono::{DateTime, Days, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use aerobase_core::{
  dashboard::{DashboardSummary, KpiRecord, MissionStatusCounts, NewKpi},
  document::{Document, DocumentStatus, NewDocument},
  flight::{FlightLog, NewFlightLog},
  mission::{Mission, MissionStatus, MissionUpdate, NewMission},
  notification::{NewNotification, Notification},
  org::{NewUser, Org, User},
  procedure::{NewProcedure, Procedure, ProcedureStatus, ProcedureUpdate},
  session::Session,
  shift::{NewShift, Shift, ShiftUpdate},
  store::{
    DocumentQuery, FlightQuery, MissionQuery, OpsStore, ProcedureQuery,
    ShiftQuery, TicketQuery,
  },
  ticket::{NewTicket, Ticket, TicketStatus, TicketUpdate},
};

use crate::{
  encode::{
    RawDocument, RawFlightLog, RawKpi, RawMission, RawNotification,
    RawProcedure, RawSession, RawShift, RawTicket, RawUser,
    encode_document_status, encode_dt, encode_mission_status,
    encode_procedure_status, encode_role, encode_ticket_priority,
    encode_ticket_status, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

const DEFAULT_LIMIT: usize = 100;

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn map_user(row: &rusqlite::Row) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    org_id:        row.get(1)?,
    display_name:  row.get(2)?,
    email:         row.get(3)?,
    role:          row.get(4)?,
    reports_to:    row.get(5)?,
    password_hash: row.get(6)?,
    active:        row.get(7)?,
    created_at:    row.get(8)?,
  })
}

const USER_COLS: &str =
  "user_id, org_id, display_name, email, role, reports_to, password_hash, \
   active, created_at";

fn map_mission(row: &rusqlite::Row) -> rusqlite::Result<RawMission> {
  Ok(RawMission {
    mission_id:       row.get(0)?,
    org_id:           row.get(1)?,
    name:             row.get(2)?,
    site:             row.get(3)?,
    pilot_in_command: row.get(4)?,
    aircraft:         row.get(5)?,
    status:           row.get(6)?,
    scheduled_start:  row.get(7)?,
    scheduled_end:    row.get(8)?,
    notes:            row.get(9)?,
    created_at:       row.get(10)?,
    updated_at:       row.get(11)?,
    deleted_at:       row.get(12)?,
  })
}

const MISSION_COLS: &str =
  "mission_id, org_id, name, site, pilot_in_command, aircraft, status, \
   scheduled_start, scheduled_end, notes, created_at, updated_at, deleted_at";

fn map_flight_log(row: &rusqlite::Row) -> rusqlite::Result<RawFlightLog> {
  Ok(RawFlightLog {
    log_id:         row.get(0)?,
    org_id:         row.get(1)?,
    mission_id:     row.get(2)?,
    pilot_id:       row.get(3)?,
    aircraft:       row.get(4)?,
    takeoff_at:     row.get(5)?,
    landing_at:     row.get(6)?,
    battery_cycles: row.get(7)?,
    remarks:        row.get(8)?,
    created_at:     row.get(9)?,
  })
}

const FLIGHT_LOG_COLS: &str =
  "log_id, org_id, mission_id, pilot_id, aircraft, takeoff_at, landing_at, \
   battery_cycles, remarks, created_at";

fn map_ticket(row: &rusqlite::Row) -> rusqlite::Result<RawTicket> {
  Ok(RawTicket {
    ticket_id:   row.get(0)?,
    org_id:      row.get(1)?,
    aircraft:    row.get(2)?,
    title:       row.get(3)?,
    description: row.get(4)?,
    status:      row.get(5)?,
    priority:    row.get(6)?,
    assignee:    row.get(7)?,
    created_by:  row.get(8)?,
    created_at:  row.get(9)?,
    updated_at:  row.get(10)?,
  })
}

const TICKET_COLS: &str =
  "ticket_id, org_id, aircraft, title, description, status, priority, \
   assignee, created_by, created_at, updated_at";

fn map_shift(row: &rusqlite::Row) -> rusqlite::Result<RawShift> {
  Ok(RawShift {
    shift_id:   row.get(0)?,
    org_id:     row.get(1)?,
    user_id:    row.get(2)?,
    role_label: row.get(3)?,
    starts_at:  row.get(4)?,
    ends_at:    row.get(5)?,
    created_at: row.get(6)?,
  })
}

const SHIFT_COLS: &str =
  "shift_id, org_id, user_id, role_label, starts_at, ends_at, created_at";

fn map_document(row: &rusqlite::Row) -> rusqlite::Result<RawDocument> {
  Ok(RawDocument {
    document_id: row.get(0)?,
    org_id:      row.get(1)?,
    title:       row.get(2)?,
    category:    row.get(3)?,
    storage_key: row.get(4)?,
    media_type:  row.get(5)?,
    size_bytes:  row.get(6)?,
    status:      row.get(7)?,
    uploaded_by: row.get(8)?,
    created_at:  row.get(9)?,
    updated_at:  row.get(10)?,
    deleted_at:  row.get(11)?,
  })
}

const DOCUMENT_COLS: &str =
  "document_id, org_id, title, category, storage_key, media_type, \
   size_bytes, status, uploaded_by, created_at, updated_at, deleted_at";

fn map_notification(row: &rusqlite::Row) -> rusqlite::Result<RawNotification> {
  Ok(RawNotification {
    notification_id: row.get(0)?,
    org_id:          row.get(1)?,
    user_id:         row.get(2)?,
    kind:            row.get(3)?,
    body:            row.get(4)?,
    created_at:      row.get(5)?,
    read_at:         row.get(6)?,
  })
}

const NOTIFICATION_COLS: &str =
  "notification_id, org_id, user_id, kind, body, created_at, read_at";

fn map_procedure(row: &rusqlite::Row) -> rusqlite::Result<RawProcedure> {
  Ok(RawProcedure {
    procedure_id: row.get(0)?,
    org_id:       row.get(1)?,
    code:         row.get(2)?,
    title:        row.get(3)?,
    revision:     row.get(4)?,
    status:       row.get(5)?,
    owner:        row.get(6)?,
    created_at:   row.get(7)?,
    updated_at:   row.get(8)?,
  })
}

const PROCEDURE_COLS: &str =
  "procedure_id, org_id, code, title, revision, status, owner, created_at, \
   updated_at";

fn map_kpi(row: &rusqlite::Row) -> rusqlite::Result<RawKpi> {
  Ok(RawKpi {
    kpi_id:      row.get(0)?,
    org_id:      row.get(1)?,
    name:        row.get(2)?,
    period:      row.get(3)?,
    value:       row.get(4)?,
    target:      row.get(5)?,
    recorded_at: row.get(6)?,
  })
}

const KPI_COLS: &str =
  "kpi_id, org_id, name, period, value, target, recorded_at";

fn limit_offset(limit: Option<usize>, offset: Option<usize>) -> (i64, i64) {
  (limit.unwrap_or(DEFAULT_LIMIT) as i64, offset.unwrap_or(0) as i64)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Aerobase operations store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether the mission exists in the org and is not soft-deleted.
  async fn mission_exists(&self, org_id: Uuid, mission_id: Uuid) -> Result<bool> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(mission_id);
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM missions
               WHERE mission_id = ?1 AND org_id = ?2 AND deleted_at IS NULL",
              rusqlite::params![id_str, org_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── OpsStore impl ───────────────────────────────────────────────────────────

impl OpsStore for SqliteStore {
  type Error = Error;

  // ── Orgs and users ──────────────────────────────────────────────────────

  async fn create_org(&self, name: String) -> Result<Org> {
    let org = Org {
      org_id: Uuid::new_v4(),
      name,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(org.org_id);
    let at_str = encode_dt(org.created_at);
    let name_cl = org.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO orgs (org_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_cl, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(org)
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    if self.get_user_by_email(input.email.clone()).await?.is_some() {
      return Err(Error::DuplicateEmail(input.email));
    }

    let user = User {
      user_id:       Uuid::new_v4(),
      org_id:        input.org_id,
      display_name:  input.display_name,
      email:         input.email,
      role:          input.role,
      reports_to:    input.reports_to,
      password_hash: input.password_hash,
      active:        true,
      created_at:    Utc::now(),
    };

    let id_str = encode_uuid(user.user_id);
    let org_str = encode_uuid(user.org_id);
    let name_cl = user.display_name.clone();
    let email_cl = user.email.clone();
    let role_str = encode_role(user.role).to_owned();
    let reports_str = user.reports_to.map(encode_uuid);
    let hash_cl = user.password_hash.clone();
    let at_str = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, org_id, display_name, email, role, reports_to,
             password_hash, active, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
          rusqlite::params![
            id_str,
            org_str,
            name_cl,
            email_cl,
            role_str,
            reports_str,
            hash_cl,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, org_id: Uuid, user_id: Uuid) -> Result<Option<User>> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLS} FROM users
                 WHERE user_id = ?1 AND org_id = ?2"
              ),
              rusqlite::params![id_str, org_str],
              map_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_email(&self, email: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              map_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self, org_id: Uuid) -> Result<Vec<User>> {
    let org_str = encode_uuid(org_id);

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLS} FROM users
           WHERE org_id = ?1
           ORDER BY display_name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![org_str], map_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Sessions ────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
  ) -> Result<Session> {
    let session = Session {
      token: Uuid::new_v4(),
      user_id,
      created_at: Utc::now(),
      expires_at,
    };

    let token_str = encode_uuid(session.token);
    let user_str = encode_uuid(session.user_id);
    let created_str = encode_dt(session.created_at);
    let expires_str = encode_dt(session.expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_str, user_str, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn get_session(
    &self,
    token: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Option<(Session, User)>> {
    let token_str = encode_uuid(token);
    let now_str = encode_dt(now);

    let raw: Option<(RawSession, RawUser)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT
                 s.token, s.user_id, s.created_at, s.expires_at,
                 u.user_id, u.org_id, u.display_name, u.email, u.role,
                 u.reports_to, u.password_hash, u.active, u.created_at
               FROM sessions s
               JOIN users u ON u.user_id = s.user_id
               WHERE s.token = ?1 AND s.expires_at > ?2 AND u.active = 1",
              rusqlite::params![token_str, now_str],
              |row| {
                let session = RawSession {
                  token:      row.get(0)?,
                  user_id:    row.get(1)?,
                  created_at: row.get(2)?,
                  expires_at: row.get(3)?,
                };
                let user = RawUser {
                  user_id:       row.get(4)?,
                  org_id:        row.get(5)?,
                  display_name:  row.get(6)?,
                  email:         row.get(7)?,
                  role:          row.get(8)?,
                  reports_to:    row.get(9)?,
                  password_hash: row.get(10)?,
                  active:        row.get(11)?,
                  created_at:    row.get(12)?,
                };
                Ok((session, user))
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(s, u)| Ok((s.into_session()?, u.into_user()?)))
      .transpose()
  }

  async fn delete_session(&self, token: Uuid) -> Result<()> {
    let token_str = encode_uuid(token);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token = ?1",
          rusqlite::params![token_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Missions ────────────────────────────────────────────────────────────

  async fn create_mission(&self, input: NewMission) -> Result<Mission> {
    let now = Utc::now();
    let mission = Mission {
      mission_id:       Uuid::new_v4(),
      org_id:           input.org_id,
      name:             input.name,
      site:             input.site,
      pilot_in_command: input.pilot_in_command,
      aircraft:         input.aircraft,
      status:           MissionStatus::Planned,
      scheduled_start:  input.scheduled_start,
      scheduled_end:    input.scheduled_end,
      notes:            input.notes,
      created_at:       now,
      updated_at:       now,
      deleted_at:       None,
    };

    let id_str = encode_uuid(mission.mission_id);
    let org_str = encode_uuid(mission.org_id);
    let name_cl = mission.name.clone();
    let site_cl = mission.site.clone();
    let pic_str = encode_uuid(mission.pilot_in_command);
    let aircraft_cl = mission.aircraft.clone();
    let status_str = encode_mission_status(mission.status).to_owned();
    let start_str = encode_dt(mission.scheduled_start);
    let end_str = encode_dt(mission.scheduled_end);
    let notes_cl = mission.notes.clone();
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO missions (
             mission_id, org_id, name, site, pilot_in_command, aircraft,
             status, scheduled_start, scheduled_end, notes, created_at,
             updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            id_str,
            org_str,
            name_cl,
            site_cl,
            pic_str,
            aircraft_cl,
            status_str,
            start_str,
            end_str,
            notes_cl,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(mission)
  }

  async fn get_mission(
    &self,
    org_id: Uuid,
    mission_id: Uuid,
  ) -> Result<Option<Mission>> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(mission_id);

    let raw: Option<RawMission> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {MISSION_COLS} FROM missions
                 WHERE mission_id = ?1 AND org_id = ?2 AND deleted_at IS NULL"
              ),
              rusqlite::params![id_str, org_str],
              map_mission,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMission::into_mission).transpose()
  }

  async fn list_missions(
    &self,
    org_id: Uuid,
    query: MissionQuery,
  ) -> Result<Vec<Mission>> {
    let org_str = encode_uuid(org_id);
    let status_str = query.status.map(encode_mission_status).map(str::to_owned);
    let pic_str = query.pilot_in_command.map(encode_uuid);
    let from_str = query.from.map(encode_dt);
    let to_str = query.to.map(encode_dt);
    let (limit, offset) = limit_offset(query.limit, query.offset);

    let raws: Vec<RawMission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MISSION_COLS} FROM missions
           WHERE org_id = ?1 AND deleted_at IS NULL
             AND (?2 IS NULL OR status = ?2)
             AND (?3 IS NULL OR pilot_in_command = ?3)
             AND (?4 IS NULL OR scheduled_start >= ?4)
             AND (?5 IS NULL OR scheduled_start <= ?5)
           ORDER BY scheduled_start
           LIMIT ?6 OFFSET ?7"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              org_str, status_str, pic_str, from_str, to_str, limit, offset
            ],
            map_mission,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMission::into_mission).collect()
  }

  async fn update_mission(
    &self,
    org_id: Uuid,
    mission_id: Uuid,
    update: MissionUpdate,
  ) -> Result<Mission> {
    let mut mission = self
      .get_mission(org_id, mission_id)
      .await?
      .ok_or(Error::MissionNotFound(mission_id))?;

    if let Some(name) = update.name {
      mission.name = name;
    }
    if let Some(site) = update.site {
      mission.site = site;
    }
    if let Some(pic) = update.pilot_in_command {
      mission.pilot_in_command = pic;
    }
    if let Some(aircraft) = update.aircraft {
      mission.aircraft = aircraft;
    }
    if let Some(start) = update.scheduled_start {
      mission.scheduled_start = start;
    }
    if let Some(end) = update.scheduled_end {
      mission.scheduled_end = end;
    }
    if let Some(notes) = update.notes {
      mission.notes = Some(notes);
    }
    mission.updated_at = Utc::now();

    let id_str = encode_uuid(mission_id);
    let org_str = encode_uuid(org_id);
    let name_cl = mission.name.clone();
    let site_cl = mission.site.clone();
    let pic_str = encode_uuid(mission.pilot_in_command);
    let aircraft_cl = mission.aircraft.clone();
    let start_str = encode_dt(mission.scheduled_start);
    let end_str = encode_dt(mission.scheduled_end);
    let notes_cl = mission.notes.clone();
    let updated_str = encode_dt(mission.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE missions SET
             name = ?3, site = ?4, pilot_in_command = ?5, aircraft = ?6,
             scheduled_start = ?7, scheduled_end = ?8, notes = ?9,
             updated_at = ?10
           WHERE mission_id = ?1 AND org_id = ?2",
          rusqlite::params![
            id_str, org_str, name_cl, site_cl, pic_str, aircraft_cl,
            start_str, end_str, notes_cl, updated_str
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(mission)
  }

  async fn set_mission_status(
    &self,
    org_id: Uuid,
    mission_id: Uuid,
    status: MissionStatus,
  ) -> Result<Mission> {
    let mut mission = self
      .get_mission(org_id, mission_id)
      .await?
      .ok_or(Error::MissionNotFound(mission_id))?;

    mission.status = status;
    mission.updated_at = Utc::now();

    let id_str = encode_uuid(mission_id);
    let org_str = encode_uuid(org_id);
    let status_str = encode_mission_status(status).to_owned();
    let updated_str = encode_dt(mission.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE missions SET status = ?3, updated_at = ?4
           WHERE mission_id = ?1 AND org_id = ?2",
          rusqlite::params![id_str, org_str, status_str, updated_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(mission)
  }

  async fn delete_mission(&self, org_id: Uuid, mission_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(mission_id);
    let org_str = encode_uuid(org_id);
    let now_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE missions SET deleted_at = ?3
           WHERE mission_id = ?1 AND org_id = ?2 AND deleted_at IS NULL",
          rusqlite::params![id_str, org_str, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::MissionNotFound(mission_id));
    }
    Ok(())
  }

  // ── Flight logbook ──────────────────────────────────────────────────────

  async fn add_flight_log(&self, input: NewFlightLog) -> Result<FlightLog> {
    if !self.mission_exists(input.org_id, input.mission_id).await? {
      return Err(Error::MissionNotFound(input.mission_id));
    }

    let log = FlightLog {
      log_id:         Uuid::new_v4(),
      org_id:         input.org_id,
      mission_id:     input.mission_id,
      pilot_id:       input.pilot_id,
      aircraft:       input.aircraft,
      takeoff_at:     input.takeoff_at,
      landing_at:     input.landing_at,
      battery_cycles: input.battery_cycles,
      remarks:        input.remarks,
      created_at:     Utc::now(),
    };

    let id_str = encode_uuid(log.log_id);
    let org_str = encode_uuid(log.org_id);
    let mission_str = encode_uuid(log.mission_id);
    let pilot_str = encode_uuid(log.pilot_id);
    let aircraft_cl = log.aircraft.clone();
    let takeoff_str = encode_dt(log.takeoff_at);
    let landing_str = encode_dt(log.landing_at);
    let cycles = log.battery_cycles;
    let remarks_cl = log.remarks.clone();
    let at_str = encode_dt(log.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO flight_logs (
             log_id, org_id, mission_id, pilot_id, aircraft, takeoff_at,
             landing_at, battery_cycles, remarks, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            org_str,
            mission_str,
            pilot_str,
            aircraft_cl,
            takeoff_str,
            landing_str,
            cycles,
            remarks_cl,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(log)
  }

  async fn list_flight_logs(
    &self,
    org_id: Uuid,
    query: FlightQuery,
  ) -> Result<Vec<FlightLog>> {
    let org_str = encode_uuid(org_id);
    let mission_str = query.mission_id.map(encode_uuid);
    let pilot_str = query.pilot_id.map(encode_uuid);
    let (limit, offset) = limit_offset(query.limit, query.offset);

    let raws: Vec<RawFlightLog> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FLIGHT_LOG_COLS} FROM flight_logs
           WHERE org_id = ?1
             AND (?2 IS NULL OR mission_id = ?2)
             AND (?3 IS NULL OR pilot_id = ?3)
           ORDER BY takeoff_at DESC
           LIMIT ?4 OFFSET ?5"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![org_str, mission_str, pilot_str, limit, offset],
            map_flight_log,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFlightLog::into_flight_log).collect()
  }

  // ── Maintenance tickets ─────────────────────────────────────────────────

  async fn create_ticket(&self, input: NewTicket) -> Result<Ticket> {
    let now = Utc::now();
    let ticket = Ticket {
      ticket_id:   Uuid::new_v4(),
      org_id:      input.org_id,
      aircraft:    input.aircraft,
      title:       input.title,
      description: input.description,
      status:      TicketStatus::Open,
      priority:    input.priority,
      assignee:    input.assignee,
      created_by:  input.created_by,
      created_at:  now,
      updated_at:  now,
    };

    let id_str = encode_uuid(ticket.ticket_id);
    let org_str = encode_uuid(ticket.org_id);
    let aircraft_cl = ticket.aircraft.clone();
    let title_cl = ticket.title.clone();
    let desc_cl = ticket.description.clone();
    let status_str = encode_ticket_status(ticket.status).to_owned();
    let priority_str = encode_ticket_priority(ticket.priority).to_owned();
    let assignee_str = ticket.assignee.map(encode_uuid);
    let creator_str = encode_uuid(ticket.created_by);
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tickets (
             ticket_id, org_id, aircraft, title, description, status,
             priority, assignee, created_by, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
          rusqlite::params![
            id_str,
            org_str,
            aircraft_cl,
            title_cl,
            desc_cl,
            status_str,
            priority_str,
            assignee_str,
            creator_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(ticket)
  }

  async fn get_ticket(
    &self,
    org_id: Uuid,
    ticket_id: Uuid,
  ) -> Result<Option<Ticket>> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(ticket_id);

    let raw: Option<RawTicket> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {TICKET_COLS} FROM tickets
                 WHERE ticket_id = ?1 AND org_id = ?2"
              ),
              rusqlite::params![id_str, org_str],
              map_ticket,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTicket::into_ticket).transpose()
  }

  async fn list_tickets(
    &self,
    org_id: Uuid,
    query: TicketQuery,
  ) -> Result<Vec<Ticket>> {
    let org_str = encode_uuid(org_id);
    let status_str = query.status.map(encode_ticket_status).map(str::to_owned);
    let priority_str =
      query.priority.map(encode_ticket_priority).map(str::to_owned);
    let assignee_str = query.assignee.map(encode_uuid);
    let aircraft_cl = query.aircraft;
    let (limit, offset) = limit_offset(query.limit, query.offset);

    let raws: Vec<RawTicket> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TICKET_COLS} FROM tickets
           WHERE org_id = ?1
             AND (?2 IS NULL OR status = ?2)
             AND (?3 IS NULL OR priority = ?3)
             AND (?4 IS NULL OR assignee = ?4)
             AND (?5 IS NULL OR aircraft = ?5)
           ORDER BY created_at DESC
           LIMIT ?6 OFFSET ?7"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              org_str,
              status_str,
              priority_str,
              assignee_str,
              aircraft_cl,
              limit,
              offset
            ],
            map_ticket,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTicket::into_ticket).collect()
  }

  async fn update_ticket(
    &self,
    org_id: Uuid,
    ticket_id: Uuid,
    update: TicketUpdate,
  ) -> Result<Ticket> {
    let mut ticket = self
      .get_ticket(org_id, ticket_id)
      .await?
      .ok_or(Error::TicketNotFound(ticket_id))?;

    if let Some(title) = update.title {
      ticket.title = title;
    }
    if let Some(description) = update.description {
      ticket.description = description;
    }
    if let Some(priority) = update.priority {
      ticket.priority = priority;
    }
    if let Some(assignee) = update.assignee {
      ticket.assignee = Some(assignee);
    }
    ticket.updated_at = Utc::now();

    let id_str = encode_uuid(ticket_id);
    let org_str = encode_uuid(org_id);
    let title_cl = ticket.title.clone();
    let desc_cl = ticket.description.clone();
    let priority_str = encode_ticket_priority(ticket.priority).to_owned();
    let assignee_str = ticket.assignee.map(encode_uuid);
    let updated_str = encode_dt(ticket.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE tickets SET
             title = ?3, description = ?4, priority = ?5, assignee = ?6,
             updated_at = ?7
           WHERE ticket_id = ?1 AND org_id = ?2",
          rusqlite::params![
            id_str, org_str, title_cl, desc_cl, priority_str, assignee_str,
            updated_str
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(ticket)
  }

  async fn set_ticket_status(
    &self,
    org_id: Uuid,
    ticket_id: Uuid,
    status: TicketStatus,
  ) -> Result<Ticket> {
    let mut ticket = self
      .get_ticket(org_id, ticket_id)
      .await?
      .ok_or(Error::TicketNotFound(ticket_id))?;

    ticket.status = status;
    ticket.updated_at = Utc::now();

    let id_str = encode_uuid(ticket_id);
    let org_str = encode_uuid(org_id);
    let status_str = encode_ticket_status(status).to_owned();
    let updated_str = encode_dt(ticket.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE tickets SET status = ?3, updated_at = ?4
           WHERE ticket_id = ?1 AND org_id = ?2",
          rusqlite::params![id_str, org_str, status_str, updated_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(ticket)
  }

  // ── Shifts ──────────────────────────────────────────────────────────────

  async fn create_shift(&self, input: NewShift) -> Result<Shift> {
    let shift = Shift {
      shift_id:   Uuid::new_v4(),
      org_id:     input.org_id,
      user_id:    input.user_id,
      role_label: input.role_label,
      starts_at:  input.starts_at,
      ends_at:    input.ends_at,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(shift.shift_id);
    let org_str = encode_uuid(shift.org_id);
    let user_str = encode_uuid(shift.user_id);
    let label_cl = shift.role_label.clone();
    let starts_str = encode_dt(shift.starts_at);
    let ends_str = encode_dt(shift.ends_at);
    let at_str = encode_dt(shift.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO shifts (
             shift_id, org_id, user_id, role_label, starts_at, ends_at,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, org_str, user_str, label_cl, starts_str, ends_str, at_str
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(shift)
  }

  async fn get_shift(
    &self,
    org_id: Uuid,
    shift_id: Uuid,
  ) -> Result<Option<Shift>> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(shift_id);

    let raw: Option<RawShift> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SHIFT_COLS} FROM shifts
                 WHERE shift_id = ?1 AND org_id = ?2"
              ),
              rusqlite::params![id_str, org_str],
              map_shift,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawShift::into_shift).transpose()
  }

  async fn list_shifts(
    &self,
    org_id: Uuid,
    query: ShiftQuery,
  ) -> Result<Vec<Shift>> {
    let org_str = encode_uuid(org_id);
    let user_str = query.user_id.map(encode_uuid);
    let from_str = query.from.map(encode_dt);
    let to_str = query.to.map(encode_dt);
    let (limit, offset) = limit_offset(query.limit, query.offset);

    let raws: Vec<RawShift> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SHIFT_COLS} FROM shifts
           WHERE org_id = ?1
             AND (?2 IS NULL OR user_id = ?2)
             AND (?3 IS NULL OR ends_at >= ?3)
             AND (?4 IS NULL OR starts_at <= ?4)
           ORDER BY starts_at
           LIMIT ?5 OFFSET ?6"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![org_str, user_str, from_str, to_str, limit, offset],
            map_shift,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShift::into_shift).collect()
  }

  async fn update_shift(
    &self,
    org_id: Uuid,
    shift_id: Uuid,
    update: ShiftUpdate,
  ) -> Result<Shift> {
    let mut shift = self
      .get_shift(org_id, shift_id)
      .await?
      .ok_or(Error::ShiftNotFound(shift_id))?;

    if let Some(label) = update.role_label {
      shift.role_label = label;
    }
    if let Some(starts) = update.starts_at {
      shift.starts_at = starts;
    }
    if let Some(ends) = update.ends_at {
      shift.ends_at = ends;
    }

    let id_str = encode_uuid(shift_id);
    let org_str = encode_uuid(org_id);
    let label_cl = shift.role_label.clone();
    let starts_str = encode_dt(shift.starts_at);
    let ends_str = encode_dt(shift.ends_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE shifts SET role_label = ?3, starts_at = ?4, ends_at = ?5
           WHERE shift_id = ?1 AND org_id = ?2",
          rusqlite::params![id_str, org_str, label_cl, starts_str, ends_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(shift)
  }

  async fn delete_shift(&self, org_id: Uuid, shift_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(shift_id);
    let org_str = encode_uuid(org_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM shifts WHERE shift_id = ?1 AND org_id = ?2",
          rusqlite::params![id_str, org_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ShiftNotFound(shift_id));
    }
    Ok(())
  }

  // ── Documents ───────────────────────────────────────────────────────────

  async fn create_document(&self, input: NewDocument) -> Result<Document> {
    let now = Utc::now();
    let document = Document {
      document_id: Uuid::new_v4(),
      org_id:      input.org_id,
      title:       input.title,
      category:    input.category,
      storage_key: input.storage_key,
      media_type:  input.media_type,
      size_bytes:  input.size_bytes,
      status:      DocumentStatus::Draft,
      uploaded_by: input.uploaded_by,
      created_at:  now,
      updated_at:  now,
      deleted_at:  None,
    };

    let id_str = encode_uuid(document.document_id);
    let org_str = encode_uuid(document.org_id);
    let title_cl = document.title.clone();
    let category_cl = document.category.clone();
    let key_cl = document.storage_key.clone();
    let media_cl = document.media_type.clone();
    let size = document.size_bytes;
    let status_str = encode_document_status(document.status).to_owned();
    let uploader_str = encode_uuid(document.uploaded_by);
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (
             document_id, org_id, title, category, storage_key, media_type,
             size_bytes, status, uploaded_by, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
          rusqlite::params![
            id_str,
            org_str,
            title_cl,
            category_cl,
            key_cl,
            media_cl,
            size,
            status_str,
            uploader_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn get_document(
    &self,
    org_id: Uuid,
    document_id: Uuid,
  ) -> Result<Option<Document>> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(document_id);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DOCUMENT_COLS} FROM documents
                 WHERE document_id = ?1 AND org_id = ?2 AND deleted_at IS NULL"
              ),
              rusqlite::params![id_str, org_str],
              map_document,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn list_documents(
    &self,
    org_id: Uuid,
    query: DocumentQuery,
  ) -> Result<Vec<Document>> {
    let org_str = encode_uuid(org_id);
    let category_cl = query.category;
    let status_str = query.status.map(encode_document_status).map(str::to_owned);
    let (limit, offset) = limit_offset(query.limit, query.offset);

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DOCUMENT_COLS} FROM documents
           WHERE org_id = ?1 AND deleted_at IS NULL
             AND (?2 IS NULL OR category = ?2)
             AND (?3 IS NULL OR status = ?3)
           ORDER BY created_at DESC
           LIMIT ?4 OFFSET ?5"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![org_str, category_cl, status_str, limit, offset],
            map_document,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn set_document_status(
    &self,
    org_id: Uuid,
    document_id: Uuid,
    status: DocumentStatus,
  ) -> Result<Document> {
    let mut document = self
      .get_document(org_id, document_id)
      .await?
      .ok_or(Error::DocumentNotFound(document_id))?;

    document.status = status;
    document.updated_at = Utc::now();

    let id_str = encode_uuid(document_id);
    let org_str = encode_uuid(org_id);
    let status_str = encode_document_status(status).to_owned();
    let updated_str = encode_dt(document.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE documents SET status = ?3, updated_at = ?4
           WHERE document_id = ?1 AND org_id = ?2",
          rusqlite::params![id_str, org_str, status_str, updated_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn delete_document(
    &self,
    org_id: Uuid,
    document_id: Uuid,
  ) -> Result<()> {
    let id_str = encode_uuid(document_id);
    let org_str = encode_uuid(org_id);
    let now_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET deleted_at = ?3
           WHERE document_id = ?1 AND org_id = ?2 AND deleted_at IS NULL",
          rusqlite::params![id_str, org_str, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::DocumentNotFound(document_id));
    }
    Ok(())
  }

  // ── Notifications ───────────────────────────────────────────────────────

  async fn create_notification(
    &self,
    input: NewNotification,
  ) -> Result<Notification> {
    let notification = Notification {
      notification_id: Uuid::new_v4(),
      org_id:          input.org_id,
      user_id:         input.user_id,
      kind:            input.kind,
      body:            input.body,
      created_at:      Utc::now(),
      read_at:         None,
    };

    let id_str = encode_uuid(notification.notification_id);
    let org_str = encode_uuid(notification.org_id);
    let user_str = encode_uuid(notification.user_id);
    let kind_cl = notification.kind.clone();
    let body_cl = notification.body.clone();
    let at_str = encode_dt(notification.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (
             notification_id, org_id, user_id, kind, body, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, org_str, user_str, kind_cl, body_cl, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(notification)
  }

  async fn list_notifications(
    &self,
    org_id: Uuid,
    user_id: Uuid,
    unread_only: bool,
  ) -> Result<Vec<Notification>> {
    let org_str = encode_uuid(org_id);
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTIFICATION_COLS} FROM notifications
           WHERE org_id = ?1 AND user_id = ?2
             AND (?3 = 0 OR read_at IS NULL)
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![org_str, user_str, unread_only],
            map_notification,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawNotification::into_notification)
      .collect()
  }

  async fn mark_notification_read(
    &self,
    org_id: Uuid,
    user_id: Uuid,
    notification_id: Uuid,
  ) -> Result<Notification> {
    let id_str = encode_uuid(notification_id);
    let org_str = encode_uuid(org_id);
    let user_str = encode_uuid(user_id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawNotification> = self
      .conn
      .call(move |conn| {
        // COALESCE keeps the original read_at on repeat calls.
        conn.execute(
          "UPDATE notifications SET read_at = COALESCE(read_at, ?4)
           WHERE notification_id = ?1 AND org_id = ?2 AND user_id = ?3",
          rusqlite::params![id_str, org_str, user_str, now_str],
        )?;
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {NOTIFICATION_COLS} FROM notifications
                 WHERE notification_id = ?1 AND org_id = ?2 AND user_id = ?3"
              ),
              rusqlite::params![id_str, org_str, user_str],
              map_notification,
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(RawNotification::into_notification)
      .transpose()?
      .ok_or(Error::NotificationNotFound(notification_id))
  }

  async fn mark_all_notifications_read(
    &self,
    org_id: Uuid,
    user_id: Uuid,
  ) -> Result<u64> {
    let org_str = encode_uuid(org_id);
    let user_str = encode_uuid(user_id);
    let now_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET read_at = ?3
           WHERE org_id = ?1 AND user_id = ?2 AND read_at IS NULL",
          rusqlite::params![org_str, user_str, now_str],
        )?)
      })
      .await?;

    Ok(changed as u64)
  }

  // ── LUC procedures ──────────────────────────────────────────────────────

  async fn create_procedure(&self, input: NewProcedure) -> Result<Procedure> {
    let now = Utc::now();
    let procedure = Procedure {
      procedure_id: Uuid::new_v4(),
      org_id:       input.org_id,
      code:         input.code,
      title:        input.title,
      revision:     1,
      status:       ProcedureStatus::Draft,
      owner:        input.owner,
      created_at:   now,
      updated_at:   now,
    };

    let id_str = encode_uuid(procedure.procedure_id);
    let org_str = encode_uuid(procedure.org_id);
    let code_cl = procedure.code.clone();
    let title_cl = procedure.title.clone();
    let revision = procedure.revision;
    let status_str = encode_procedure_status(procedure.status).to_owned();
    let owner_str = procedure.owner.map(encode_uuid);
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO procedures (
             procedure_id, org_id, code, title, revision, status, owner,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str, org_str, code_cl, title_cl, revision, status_str,
            owner_str, at_str
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(procedure)
  }

  async fn get_procedure(
    &self,
    org_id: Uuid,
    procedure_id: Uuid,
  ) -> Result<Option<Procedure>> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(procedure_id);

    let raw: Option<RawProcedure> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PROCEDURE_COLS} FROM procedures
                 WHERE procedure_id = ?1 AND org_id = ?2"
              ),
              rusqlite::params![id_str, org_str],
              map_procedure,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProcedure::into_procedure).transpose()
  }

  async fn list_procedures(
    &self,
    org_id: Uuid,
    query: ProcedureQuery,
  ) -> Result<Vec<Procedure>> {
    let org_str = encode_uuid(org_id);
    let status_str =
      query.status.map(encode_procedure_status).map(str::to_owned);
    let (limit, offset) = limit_offset(query.limit, query.offset);

    let raws: Vec<RawProcedure> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROCEDURE_COLS} FROM procedures
           WHERE org_id = ?1
             AND (?2 IS NULL OR status = ?2)
           ORDER BY code
           LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![org_str, status_str, limit, offset],
            map_procedure,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProcedure::into_procedure).collect()
  }

  async fn update_procedure(
    &self,
    org_id: Uuid,
    procedure_id: Uuid,
    update: ProcedureUpdate,
  ) -> Result<Procedure> {
    let mut procedure = self
      .get_procedure(org_id, procedure_id)
      .await?
      .ok_or(Error::ProcedureNotFound(procedure_id))?;

    if let Some(title) = update.title {
      procedure.title = title;
    }
    if let Some(revision) = update.revision {
      procedure.revision = revision;
    }
    if let Some(owner) = update.owner {
      procedure.owner = Some(owner);
    }
    procedure.updated_at = Utc::now();

    let id_str = encode_uuid(procedure_id);
    let org_str = encode_uuid(org_id);
    let title_cl = procedure.title.clone();
    let revision = procedure.revision;
    let owner_str = procedure.owner.map(encode_uuid);
    let updated_str = encode_dt(procedure.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE procedures SET
             title = ?3, revision = ?4, owner = ?5, updated_at = ?6
           WHERE procedure_id = ?1 AND org_id = ?2",
          rusqlite::params![
            id_str, org_str, title_cl, revision, owner_str, updated_str
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(procedure)
  }

  async fn set_procedure_status(
    &self,
    org_id: Uuid,
    procedure_id: Uuid,
    status: ProcedureStatus,
  ) -> Result<Procedure> {
    let mut procedure = self
      .get_procedure(org_id, procedure_id)
      .await?
      .ok_or(Error::ProcedureNotFound(procedure_id))?;

    procedure.status = status;
    procedure.updated_at = Utc::now();

    let id_str = encode_uuid(procedure_id);
    let org_str = encode_uuid(org_id);
    let status_str = encode_procedure_status(status).to_owned();
    let updated_str = encode_dt(procedure.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE procedures SET status = ?3, updated_at = ?4
           WHERE procedure_id = ?1 AND org_id = ?2",
          rusqlite::params![id_str, org_str, status_str, updated_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(procedure)
  }

  // ── KPIs and dashboard ──────────────────────────────────────────────────

  async fn upsert_kpi(&self, input: NewKpi) -> Result<KpiRecord> {
    let id_str = encode_uuid(Uuid::new_v4());
    let org_str = encode_uuid(input.org_id);
    let name_cl = input.name.clone();
    let period_cl = input.period.clone();
    let value = input.value;
    let target = input.target;
    let at_str = encode_dt(Utc::now());

    let raw: RawKpi = self
      .conn
      .call(move |conn| {
        // The existing kpi_id is kept when the record already exists.
        conn.execute(
          "INSERT INTO kpis (
             kpi_id, org_id, name, period, value, target, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (org_id, name, period) DO UPDATE SET
             value = excluded.value,
             target = excluded.target,
             recorded_at = excluded.recorded_at",
          rusqlite::params![
            id_str, org_str, name_cl, period_cl, value, target, at_str
          ],
        )?;
        Ok(conn.query_row(
          &format!(
            "SELECT {KPI_COLS} FROM kpis
             WHERE org_id = ?1 AND name = ?2 AND period = ?3"
          ),
          rusqlite::params![org_str, name_cl, period_cl],
          map_kpi,
        )?)
      })
      .await?;

    raw.into_kpi()
  }

  async fn list_kpis(
    &self,
    org_id: Uuid,
    period: Option<String>,
  ) -> Result<Vec<KpiRecord>> {
    let org_str = encode_uuid(org_id);

    let raws: Vec<RawKpi> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {KPI_COLS} FROM kpis
           WHERE org_id = ?1
             AND (?2 IS NULL OR period = ?2)
           ORDER BY period DESC, name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![org_str, period], map_kpi)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawKpi::into_kpi).collect()
  }

  async fn dashboard_summary(
    &self,
    org_id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
    period: String,
  ) -> Result<DashboardSummary> {
    let org_str = encode_uuid(org_id);
    let user_str = encode_uuid(user_id);
    let now_str = encode_dt(now);
    let week_str = encode_dt(now + Days::new(7));

    let (status_counts, open_tickets, grounding_tickets, flight_hours,
         upcoming_shifts, unread, raw_kpis) = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT status, COUNT(*) FROM missions
           WHERE org_id = ?1 AND deleted_at IS NULL
           GROUP BY status",
        )?;
        let status_counts = stmt
          .query_map(rusqlite::params![org_str], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let open_tickets: u64 = conn.query_row(
          "SELECT COUNT(*) FROM tickets
           WHERE org_id = ?1 AND status IN ('open', 'in_progress')",
          rusqlite::params![org_str],
          |row| row.get(0),
        )?;

        let grounding_tickets: u64 = conn.query_row(
          "SELECT COUNT(*) FROM tickets
           WHERE org_id = ?1 AND status IN ('open', 'in_progress')
             AND priority = 'grounding'",
          rusqlite::params![org_str],
          |row| row.get(0),
        )?;

        let flight_hours: f64 = conn.query_row(
          "SELECT COALESCE(
             SUM((julianday(landing_at) - julianday(takeoff_at)) * 24.0), 0.0)
           FROM flight_logs WHERE org_id = ?1",
          rusqlite::params![org_str],
          |row| row.get(0),
        )?;

        let upcoming_shifts: u64 = conn.query_row(
          "SELECT COUNT(*) FROM shifts
           WHERE org_id = ?1 AND starts_at >= ?2 AND starts_at < ?3",
          rusqlite::params![org_str, now_str, week_str],
          |row| row.get(0),
        )?;

        let unread: u64 = conn.query_row(
          "SELECT COUNT(*) FROM notifications
           WHERE org_id = ?1 AND user_id = ?2 AND read_at IS NULL",
          rusqlite::params![org_str, user_str],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {KPI_COLS} FROM kpis
           WHERE org_id = ?1 AND period = ?2
           ORDER BY name"
        ))?;
        let raw_kpis = stmt
          .query_map(rusqlite::params![org_str, period], map_kpi)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((
          status_counts,
          open_tickets,
          grounding_tickets,
          flight_hours,
          upcoming_shifts,
          unread,
          raw_kpis,
        ))
      })
      .await?;

    let mut missions = MissionStatusCounts::default();
    for (status, count) in status_counts {
      match status.as_str() {
        "planned" => missions.planned = count,
        "briefed" => missions.briefed = count,
        "active" => missions.active = count,
        "completed" => missions.completed = count,
        "aborted" => missions.aborted = count,
        other => return Err(Error::Decode(format!("unknown mission status: {other:?}"))),
      }
    }

    let kpis = raw_kpis
      .into_iter()
      .map(RawKpi::into_kpi)
      .collect::<Result<Vec<_>>>()?;

    Ok(DashboardSummary {
      missions,
      open_tickets,
      grounding_tickets,
      flight_hours,
      upcoming_shifts,
      unread_notifications: unread,
      kpis,
    })
  }
}
