//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Days, Duration, Utc};
use aerobase_core::{
  dashboard::NewKpi,
  document::{DocumentStatus, NewDocument},
  flight::NewFlightLog,
  mission::{MissionStatus, MissionUpdate, NewMission},
  notification::NewNotification,
  org::{NewUser, Org, Role, User},
  procedure::{NewProcedure, ProcedureStatus, ProcedureUpdate},
  shift::{NewShift, ShiftUpdate},
  store::{
    DocumentQuery, FlightQuery, MissionQuery, OpsStore, ProcedureQuery,
    ShiftQuery, TicketQuery,
  },
  ticket::{NewTicket, TicketPriority, TicketStatus, TicketUpdate},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn org_with_user(s: &SqliteStore, org_name: &str) -> (Org, User) {
  let org = s.create_org(org_name.into()).await.unwrap();
  let user = s
    .create_user(NewUser {
      org_id:        org.org_id,
      display_name:  format!("{org_name} pilot"),
      email:         format!("pilot@{}.example.com", org_name.to_lowercase()),
      role:          Role::Pilot,
      reports_to:    None,
      password_hash: "$argon2id$fake".into(),
    })
    .await
    .unwrap();
  (org, user)
}

fn new_mission(org: &Org, pic: &User, name: &str) -> NewMission {
  NewMission {
    org_id:           org.org_id,
    name:             name.into(),
    site:             "Test Range North".into(),
    pilot_in_command: pic.user_id,
    aircraft:         "SE-DRN1".into(),
    scheduled_start:  Utc::now() + Duration::hours(1),
    scheduled_end:    Utc::now() + Duration::hours(3),
    notes:            None,
  }
}

fn new_ticket(org: &Org, creator: &User, title: &str) -> NewTicket {
  NewTicket {
    org_id:      org.org_id,
    aircraft:    "SE-DRN1".into(),
    title:       title.into(),
    description: "found during pre-flight".into(),
    priority:    TicketPriority::Normal,
    assignee:    None,
    created_by:  creator.user_id,
  }
}

// ─── Orgs and users ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let fetched = s.get_user(org.org_id, user.user_id).await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert_eq!(fetched.role, Role::Pilot);
  assert!(fetched.active);
}

#[tokio::test]
async fn get_user_wrong_org_returns_none() {
  let s = store().await;
  let (_org_a, user_a) = org_with_user(&s, "Acme").await;
  let (org_b, _user_b) = org_with_user(&s, "Borealis").await;

  let cross = s.get_user(org_b.org_id, user_a.user_id).await.unwrap();
  assert!(cross.is_none());
}

#[tokio::test]
async fn duplicate_email_rejected() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let err = s
    .create_user(NewUser {
      org_id:        org.org_id,
      display_name:  "Duplicate".into(),
      email:         user.email.clone(),
      role:          Role::Manager,
      reports_to:    None,
      password_hash: "$argon2id$fake".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::DuplicateEmail(_)));
}

#[tokio::test]
async fn get_user_by_email_finds_login_user() {
  let s = store().await;
  let (_org, user) = org_with_user(&s, "Acme").await;

  let found = s.get_user_by_email(user.email.clone()).await.unwrap();
  assert_eq!(found.unwrap().user_id, user.user_id);

  let missing = s
    .get_user_by_email("nobody@example.com".into())
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn list_users_scoped_and_sorted() {
  let s = store().await;
  let (org, _user) = org_with_user(&s, "Acme").await;
  let (_other_org, _other_user) = org_with_user(&s, "Borealis").await;

  s.create_user(NewUser {
    org_id:        org.org_id,
    display_name:  "Aaron Ops".into(),
    email:         "aaron@acme.example.com".into(),
    role:          Role::Manager,
    reports_to:    None,
    password_hash: "$argon2id$fake".into(),
  })
  .await
  .unwrap();

  let users = s.list_users(org.org_id).await.unwrap();
  assert_eq!(users.len(), 2);
  assert_eq!(users[0].display_name, "Aaron Ops");
  assert!(users.iter().all(|u| u.org_id == org.org_id));
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_roundtrip() {
  let s = store().await;
  let (_org, user) = org_with_user(&s, "Acme").await;

  let session = s
    .create_session(user.user_id, Utc::now() + Duration::hours(12))
    .await
    .unwrap();

  let resolved = s.get_session(session.token, Utc::now()).await.unwrap();
  let (resolved_session, resolved_user) = resolved.unwrap();
  assert_eq!(resolved_session.token, session.token);
  assert_eq!(resolved_user.user_id, user.user_id);
}

#[tokio::test]
async fn expired_session_not_returned() {
  let s = store().await;
  let (_org, user) = org_with_user(&s, "Acme").await;

  let session = s
    .create_session(user.user_id, Utc::now() - Duration::minutes(1))
    .await
    .unwrap();

  let resolved = s.get_session(session.token, Utc::now()).await.unwrap();
  assert!(resolved.is_none());
}

#[tokio::test]
async fn deleted_session_not_returned() {
  let s = store().await;
  let (_org, user) = org_with_user(&s, "Acme").await;

  let session = s
    .create_session(user.user_id, Utc::now() + Duration::hours(12))
    .await
    .unwrap();
  s.delete_session(session.token).await.unwrap();

  let resolved = s.get_session(session.token, Utc::now()).await.unwrap();
  assert!(resolved.is_none());

  // deleting again is a no-op
  s.delete_session(session.token).await.unwrap();
}

// ─── Missions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_mission_starts_planned() {
  let s = store().await;
  let (org, pic) = org_with_user(&s, "Acme").await;

  let mission = s
    .create_mission(new_mission(&org, &pic, "Roof survey"))
    .await
    .unwrap();
  assert_eq!(mission.status, MissionStatus::Planned);
  assert!(mission.deleted_at.is_none());

  let fetched = s
    .get_mission(org.org_id, mission.mission_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.name, "Roof survey");
  assert_eq!(fetched.pilot_in_command, pic.user_id);
}

#[tokio::test]
async fn mission_invisible_to_other_org() {
  let s = store().await;
  let (org_a, pic) = org_with_user(&s, "Acme").await;
  let (org_b, _) = org_with_user(&s, "Borealis").await;

  let mission = s
    .create_mission(new_mission(&org_a, &pic, "Roof survey"))
    .await
    .unwrap();

  let cross = s.get_mission(org_b.org_id, mission.mission_id).await.unwrap();
  assert!(cross.is_none());

  let listed = s
    .list_missions(org_b.org_id, MissionQuery::default())
    .await
    .unwrap();
  assert!(listed.is_empty());
}

#[tokio::test]
async fn list_missions_filtered_by_status() {
  let s = store().await;
  let (org, pic) = org_with_user(&s, "Acme").await;

  let m1 = s
    .create_mission(new_mission(&org, &pic, "First"))
    .await
    .unwrap();
  s.create_mission(new_mission(&org, &pic, "Second"))
    .await
    .unwrap();
  s.set_mission_status(org.org_id, m1.mission_id, MissionStatus::Active)
    .await
    .unwrap();

  let active = s
    .list_missions(org.org_id, MissionQuery {
      status: Some(MissionStatus::Active),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].mission_id, m1.mission_id);
}

#[tokio::test]
async fn update_mission_partial() {
  let s = store().await;
  let (org, pic) = org_with_user(&s, "Acme").await;

  let mission = s
    .create_mission(new_mission(&org, &pic, "Roof survey"))
    .await
    .unwrap();

  let updated = s
    .update_mission(org.org_id, mission.mission_id, MissionUpdate {
      notes: Some("winds forecast 8 m/s".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  // untouched fields survive
  assert_eq!(updated.name, "Roof survey");
  assert_eq!(updated.site, mission.site);
  assert_eq!(updated.notes.as_deref(), Some("winds forecast 8 m/s"));
  assert!(updated.updated_at >= mission.updated_at);
}

#[tokio::test]
async fn update_missing_mission_errors() {
  let s = store().await;
  let (org, _) = org_with_user(&s, "Acme").await;

  let err = s
    .update_mission(org.org_id, Uuid::new_v4(), MissionUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::MissionNotFound(_)));
}

#[tokio::test]
async fn soft_deleted_mission_drops_out_of_reads() {
  let s = store().await;
  let (org, pic) = org_with_user(&s, "Acme").await;

  let mission = s
    .create_mission(new_mission(&org, &pic, "Roof survey"))
    .await
    .unwrap();
  s.delete_mission(org.org_id, mission.mission_id).await.unwrap();

  assert!(
    s.get_mission(org.org_id, mission.mission_id)
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    s.list_missions(org.org_id, MissionQuery::default())
      .await
      .unwrap()
      .is_empty()
  );

  // deleting twice errors: the row is already out of view
  let err = s
    .delete_mission(org.org_id, mission.mission_id)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::MissionNotFound(_)));
}

// ─── Flight logbook ──────────────────────────────────────────────────────────

fn new_flight(org: &Org, mission_id: Uuid, pilot: &User) -> NewFlightLog {
  let takeoff = Utc::now() - Duration::minutes(30);
  NewFlightLog {
    org_id:         org.org_id,
    mission_id,
    pilot_id:       pilot.user_id,
    aircraft:       "SE-DRN1".into(),
    takeoff_at:     takeoff,
    landing_at:     takeoff + Duration::minutes(24),
    battery_cycles: Some(1),
    remarks:        None,
  }
}

#[tokio::test]
async fn add_and_list_flight_logs() {
  let s = store().await;
  let (org, pilot) = org_with_user(&s, "Acme").await;
  let mission = s
    .create_mission(new_mission(&org, &pilot, "Roof survey"))
    .await
    .unwrap();

  let log = s
    .add_flight_log(new_flight(&org, mission.mission_id, &pilot))
    .await
    .unwrap();
  assert_eq!(log.duration_minutes(), 24);

  let logs = s
    .list_flight_logs(org.org_id, FlightQuery::default())
    .await
    .unwrap();
  assert_eq!(logs.len(), 1);
  assert_eq!(logs[0].log_id, log.log_id);

  let by_mission = s
    .list_flight_logs(org.org_id, FlightQuery {
      mission_id: Some(mission.mission_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_mission.len(), 1);

  let by_other = s
    .list_flight_logs(org.org_id, FlightQuery {
      mission_id: Some(Uuid::new_v4()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(by_other.is_empty());
}

#[tokio::test]
async fn flight_log_requires_existing_mission() {
  let s = store().await;
  let (org, pilot) = org_with_user(&s, "Acme").await;

  let err = s
    .add_flight_log(new_flight(&org, Uuid::new_v4(), &pilot))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::MissionNotFound(_)));
}

#[tokio::test]
async fn flight_log_rejects_soft_deleted_mission() {
  let s = store().await;
  let (org, pilot) = org_with_user(&s, "Acme").await;
  let mission = s
    .create_mission(new_mission(&org, &pilot, "Roof survey"))
    .await
    .unwrap();
  s.delete_mission(org.org_id, mission.mission_id).await.unwrap();

  let err = s
    .add_flight_log(new_flight(&org, mission.mission_id, &pilot))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::MissionNotFound(_)));
}

// ─── Maintenance tickets ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_ticket_starts_open() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let ticket = s
    .create_ticket(new_ticket(&org, &user, "Prop chip"))
    .await
    .unwrap();
  assert_eq!(ticket.status, TicketStatus::Open);
  assert!(ticket.status.is_open());

  let fetched = s
    .get_ticket(org.org_id, ticket.ticket_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.title, "Prop chip");
}

#[tokio::test]
async fn list_tickets_filtered() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let mut grounding = new_ticket(&org, &user, "Cracked arm");
  grounding.priority = TicketPriority::Grounding;
  s.create_ticket(grounding).await.unwrap();
  let normal = s
    .create_ticket(new_ticket(&org, &user, "Worn gimbal damper"))
    .await
    .unwrap();
  s.set_ticket_status(org.org_id, normal.ticket_id, TicketStatus::Resolved)
    .await
    .unwrap();

  let open = s
    .list_tickets(org.org_id, TicketQuery {
      status: Some(TicketStatus::Open),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(open.len(), 1);
  assert_eq!(open[0].title, "Cracked arm");

  let by_priority = s
    .list_tickets(org.org_id, TicketQuery {
      priority: Some(TicketPriority::Grounding),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_priority.len(), 1);
}

#[tokio::test]
async fn update_ticket_and_assign() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let ticket = s
    .create_ticket(new_ticket(&org, &user, "Prop chip"))
    .await
    .unwrap();
  let updated = s
    .update_ticket(org.org_id, ticket.ticket_id, TicketUpdate {
      priority: Some(TicketPriority::High),
      assignee: Some(user.user_id),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.priority, TicketPriority::High);
  assert_eq!(updated.assignee, Some(user.user_id));
  assert_eq!(updated.title, "Prop chip");
}

#[tokio::test]
async fn set_status_missing_ticket_errors() {
  let s = store().await;
  let (org, _) = org_with_user(&s, "Acme").await;

  let err = s
    .set_ticket_status(org.org_id, Uuid::new_v4(), TicketStatus::Closed)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::TicketNotFound(_)));
}

// ─── Shifts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn shift_crud() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let shift = s
    .create_shift(NewShift {
      org_id:     org.org_id,
      user_id:    user.user_id,
      role_label: "pilot".into(),
      starts_at:  Utc::now() + Duration::hours(24),
      ends_at:    Utc::now() + Duration::hours(32),
    })
    .await
    .unwrap();

  let fetched = s
    .get_shift(org.org_id, shift.shift_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.role_label, "pilot");

  // invisible from another org
  let other = s.create_org("Rival".into()).await.unwrap();
  assert!(s.get_shift(other.org_id, shift.shift_id).await.unwrap().is_none());

  let updated = s
    .update_shift(org.org_id, shift.shift_id, ShiftUpdate {
      role_label: Some("spotter".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.role_label, "spotter");
  assert_eq!(updated.starts_at, shift.starts_at);

  s.delete_shift(org.org_id, shift.shift_id).await.unwrap();
  let listed = s.list_shifts(org.org_id, ShiftQuery::default()).await.unwrap();
  assert!(listed.is_empty());
  assert!(s.get_shift(org.org_id, shift.shift_id).await.unwrap().is_none());

  let err = s
    .delete_shift(org.org_id, shift.shift_id)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ShiftNotFound(_)));
}

#[tokio::test]
async fn list_shifts_window_overlap() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  // one shift tomorrow, one next month
  s.create_shift(NewShift {
    org_id:     org.org_id,
    user_id:    user.user_id,
    role_label: "pilot".into(),
    starts_at:  Utc::now() + Duration::hours(24),
    ends_at:    Utc::now() + Duration::hours(32),
  })
  .await
  .unwrap();
  s.create_shift(NewShift {
    org_id:     org.org_id,
    user_id:    user.user_id,
    role_label: "pilot".into(),
    starts_at:  Utc::now() + Days::new(30),
    ends_at:    Utc::now() + Days::new(30) + Duration::hours(8),
  })
  .await
  .unwrap();

  let this_week = s
    .list_shifts(org.org_id, ShiftQuery {
      from: Some(Utc::now()),
      to: Some(Utc::now() + Days::new(7)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(this_week.len(), 1);
}

// ─── Documents ───────────────────────────────────────────────────────────────

fn new_document(org: &Org, uploader: &User) -> NewDocument {
  NewDocument {
    org_id:      org.org_id,
    title:       "Ops manual".into(),
    category:    "manuals".into(),
    storage_key: format!("{}/{}/ops-manual.pdf", org.org_id, Uuid::new_v4()),
    media_type:  "application/pdf".into(),
    size_bytes:  1_048_576,
    uploaded_by: uploader.user_id,
  }
}

#[tokio::test]
async fn document_lifecycle() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let document = s.create_document(new_document(&org, &user)).await.unwrap();
  assert_eq!(document.status, DocumentStatus::Draft);

  let published = s
    .set_document_status(
      org.org_id,
      document.document_id,
      DocumentStatus::Published,
    )
    .await
    .unwrap();
  assert_eq!(published.status, DocumentStatus::Published);

  let listed = s
    .list_documents(org.org_id, DocumentQuery {
      status: Some(DocumentStatus::Published),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(listed.len(), 1);

  s.delete_document(org.org_id, document.document_id)
    .await
    .unwrap();
  assert!(
    s.get_document(org.org_id, document.document_id)
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn list_documents_by_category() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  s.create_document(new_document(&org, &user)).await.unwrap();
  let mut insurance = new_document(&org, &user);
  insurance.category = "insurance".into();
  s.create_document(insurance).await.unwrap();

  let manuals = s
    .list_documents(org.org_id, DocumentQuery {
      category: Some("manuals".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(manuals.len(), 1);
  assert_eq!(manuals[0].category, "manuals");
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notifications_unread_then_read() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let n = s
    .create_notification(NewNotification {
      org_id:  org.org_id,
      user_id: user.user_id,
      kind:    "ticket".into(),
      body:    "Ticket assigned to you".into(),
    })
    .await
    .unwrap();
  assert!(n.is_unread());

  let unread = s
    .list_notifications(org.org_id, user.user_id, true)
    .await
    .unwrap();
  assert_eq!(unread.len(), 1);

  let read = s
    .mark_notification_read(org.org_id, user.user_id, n.notification_id)
    .await
    .unwrap();
  assert!(read.read_at.is_some());

  // idempotent: re-reading keeps the original timestamp
  let again = s
    .mark_notification_read(org.org_id, user.user_id, n.notification_id)
    .await
    .unwrap();
  assert_eq!(again.read_at, read.read_at);

  let unread = s
    .list_notifications(org.org_id, user.user_id, true)
    .await
    .unwrap();
  assert!(unread.is_empty());

  let all = s
    .list_notifications(org.org_id, user.user_id, false)
    .await
    .unwrap();
  assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn mark_notification_of_other_user_errors() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;
  let (_other_org, other_user) = org_with_user(&s, "Borealis").await;

  let n = s
    .create_notification(NewNotification {
      org_id:  org.org_id,
      user_id: user.user_id,
      kind:    "mission".into(),
      body:    "Mission briefed".into(),
    })
    .await
    .unwrap();

  let err = s
    .mark_notification_read(org.org_id, other_user.user_id, n.notification_id)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::NotificationNotFound(_)));
}

#[tokio::test]
async fn mark_all_notifications_read_counts() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  for i in 0..3 {
    s.create_notification(NewNotification {
      org_id:  org.org_id,
      user_id: user.user_id,
      kind:    "shift".into(),
      body:    format!("Shift update {i}"),
    })
    .await
    .unwrap();
  }

  let changed = s
    .mark_all_notifications_read(org.org_id, user.user_id)
    .await
    .unwrap();
  assert_eq!(changed, 3);

  let changed_again = s
    .mark_all_notifications_read(org.org_id, user.user_id)
    .await
    .unwrap();
  assert_eq!(changed_again, 0);
}

// ─── LUC procedures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn procedure_lifecycle() {
  let s = store().await;
  let (org, owner) = org_with_user(&s, "Acme").await;

  let procedure = s
    .create_procedure(NewProcedure {
      org_id: org.org_id,
      code:   "PRE-FLT-01".into(),
      title:  "Pre-flight checklist".into(),
      owner:  Some(owner.user_id),
    })
    .await
    .unwrap();
  assert_eq!(procedure.status, ProcedureStatus::Draft);
  assert_eq!(procedure.revision, 1);

  let revised = s
    .update_procedure(org.org_id, procedure.procedure_id, ProcedureUpdate {
      revision: Some(2),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(revised.revision, 2);

  let approved = s
    .set_procedure_status(
      org.org_id,
      procedure.procedure_id,
      ProcedureStatus::Approved,
    )
    .await
    .unwrap();
  assert_eq!(approved.status, ProcedureStatus::Approved);

  let drafts = s
    .list_procedures(org.org_id, ProcedureQuery {
      status: Some(ProcedureStatus::Draft),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(drafts.is_empty());
}

// ─── KPIs and dashboard ──────────────────────────────────────────────────────

#[tokio::test]
async fn kpi_upsert_overwrites() {
  let s = store().await;
  let (org, _) = org_with_user(&s, "Acme").await;

  let first = s
    .upsert_kpi(NewKpi {
      org_id: org.org_id,
      name:   "incident_rate".into(),
      period: "2026-08".into(),
      value:  0.8,
      target: Some(0.5),
    })
    .await
    .unwrap();

  let second = s
    .upsert_kpi(NewKpi {
      org_id: org.org_id,
      name:   "incident_rate".into(),
      period: "2026-08".into(),
      value:  0.4,
      target: Some(0.5),
    })
    .await
    .unwrap();

  // same record, overwritten in place
  assert_eq!(second.kpi_id, first.kpi_id);
  assert_eq!(second.value, 0.4);

  let listed = s
    .list_kpis(org.org_id, Some("2026-08".into()))
    .await
    .unwrap();
  assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn dashboard_summary_aggregates() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let m1 = s
    .create_mission(new_mission(&org, &user, "First"))
    .await
    .unwrap();
  s.create_mission(new_mission(&org, &user, "Second"))
    .await
    .unwrap();
  s.set_mission_status(org.org_id, m1.mission_id, MissionStatus::Active)
    .await
    .unwrap();

  // 90 minutes of logged flight
  let takeoff = Utc::now() - Duration::hours(2);
  s.add_flight_log(NewFlightLog {
    org_id:         org.org_id,
    mission_id:     m1.mission_id,
    pilot_id:       user.user_id,
    aircraft:       "SE-DRN1".into(),
    takeoff_at:     takeoff,
    landing_at:     takeoff + Duration::minutes(90),
    battery_cycles: None,
    remarks:        None,
  })
  .await
  .unwrap();

  let mut grounding = new_ticket(&org, &user, "Cracked arm");
  grounding.priority = TicketPriority::Grounding;
  s.create_ticket(grounding).await.unwrap();
  let resolved = s
    .create_ticket(new_ticket(&org, &user, "Fixed already"))
    .await
    .unwrap();
  s.set_ticket_status(org.org_id, resolved.ticket_id, TicketStatus::Resolved)
    .await
    .unwrap();

  s.create_shift(NewShift {
    org_id:     org.org_id,
    user_id:    user.user_id,
    role_label: "pilot".into(),
    starts_at:  Utc::now() + Duration::hours(24),
    ends_at:    Utc::now() + Duration::hours(32),
  })
  .await
  .unwrap();

  s.create_notification(NewNotification {
    org_id:  org.org_id,
    user_id: user.user_id,
    kind:    "ticket".into(),
    body:    "Grounding ticket opened".into(),
  })
  .await
  .unwrap();

  s.upsert_kpi(NewKpi {
    org_id: org.org_id,
    name:   "incident_rate".into(),
    period: "2026-08".into(),
    value:  0.2,
    target: None,
  })
  .await
  .unwrap();

  let summary = s
    .dashboard_summary(org.org_id, user.user_id, Utc::now(), "2026-08".into())
    .await
    .unwrap();

  assert_eq!(summary.missions.active, 1);
  assert_eq!(summary.missions.planned, 1);
  assert_eq!(summary.open_tickets, 1);
  assert_eq!(summary.grounding_tickets, 1);
  assert!((summary.flight_hours - 1.5).abs() < 0.01);
  assert_eq!(summary.upcoming_shifts, 1);
  assert_eq!(summary.unread_notifications, 1);
  assert_eq!(summary.kpis.len(), 1);
}

#[tokio::test]
async fn dashboard_empty_org() {
  let s = store().await;
  let (org, user) = org_with_user(&s, "Acme").await;

  let summary = s
    .dashboard_summary(org.org_id, user.user_id, Utc::now(), "2026-08".into())
    .await
    .unwrap();

  assert_eq!(summary.missions.planned, 0);
  assert_eq!(summary.open_tickets, 0);
  assert_eq!(summary.flight_hours, 0.0);
  assert!(summary.kpis.is_empty());
}
