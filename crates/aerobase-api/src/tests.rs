//! Router-level integration tests: a real `SqliteStore` behind the full
//! router, driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use aerobase_core::{
  org::{NewUser, Role},
  store::OpsStore,
};
use aerobase_store_sqlite::SqliteStore;
use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{AppState, Signer, api_router, auth};

struct TestApp {
  router:        Router,
  admin_token:   String,
  manager_token: String,
  pilot_token:   String,
  manager_id:    Uuid,
  pilot_id:      Uuid,
}

async fn test_app() -> TestApp {
  let store = SqliteStore::open_in_memory().await.expect("store");
  let org = store.create_org("Acme Aerial".into()).await.unwrap();

  // One shared password keeps the argon2 cost down.
  let hash = auth::hash_password("hunter2").unwrap();
  let admin = store
    .create_user(NewUser {
      org_id:        org.org_id,
      display_name:  "Alex Admin".into(),
      email:         "alex@acme.test".into(),
      role:          Role::Admin,
      reports_to:    None,
      password_hash: hash.clone(),
    })
    .await
    .unwrap();
  let manager = store
    .create_user(NewUser {
      org_id:        org.org_id,
      display_name:  "Morgan Manager".into(),
      email:         "morgan@acme.test".into(),
      role:          Role::Manager,
      reports_to:    Some(admin.user_id),
      password_hash: hash.clone(),
    })
    .await
    .unwrap();
  let pilot = store
    .create_user(NewUser {
      org_id:        org.org_id,
      display_name:  "Piper Pilot".into(),
      email:         "piper@acme.test".into(),
      role:          Role::Pilot,
      reports_to:    Some(manager.user_id),
      password_hash: hash,
    })
    .await
    .unwrap();

  let expires = Utc::now() + Duration::hours(1);
  let admin_token = store
    .create_session(admin.user_id, expires)
    .await
    .unwrap()
    .token
    .to_string();
  let manager_token = store
    .create_session(manager.user_id, expires)
    .await
    .unwrap()
    .token
    .to_string();
  let pilot_token = store
    .create_session(pilot.user_id, expires)
    .await
    .unwrap()
    .token
    .to_string();

  let state = AppState {
    store:  Arc::new(store),
    signer: Arc::new(Signer::new(
      b"test-secret".to_vec(),
      "https://storage.acme.test",
    )),
  };

  TestApp {
    router: api_router(state),
    admin_token,
    manager_token,
    pilot_token,
    manager_id: manager.user_id,
    pilot_id: pilot.user_id,
  }
}

fn request(
  method: &str,
  path: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> Request<Body> {
  let mut builder = Request::builder().method(method).uri(path);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
  let response = app.router.clone().oneshot(req).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, value)
}

fn in_one_hour() -> String {
  (Utc::now() + Duration::hours(1)).to_rfc3339()
}

fn in_two_hours() -> String {
  (Utc::now() + Duration::hours(2)).to_rfc3339()
}

async fn create_mission(app: &TestApp, token: &str) -> Uuid {
  let (status, body) = send(
    app,
    request(
      "POST",
      "/missions",
      Some(token),
      Some(json!({
        "name": "Roof survey",
        "site": "Test Range North",
        "pilot_in_command": app.pilot_id,
        "aircraft": "SE-DRN1",
        "scheduled_start": in_one_hour(),
        "scheduled_end": in_two_hours(),
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "mission create: {body}");
  Uuid::parse_str(body["data"]["mission_id"].as_str().unwrap()).unwrap()
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_returns_token_in_envelope() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/auth/login",
      None,
      Some(json!({"email": "piper@acme.test", "password": "hunter2"})),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["code"], 200);
  assert_eq!(body["status"], "ok");
  let token = body["data"]["token"].as_str().unwrap().to_string();
  // password hash never leaves the server
  assert!(body["data"]["user"].get("password_hash").is_none());

  let (status, body) =
    send(&app, request("GET", "/auth/me", Some(&token), None)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["email"], "piper@acme.test");
}

#[tokio::test]
async fn login_wrong_password_is_401() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/auth/login",
      None,
      Some(json!({"email": "piper@acme.test", "password": "wrong"})),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], 401);
  assert_eq!(body["status"], "error");
  assert!(body["data"].is_null());
}

#[tokio::test]
async fn missing_or_bad_token_is_401() {
  let app = test_app().await;

  let (status, _) = send(&app, request("GET", "/missions", None, None)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let bogus = Uuid::new_v4().to_string();
  let (status, _) =
    send(&app, request("GET", "/missions", Some(&bogus), None)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_invalidates_session() {
  let app = test_app().await;

  let (status, _) = send(
    &app,
    request("POST", "/auth/logout", Some(&app.pilot_token), None),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(
    &app,
    request("GET", "/auth/me", Some(&app.pilot_token), None),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ─── Role policy ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn pilot_cannot_administer_users() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request("GET", "/users", Some(&app.pilot_token), None),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["status"], "error");

  let (status, _) = send(
    &app,
    request(
      "POST",
      "/users",
      Some(&app.pilot_token),
      Some(json!({
        "display_name": "Intruder",
        "email": "intruder@acme.test",
        "role": "pilot",
        "password": "hunter2",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_creates_user_duplicate_email_rejected() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/users",
      Some(&app.admin_token),
      Some(json!({
        "display_name": "New Pilot",
        "email": "new@acme.test",
        "role": "pilot",
        "reports_to": app.manager_id,
        "password": "hunter2",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["data"]["role"], "pilot");

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/users",
      Some(&app.admin_token),
      Some(json!({
        "display_name": "Imposter",
        "email": "new@acme.test",
        "role": "pilot",
        "password": "hunter2",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], 400);
}

// ─── Missions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mission_roundtrip() {
  let app = test_app().await;
  let id = create_mission(&app, &app.manager_token).await;

  let (status, body) = send(
    &app,
    request(
      "GET",
      &format!("/missions/{id}"),
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["status"], "planned");

  let (status, body) = send(
    &app,
    request(
      "POST",
      &format!("/missions/{id}/status"),
      Some(&app.manager_token),
      Some(json!({"status": "active"})),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["status"], "active");

  let (status, body) = send(
    &app,
    request(
      "GET",
      "/missions?status=active",
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);

  let (status, _) = send(
    &app,
    request(
      "DELETE",
      &format!("/missions/{id}"),
      Some(&app.manager_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(
    &app,
    request(
      "GET",
      &format!("/missions/{id}"),
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mission_with_inverted_window_is_400() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/missions",
      Some(&app.manager_token),
      Some(json!({
        "name": "Backwards",
        "site": "Test Range North",
        "pilot_in_command": app.pilot_id,
        "aircraft": "SE-DRN1",
        "scheduled_start": in_two_hours(),
        "scheduled_end": in_one_hour(),
      })),
    ),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(
    body["message"]
      .as_str()
      .unwrap()
      .contains("scheduled_end")
  );
}

#[tokio::test]
async fn unknown_mission_is_404() {
  let app = test_app().await;
  let id = Uuid::new_v4();

  let (status, body) = send(
    &app,
    request(
      "GET",
      &format!("/missions/{id}"),
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], 404);
  assert_eq!(body["status"], "error");
}

// ─── Flight logbook ──────────────────────────────────────────────────────────

#[tokio::test]
async fn pilot_logs_own_flight() {
  let app = test_app().await;
  let mission = create_mission(&app, &app.manager_token).await;

  let takeoff = Utc::now() - Duration::minutes(30);
  let (status, body) = send(
    &app,
    request(
      "POST",
      &format!("/missions/{mission}/flights"),
      Some(&app.pilot_token),
      Some(json!({
        "aircraft": "SE-DRN1",
        "takeoff_at": takeoff.to_rfc3339(),
        "landing_at": (takeoff + Duration::minutes(20)).to_rfc3339(),
        "battery_cycles": 1,
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(
    body["data"]["pilot_id"].as_str().unwrap(),
    app.pilot_id.to_string()
  );

  let (status, body) = send(
    &app,
    request(
      "GET",
      &format!("/flights?pilot_id={}", app.pilot_id),
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pilot_cannot_log_for_someone_else() {
  let app = test_app().await;
  let mission = create_mission(&app, &app.manager_token).await;

  let takeoff = Utc::now() - Duration::minutes(30);
  let (status, _) = send(
    &app,
    request(
      "POST",
      &format!("/missions/{mission}/flights"),
      Some(&app.pilot_token),
      Some(json!({
        "pilot_id": app.manager_id,
        "aircraft": "SE-DRN1",
        "takeoff_at": takeoff.to_rfc3339(),
        "landing_at": (takeoff + Duration::minutes(20)).to_rfc3339(),
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

// ─── Shifts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn shift_patch_keeps_window_ordered() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/shifts",
      Some(&app.manager_token),
      Some(json!({
        "user_id": app.pilot_id,
        "role_label": "Duty pilot",
        "starts_at": in_one_hour(),
        "ends_at": in_two_hours(),
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  let id = body["data"]["shift_id"].as_str().unwrap().to_string();

  // Moving only ends_at behind the stored starts_at must be rejected.
  let (status, body) = send(
    &app,
    request(
      "PATCH",
      &format!("/shifts/{id}"),
      Some(&app.manager_token),
      Some(json!({
        "ends_at": (Utc::now() - Duration::hours(1)).to_rfc3339(),
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().contains("ends_at"));

  // Same for moving only starts_at past the stored ends_at.
  let (status, _) = send(
    &app,
    request(
      "PATCH",
      &format!("/shifts/{id}"),
      Some(&app.manager_token),
      Some(json!({
        "starts_at": (Utc::now() + Duration::hours(3)).to_rfc3339(),
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  // A single-ended move that keeps the order goes through.
  let (status, body) = send(
    &app,
    request(
      "PATCH",
      &format!("/shifts/{id}"),
      Some(&app.manager_token),
      Some(json!({
        "ends_at": (Utc::now() + Duration::hours(4)).to_rfc3339(),
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn document_create_mints_upload_url() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/documents",
      Some(&app.manager_token),
      Some(json!({
        "title": "Ops manual",
        "category": "manuals",
        "file_name": "ops-manual.pdf",
        "media_type": "application/pdf",
        "size_bytes": 1048576,
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");

  let upload_url = body["data"]["upload"]["url"].as_str().unwrap();
  assert!(upload_url.starts_with("https://storage.acme.test/"));
  assert!(upload_url.contains("method=PUT"));
  assert!(upload_url.contains("&sig="));

  let id = body["data"]["document"]["document_id"].as_str().unwrap();
  let (status, body) = send(
    &app,
    request(
      "GET",
      &format!("/documents/{id}/download"),
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert!(
    body["data"]["url"]
      .as_str()
      .unwrap()
      .contains("method=GET")
  );
}

#[tokio::test]
async fn document_with_path_in_file_name_is_400() {
  let app = test_app().await;

  let (status, _) = send(
    &app,
    request(
      "POST",
      "/documents",
      Some(&app.manager_token),
      Some(json!({
        "title": "Sneaky",
        "category": "manuals",
        "file_name": "../../etc/passwd",
        "media_type": "text/plain",
        "size_bytes": 1,
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Notifications ───────────────────────────────────────────────────────────

#[tokio::test]
async fn notification_flow() {
  let app = test_app().await;

  let (status, _) = send(
    &app,
    request(
      "POST",
      "/notifications",
      Some(&app.manager_token),
      Some(json!({
        "user_id": app.pilot_id,
        "kind": "ticket",
        "body": "Grounding ticket opened on SE-DRN1",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(
    &app,
    request(
      "GET",
      "/notifications?unread_only=true",
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);

  let (status, body) = send(
    &app,
    request(
      "POST",
      "/notifications/read_all",
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["updated"], 1);
}

#[tokio::test]
async fn pilot_cannot_send_notifications() {
  let app = test_app().await;

  let (status, _) = send(
    &app,
    request(
      "POST",
      "/notifications",
      Some(&app.pilot_token),
      Some(json!({
        "user_id": app.manager_id,
        "kind": "prank",
        "body": "you're grounded",
      })),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

// ─── KPIs and dashboard ──────────────────────────────────────────────────────

#[tokio::test]
async fn kpi_upsert_requires_manager_and_valid_period() {
  let app = test_app().await;

  let (status, _) = send(
    &app,
    request(
      "PUT",
      "/kpis",
      Some(&app.pilot_token),
      Some(json!({"name": "incident_rate", "period": "2026-08", "value": 0.2})),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, _) = send(
    &app,
    request(
      "PUT",
      "/kpis",
      Some(&app.manager_token),
      Some(json!({"name": "incident_rate", "period": "August", "value": 0.2})),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) = send(
    &app,
    request(
      "PUT",
      "/kpis",
      Some(&app.manager_token),
      Some(json!({"name": "incident_rate", "period": "2026-08", "value": 0.2})),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["name"], "incident_rate");

  let (status, body) = send(
    &app,
    request(
      "GET",
      "/kpis?period=2026-08",
      Some(&app.pilot_token),
      None,
    ),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn dashboard_reports_counts() {
  let app = test_app().await;
  create_mission(&app, &app.manager_token).await;

  let (status, body) = send(
    &app,
    request("GET", "/dashboard", Some(&app.manager_token), None),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["missions"]["planned"], 1);
  assert_eq!(body["data"]["open_tickets"], 0);
  assert!(body["data"]["kpis"].as_array().unwrap().is_empty());
}

// ─── Org chart ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn orgchart_nests_reporting_lines() {
  let app = test_app().await;

  let (status, body) = send(
    &app,
    request("GET", "/orgchart", Some(&app.pilot_token), None),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let roots = body["data"].as_array().unwrap();
  assert_eq!(roots.len(), 1);
  assert_eq!(roots[0]["display_name"], "Alex Admin");
  assert_eq!(roots[0]["reports"][0]["display_name"], "Morgan Manager");
  assert_eq!(
    roots[0]["reports"][0]["reports"][0]["display_name"],
    "Piper Pilot"
  );
}
