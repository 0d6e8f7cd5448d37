//! SQL schema for the Aerobase SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS orgs (
    org_id      TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    org_id        TEXT NOT NULL REFERENCES orgs(org_id),
    display_name  TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    role          TEXT NOT NULL,   -- 'admin' | 'manager' | 'pilot'
    reports_to    TEXT REFERENCES users(user_id),
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    active        INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token       TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    expires_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS missions (
    mission_id       TEXT PRIMARY KEY,
    org_id           TEXT NOT NULL REFERENCES orgs(org_id),
    name             TEXT NOT NULL,
    site             TEXT NOT NULL,
    pilot_in_command TEXT NOT NULL REFERENCES users(user_id),
    aircraft         TEXT NOT NULL,
    status           TEXT NOT NULL,   -- 'planned'..'aborted'
    scheduled_start  TEXT NOT NULL,   -- ISO 8601 UTC
    scheduled_end    TEXT NOT NULL,
    notes            TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    deleted_at       TEXT             -- soft delete marker
);

-- Flight logbook entries are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS flight_logs (
    log_id         TEXT PRIMARY KEY,
    org_id         TEXT NOT NULL REFERENCES orgs(org_id),
    mission_id     TEXT NOT NULL REFERENCES missions(mission_id),
    pilot_id       TEXT NOT NULL REFERENCES users(user_id),
    aircraft       TEXT NOT NULL,
    takeoff_at     TEXT NOT NULL,
    landing_at     TEXT NOT NULL,
    battery_cycles INTEGER,
    remarks        TEXT,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tickets (
    ticket_id   TEXT PRIMARY KEY,
    org_id      TEXT NOT NULL REFERENCES orgs(org_id),
    aircraft    TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    status      TEXT NOT NULL,   -- 'open' | 'in_progress' | 'resolved' | 'closed'
    priority    TEXT NOT NULL,   -- 'low' | 'normal' | 'high' | 'grounding'
    assignee    TEXT REFERENCES users(user_id),
    created_by  TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shifts (
    shift_id    TEXT PRIMARY KEY,
    org_id      TEXT NOT NULL REFERENCES orgs(org_id),
    user_id     TEXT NOT NULL REFERENCES users(user_id),
    role_label  TEXT NOT NULL,
    starts_at   TEXT NOT NULL,
    ends_at     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    document_id TEXT PRIMARY KEY,
    org_id      TEXT NOT NULL REFERENCES orgs(org_id),
    title       TEXT NOT NULL,
    category    TEXT NOT NULL,
    storage_key TEXT NOT NULL,
    media_type  TEXT NOT NULL,
    size_bytes  INTEGER NOT NULL,
    status      TEXT NOT NULL,   -- 'draft' | 'published' | 'archived'
    uploaded_by TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    deleted_at  TEXT             -- soft delete marker
);

CREATE TABLE IF NOT EXISTS notifications (
    notification_id TEXT PRIMARY KEY,
    org_id          TEXT NOT NULL REFERENCES orgs(org_id),
    user_id         TEXT NOT NULL REFERENCES users(user_id),
    kind            TEXT NOT NULL,
    body            TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    read_at         TEXT
);

CREATE TABLE IF NOT EXISTS procedures (
    procedure_id TEXT PRIMARY KEY,
    org_id       TEXT NOT NULL REFERENCES orgs(org_id),
    code         TEXT NOT NULL,
    title        TEXT NOT NULL,
    revision     INTEGER NOT NULL,
    status       TEXT NOT NULL,  -- 'draft' | 'in_review' | 'approved' | 'retired'
    owner        TEXT REFERENCES users(user_id),
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS kpis (
    kpi_id      TEXT PRIMARY KEY,
    org_id      TEXT NOT NULL REFERENCES orgs(org_id),
    name        TEXT NOT NULL,
    period      TEXT NOT NULL,   -- 'YYYY-MM'
    value       REAL NOT NULL,
    target      REAL,
    recorded_at TEXT NOT NULL,
    UNIQUE (org_id, name, period)
);

CREATE INDEX IF NOT EXISTS users_org_idx          ON users(org_id);
CREATE INDEX IF NOT EXISTS sessions_user_idx      ON sessions(user_id);
CREATE INDEX IF NOT EXISTS missions_org_idx       ON missions(org_id);
CREATE INDEX IF NOT EXISTS missions_status_idx    ON missions(org_id, status);
CREATE INDEX IF NOT EXISTS flight_logs_org_idx    ON flight_logs(org_id);
CREATE INDEX IF NOT EXISTS flight_logs_mission_idx ON flight_logs(mission_id);
CREATE INDEX IF NOT EXISTS tickets_org_idx        ON tickets(org_id);
CREATE INDEX IF NOT EXISTS shifts_org_idx         ON shifts(org_id);
CREATE INDEX IF NOT EXISTS documents_org_idx      ON documents(org_id);
CREATE INDEX IF NOT EXISTS notifications_user_idx ON notifications(org_id, user_id);
CREATE INDEX IF NOT EXISTS procedures_org_idx     ON procedures(org_id);

PRAGMA user_version = 1;
";
