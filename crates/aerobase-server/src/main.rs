//! Aerobase server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens an
//! in-process SQLite store, and serves the fleet-operations API under
//! `/api`.
//!
//! # First-run bootstrap
//!
//! The `/users` endpoint is admin-only, so the very first org and its admin
//! are created from the command line:
//!
//! ```text
//! aerobase-server --init-org "Acme Aerial" --admin-email ops@acme.example
//! ```
//!
//! The admin password is read from stdin.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use aerobase_api::{AppState, Signer, api_router, auth};
use aerobase_core::{
  org::{NewUser, Role},
  store::OpsStore,
};
use aerobase_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Aerobase fleet operations server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Create an org with this name plus its first admin user, then exit.
  #[arg(long, value_name = "NAME")]
  init_org: Option<String>,

  /// Email for the bootstrap admin (with `--init-org`).
  #[arg(long, value_name = "EMAIL")]
  admin_email: Option<String>,

  /// Display name for the bootstrap admin (with `--init-org`).
  #[arg(long, value_name = "NAME", default_value = "Admin")]
  admin_name: String,
}

/// Server configuration, from `config.toml` and `AEROBASE_*` environment
/// variables.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:             String,
  #[serde(default = "default_port")]
  port:             u16,
  #[serde(default = "default_store_path")]
  store_path:       PathBuf,
  /// Base URL of the object storage fronting presigned document URLs.
  storage_base_url: String,
  /// Shared secret the presigned-URL signatures are keyed with.
  signing_secret:   String,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 4180 }
fn default_store_path() -> PathBuf { PathBuf::from("aerobase.db") }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    println!("{}", auth::hash_password(&password)?);
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AEROBASE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: create the first org and admin, then exit.
  if let Some(org_name) = cli.init_org {
    let email = cli
      .admin_email
      .context("--init-org requires --admin-email")?;
    bootstrap(&store, org_name, email, cli.admin_name).await?;
    return Ok(());
  }

  let state = AppState {
    store:  Arc::new(store),
    signer: Arc::new(Signer::new(
      server_cfg.signing_secret.clone().into_bytes(),
      &server_cfg.storage_base_url,
    )),
  };

  let app = axum::Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Create an org and its first admin user.
async fn bootstrap(
  store: &SqliteStore,
  org_name: String,
  admin_email: String,
  admin_name: String,
) -> anyhow::Result<()> {
  let password = read_password()?;
  let password_hash = auth::hash_password(&password)?;

  let org = store
    .create_org(org_name)
    .await
    .context("failed to create org")?;
  let admin = store
    .create_user(NewUser {
      org_id: org.org_id,
      display_name: admin_name,
      email: admin_email,
      role: Role::Admin,
      reports_to: None,
      password_hash,
    })
    .await
    .context("failed to create admin user")?;

  tracing::info!(
    org_id = %org.org_id,
    user_id = %admin.user_id,
    email = %admin.email,
    "bootstrap complete"
  );
  println!("org {} created; admin is {}", org.org_id, admin.email);
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
