//! JSON REST API for Aerobase.
//!
//! Exposes an axum [`Router`] backed by any [`aerobase_core::store::OpsStore`].
//! Every endpoint except `POST /auth/login` requires a bearer session token;
//! all responses use the `{code, status, message, data}` envelope.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", aerobase_api::api_router(state))
//! ```

pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod envelope;
pub mod error;
pub mod flights;
pub mod missions;
pub mod notifications;
pub mod orgchart;
pub mod presign;
pub mod procedures;
pub mod shifts;
pub mod tickets;
pub mod users;
pub mod validate;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use aerobase_core::store::OpsStore;
use axum::{
  Router,
  routing::{get, post},
};

pub use error::ApiError;
pub use presign::Signer;

/// Shared state handed to every handler.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub signer: Arc<Signer>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      signer: Arc::clone(&self.signer),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: OpsStore + 'static,
{
  Router::new()
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/logout", post(auth::logout::<S>))
    .route("/auth/me", get(auth::me::<S>))
    // Missions
    .route(
      "/missions",
      get(missions::list::<S>).post(missions::create::<S>),
    )
    .route(
      "/missions/{id}",
      get(missions::get_one::<S>)
        .patch(missions::update::<S>)
        .delete(missions::delete::<S>),
    )
    .route("/missions/{id}/status", post(missions::set_status::<S>))
    // Flight logbook
    .route(
      "/missions/{id}/flights",
      get(flights::list_for_mission::<S>).post(flights::create::<S>),
    )
    .route("/flights", get(flights::list::<S>))
    // Maintenance tickets
    .route("/tickets", get(tickets::list::<S>).post(tickets::create::<S>))
    .route(
      "/tickets/{id}",
      get(tickets::get_one::<S>).patch(tickets::update::<S>),
    )
    .route("/tickets/{id}/status", post(tickets::set_status::<S>))
    // Shifts
    .route("/shifts", get(shifts::list::<S>).post(shifts::create::<S>))
    .route(
      "/shifts/{id}",
      axum::routing::patch(shifts::update::<S>).delete(shifts::delete::<S>),
    )
    // Documents
    .route(
      "/documents",
      get(documents::list::<S>).post(documents::create::<S>),
    )
    .route(
      "/documents/{id}",
      get(documents::get_one::<S>).delete(documents::delete::<S>),
    )
    .route("/documents/{id}/status", post(documents::set_status::<S>))
    .route("/documents/{id}/download", get(documents::download::<S>))
    // Notifications
    .route(
      "/notifications",
      get(notifications::list::<S>).post(notifications::create::<S>),
    )
    .route(
      "/notifications/{id}/read",
      post(notifications::mark_read::<S>),
    )
    .route(
      "/notifications/read_all",
      post(notifications::mark_all_read::<S>),
    )
    // LUC procedures
    .route(
      "/procedures",
      get(procedures::list::<S>).post(procedures::create::<S>),
    )
    .route(
      "/procedures/{id}",
      get(procedures::get_one::<S>).patch(procedures::update::<S>),
    )
    .route("/procedures/{id}/status", post(procedures::set_status::<S>))
    // Org chart and users
    .route("/orgchart", get(orgchart::get_chart::<S>))
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    // Dashboard and KPIs
    .route("/dashboard", get(dashboard::summary::<S>))
    .route(
      "/kpis",
      get(dashboard::list_kpis::<S>).put(dashboard::upsert_kpi::<S>),
    )
    .with_state(state)
}
