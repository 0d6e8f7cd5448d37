//! Error type for `aerobase-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  Decode(String),

  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("mission not found: {0}")]
  MissionNotFound(Uuid),

  #[error("ticket not found: {0}")]
  TicketNotFound(Uuid),

  #[error("shift not found: {0}")]
  ShiftNotFound(Uuid),

  #[error("document not found: {0}")]
  DocumentNotFound(Uuid),

  #[error("notification not found: {0}")]
  NotificationNotFound(Uuid),

  #[error("procedure not found: {0}")]
  ProcedureNotFound(Uuid),
}

impl aerobase_core::store::StoreError for Error {
  // "No such row" errors; the API layer maps these to 404 instead of 500.
  fn is_not_found(&self) -> bool {
    matches!(
      self,
      Error::MissionNotFound(_)
        | Error::TicketNotFound(_)
        | Error::ShiftNotFound(_)
        | Error::DocumentNotFound(_)
        | Error::NotificationNotFound(_)
        | Error::ProcedureNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
