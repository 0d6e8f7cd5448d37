//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message delivered to one user. `read_at` stays null until the user
/// acknowledges it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub notification_id: Uuid,
  pub org_id:          Uuid,
  pub user_id:         Uuid,
  /// Free-text tag for the originating feature, e.g. "ticket", "mission".
  pub kind:            String,
  pub body:            String,
  pub created_at:      DateTime<Utc>,
  pub read_at:         Option<DateTime<Utc>>,
}

impl Notification {
  pub fn is_unread(&self) -> bool { self.read_at.is_none() }
}

/// Input to [`crate::store::OpsStore::create_notification`].
#[derive(Debug, Clone)]
pub struct NewNotification {
  pub org_id:  Uuid,
  pub user_id: Uuid,
  pub kind:    String,
  pub body:    String,
}
