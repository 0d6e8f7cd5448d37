//! Document repository metadata.
//!
//! The store holds metadata only. Binary content lives in object storage,
//! addressed by `storage_key`; the API layer mints presigned upload and
//! download URLs against that key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
  Draft,
  Published,
  Archived,
}

/// Metadata for one stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub document_id: Uuid,
  pub org_id:      Uuid,
  pub title:       String,
  /// Free-text grouping, e.g. "manuals", "insurance", "checklists".
  pub category:    String,
  /// Object-storage key; the only handle to the binary content.
  pub storage_key: String,
  pub media_type:  String,
  pub size_bytes:  u64,
  pub status:      DocumentStatus,
  pub uploaded_by: Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deleted_at:  Option<DateTime<Utc>>,
}

/// Input to [`crate::store::OpsStore::create_document`].
/// New documents always start as [`DocumentStatus::Draft`].
#[derive(Debug, Clone)]
pub struct NewDocument {
  pub org_id:      Uuid,
  pub title:       String,
  pub category:    String,
  pub storage_key: String,
  pub media_type:  String,
  pub size_bytes:  u64,
  pub uploaded_by: Uuid,
}
