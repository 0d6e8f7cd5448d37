//! Handlers for `/documents` — the document repository.
//!
//! Only metadata lives in the store. Creating a document mints a presigned
//! upload URL for the blob; downloading mints a presigned download URL.
//! Neither the blob nor its bytes ever pass through this service.

use aerobase_core::{
  document::{Document, DocumentStatus, NewDocument},
  store::{DocumentQuery, OpsStore},
};
use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::CurrentUser,
  envelope,
  error::ApiError,
  presign::{DOWNLOAD_TTL_MINUTES, PresignedUrl, UPLOAD_TTL_MINUTES},
  validate,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
  pub status:   Option<DocumentStatus>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /documents`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let documents = state
    .store
    .list_documents(current.org_id(), DocumentQuery {
      category: params.category,
      status:   params.status,
      limit:    params.limit,
      offset:   params.offset,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(documents))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:      String,
  pub category:   String,
  pub file_name:  String,
  pub media_type: String,
  pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct CreatedDocument {
  pub document: Document,
  pub upload:   PresignedUrl,
}

/// `POST /documents` — registers metadata and mints the upload URL.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  validate::non_empty("title", &body.title)?;
  validate::non_empty("category", &body.category)?;
  validate::non_empty("media_type", &body.media_type)?;
  validate::file_name(&body.file_name)?;
  validate::positive_size(body.size_bytes)?;

  // Key layout: org / fresh uuid / original file name. The uuid segment
  // keeps re-uploads of the same file name from colliding.
  let storage_key = format!(
    "{}/{}/{}",
    current.org_id(),
    Uuid::new_v4(),
    body.file_name
  );

  let document = state
    .store
    .create_document(NewDocument {
      org_id:      current.org_id(),
      title:       body.title,
      category:    body.category,
      storage_key,
      media_type:  body.media_type,
      size_bytes:  body.size_bytes,
      uploaded_by: current.user.user_id,
    })
    .await
    .map_err(ApiError::from_store)?;

  let upload = state.signer.presigned_url(
    "PUT",
    &document.storage_key,
    Duration::minutes(UPLOAD_TTL_MINUTES),
    Utc::now(),
  );

  Ok(envelope::created(CreatedDocument { document, upload }))
}

/// `GET /documents/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let document = state
    .store
    .get_document(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  Ok(envelope::ok(document))
}

/// `GET /documents/:id/download` — mints a short-lived download URL.
pub async fn download<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let document = state
    .store
    .get_document(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;

  let download = state.signer.presigned_url(
    "GET",
    &document.storage_key,
    Duration::minutes(DOWNLOAD_TTL_MINUTES),
    Utc::now(),
  );
  Ok(envelope::ok(download))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: DocumentStatus,
}

/// `POST /documents/:id/status`
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let document = state
    .store
    .set_document_status(current.org_id(), id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(document))
}

/// `DELETE /documents/:id` — soft delete; the blob stays in object storage.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  state
    .store
    .delete_document(current.org_id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok_message("document deleted"))
}
