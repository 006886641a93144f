//! Handlers for `/features/:id/comments`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/features/:id/comments` | Oldest first; empty for unknown features |
//! | `POST` | `/features/:id/comments` | Signed in. Body: `{"content":"…"}`; 404 if the feature is missing |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use quorum_core::{
  board,
  comment::NewComment,
  thread::{ThreadEntry, assemble_thread},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Backend,
  error::ApiError,
  extract::{JsonBody, Path},
  viewer::SignedIn,
};

/// `GET /features/:id/comments`
pub async fn list<S: Backend>(
  State(store): State<Arc<S>>,
  Path(feature_id): Path<Uuid>,
) -> Result<Json<Vec<ThreadEntry>>, ApiError> {
  let thread = assemble_thread(&*store, &*store, feature_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(thread))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content: String,
}

/// `POST /features/:id/comments`: returns 201 + the new thread entry.
pub async fn create<S: Backend>(
  State(store): State<Arc<S>>,
  SignedIn(author): SignedIn,
  Path(feature_id): Path<Uuid>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewComment::new(feature_id, author, &body.content)?;

  store
    .get_feature(feature_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("feature {feature_id} not found")))?;

  let entry = board::post_comment(&*store, &*store, input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(entry)))
}
