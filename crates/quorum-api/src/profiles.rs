//! Handlers for profile endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profiles/:id` | 404 if not found |
//! | `GET`  | `/me/profile` | Signed in; 404 until a profile is saved |
//! | `PUT`  | `/me/profile` | Signed in. Body: `{"username":"…","full_name":…,"avatar_url":…}` |

use std::sync::Arc;

use axum::{Json, extract::State};
use quorum_core::identity::{Profile, ProfileUpdate};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Backend,
  error::ApiError,
  extract::{JsonBody, Path},
  viewer::SignedIn,
};

async fn fetch<S: Backend>(store: &S, id: Uuid) -> Result<Profile, ApiError> {
  store
    .get_profile(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))
}

/// `GET /profiles/:id`
pub async fn get_one<S: Backend>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
  Ok(Json(fetch(&*store, id).await?))
}

/// `GET /me/profile`
pub async fn me<S: Backend>(
  State(store): State<Arc<S>>,
  SignedIn(me): SignedIn,
) -> Result<Json<Profile>, ApiError> {
  Ok(Json(fetch(&*store, me).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub username:   String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
}

/// `PUT /me/profile`: creates the profile on first save.
pub async fn update_me<S: Backend>(
  State(store): State<Arc<S>>,
  SignedIn(me): SignedIn,
  JsonBody(body): JsonBody<UpdateBody>,
) -> Result<Json<Profile>, ApiError> {
  let update =
    ProfileUpdate::new(me, &body.username, body.full_name, body.avatar_url)?;
  let profile = store
    .upsert_profile(update)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(profile))
}
