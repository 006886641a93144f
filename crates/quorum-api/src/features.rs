//! Handlers for `/features` and `/me/features` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/features` | Optional `?author`, `status`, `limit`, `offset` |
//! | `POST` | `/features` | Signed in. Body: `{"title":"…","description":"…"}` |
//! | `GET`  | `/features/:id` | Detail with thread; 404 if not found |
//! | `GET`  | `/features/:id/tally` | Score and the viewer's own vote |
//! | `POST` | `/features/:id/vote` | Signed in. Body: `{"direction":1}` or `-1` |
//! | `GET`  | `/me/features` | Signed in. The caller's own submissions |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use quorum_core::{
  board::{self, FeatureDetail, FeatureSummary, VoteReceipt},
  feature::{FeatureStatus, NewFeature},
  store::FeatureQuery,
  tally::Tally,
  vote::Direction,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Backend,
  error::ApiError,
  extract::{JsonBody, Path, Query},
  viewer::{SignedIn, Viewer},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub author: Option<Uuid>,
  pub status: Option<FeatureStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

impl From<ListParams> for FeatureQuery {
  fn from(p: ListParams) -> Self {
    FeatureQuery {
      author: p.author,
      status: p.status,
      limit:  p.limit,
      offset: p.offset,
    }
  }
}

/// `GET /features[?author=…][&status=…][&limit=…][&offset=…]`
pub async fn list<S: Backend>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<FeatureSummary>>, ApiError> {
  let query = FeatureQuery::from(params);
  let summaries = board::list_features(&*store, &*store, &query, viewer)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(summaries))
}

/// `GET /me/features`
pub async fn mine<S: Backend>(
  State(store): State<Arc<S>>,
  SignedIn(me): SignedIn,
) -> Result<Json<Vec<FeatureSummary>>, ApiError> {
  let query = FeatureQuery::by_author(me);
  let summaries = board::list_features(&*store, &*store, &query, Some(me))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(summaries))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:       String,
  pub description: String,
}

/// `POST /features`: returns 201 + the stored feature.
pub async fn create<S: Backend>(
  State(store): State<Arc<S>>,
  SignedIn(author): SignedIn,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewFeature::new(author, &body.title, &body.description)?;
  let feature = board::submit_feature(&*store, input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(feature)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /features/:id`
pub async fn get_one<S: Backend>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<FeatureDetail>, ApiError> {
  let detail = board::feature_detail(&*store, &*store, id, viewer)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("feature {id} not found")))?;
  Ok(Json(detail))
}

/// `GET /features/:id/tally`: an unknown feature scores zero.
pub async fn tally<S: Backend>(
  State(store): State<Arc<S>>,
  Viewer(viewer): Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<Tally>, ApiError> {
  let tally = board::tally(&*store, id, viewer)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(tally))
}

// ─── Vote ─────────────────────────────────────────────────────────────────────

/// Accepts a raw integer so that anything but `1` / `-1` is a 400 with a
/// useful message rather than a generic deserialisation failure.
#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub direction: i64,
}

/// `POST /features/:id/vote`: returns what was written and the new tally.
pub async fn vote<S: Backend>(
  State(store): State<Arc<S>>,
  SignedIn(voter): SignedIn,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<VoteBody>,
) -> Result<Json<VoteReceipt>, ApiError> {
  let direction = Direction::try_from(body.direction)?;

  store
    .get_feature(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("feature {id} not found")))?;

  let receipt = board::cast_vote(&*store, id, voter, direction)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(feature_id = %id, %voter, score = receipt.tally.score, "vote cast");
  Ok(Json(receipt))
}
