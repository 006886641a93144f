//! The `BoardStore` and `ProfileDirectory` traits and supporting query types.
//!
//! Both traits are implemented by storage backends (e.g.
//! `quorum-store-sqlite`). Higher layers (`quorum-api`, the board read models
//! in this crate) depend on these abstractions, not on any concrete backend.

use std::{collections::HashMap, future::Future};

use uuid::Uuid;

use crate::{
  comment::{Comment, NewComment},
  feature::{Feature, FeatureStatus, NewFeature},
  identity::{Profile, ProfileUpdate},
  vote::{Direction, Vote, VoteOutcome},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`BoardStore::list_features`]. Results are ordered newest
/// first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureQuery {
  /// Restrict to features submitted by this user.
  pub author: Option<Uuid>,
  pub status: Option<FeatureStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

impl FeatureQuery {
  /// The `limit` most recently submitted features.
  pub fn recent(limit: usize) -> Self {
    Self { limit: Some(limit), ..Self::default() }
  }

  /// Every feature submitted by `author`.
  pub fn by_author(author: Uuid) -> Self {
    Self { author: Some(author), ..Self::default() }
  }
}

// ─── Board store ─────────────────────────────────────────────────────────────

/// Persistence for features, votes and comments.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BoardStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Features ──────────────────────────────────────────────────────────

  /// Persist a new feature with status [`FeatureStatus::Pending`].
  fn submit_feature(
    &self,
    input: NewFeature,
  ) -> impl Future<Output = Result<Feature, Self::Error>> + Send + '_;

  /// Retrieve a feature by id. Returns `None` if not found.
  fn get_feature(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Feature>, Self::Error>> + Send + '_;

  /// List features matching `query`, newest first.
  fn list_features<'a>(
    &'a self,
    query: &'a FeatureQuery,
  ) -> impl Future<Output = Result<Vec<Feature>, Self::Error>> + Send + 'a;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Apply `direction` on behalf of `voter_id` following
  /// [`VoteTransition::decide`](crate::vote::VoteTransition::decide).
  ///
  /// Performs exactly one write (insert, update or delete). Implementations
  /// must guarantee that concurrent calls for the same `(feature_id,
  /// voter_id)` never leave more than one vote behind.
  fn apply_vote(
    &self,
    feature_id: Uuid,
    voter_id: Uuid,
    direction: Direction,
  ) -> impl Future<Output = Result<VoteOutcome, Self::Error>> + Send + '_;

  /// The vote `voter_id` holds on `feature_id`, if any.
  fn get_vote(
    &self,
    feature_id: Uuid,
    voter_id: Uuid,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send + '_;

  /// Every vote on `feature_id`. An unknown feature yields an empty list.
  fn list_votes(
    &self,
    feature_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + '_;

  /// Every vote on any of `feature_ids`, fetched in one round trip.
  fn list_votes_for<'a>(
    &'a self,
    feature_ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + 'a;

  // ── Comments — append-only ────────────────────────────────────────────

  /// Append a comment. `created_at` is set by the store.
  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// Comments on `feature_id` ordered by `created_at` ascending, insertion
  /// order breaking ties.
  fn list_comments(
    &self,
    feature_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  fn count_comments(
    &self,
    feature_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Comment counts for `feature_ids` in one round trip. Features without
  /// comments are absent from the map.
  fn count_comments_for<'a>(
    &'a self,
    feature_ids: &'a [Uuid],
  ) -> impl Future<Output = Result<HashMap<Uuid, u64>, Self::Error>> + Send + 'a;
}

// ─── Profile directory ───────────────────────────────────────────────────────

/// Lookup of user profiles by id.
pub trait ProfileDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a profile by user id. Returns `None` if not found.
  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Batch lookup. Ids without a profile are simply absent from the result.
  fn get_profiles<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + 'a;

  /// Create the profile for `update.id`, or overwrite its mutable fields.
  fn upsert_profile(
    &self,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;
}
