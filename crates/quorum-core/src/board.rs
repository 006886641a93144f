//! Board read models and the operations that return them.
//!
//! Every read is made on behalf of a viewer (`None` when signed out) and
//! every mutation returns freshly recomputed state, so callers never have to
//! patch cached aggregates themselves.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  comment::NewComment,
  feature::{Feature, NewFeature},
  identity::{Identity, resolve_identities},
  store::{BoardStore, FeatureQuery, ProfileDirectory},
  tally::Tally,
  thread::{ThreadEntry, assemble_thread},
  vote::{Direction, Vote, VoteOutcome},
};

// ─── Read models ─────────────────────────────────────────────────────────────

/// A feature as shown in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSummary {
  pub feature:       Feature,
  pub author:        Identity,
  pub tally:         Tally,
  pub comment_count: u64,
}

/// A feature with its full discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDetail {
  pub feature: Feature,
  pub author:  Identity,
  pub tally:   Tally,
  pub thread:  Vec<ThreadEntry>,
}

/// The result of casting a vote: what was written, and the tally after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
  #[serde(flatten)]
  pub outcome: VoteOutcome,
  pub tally:   Tally,
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// The viewer-specific tally of `feature_id`. Unknown features score `0`.
pub async fn tally<S: BoardStore>(
  store: &S,
  feature_id: Uuid,
  viewer: Option<Uuid>,
) -> Result<Tally, S::Error> {
  let votes = store.list_votes(feature_id).await?;
  Ok(Tally::compute(&votes, viewer))
}

/// Summaries of the features matching `query`, newest first.
///
/// Costs a fixed number of store round trips regardless of page size.
pub async fn list_features<S, D>(
  store: &S,
  directory: &D,
  query: &FeatureQuery,
  viewer: Option<Uuid>,
) -> Result<Vec<FeatureSummary>, S::Error>
where
  S: BoardStore,
  D: ProfileDirectory,
{
  let features = store.list_features(query).await?;
  if features.is_empty() {
    return Ok(Vec::new());
  }
  let ids: Vec<Uuid> = features.iter().map(|f| f.feature_id).collect();

  let mut votes: HashMap<Uuid, Vec<Vote>> = HashMap::new();
  for vote in store.list_votes_for(&ids).await? {
    votes.entry(vote.feature_id).or_default().push(vote);
  }
  let comment_counts = store.count_comments_for(&ids).await?;
  let authors =
    resolve_identities(directory, features.iter().map(|f| f.author_id)).await;

  Ok(
    features
      .into_iter()
      .map(|feature| {
        let id = feature.feature_id;
        FeatureSummary {
          author: authors.get(feature.author_id),
          tally: Tally::compute(
            votes.get(&id).map_or(&[][..], Vec::as_slice),
            viewer,
          ),
          comment_count: comment_counts.get(&id).copied().unwrap_or(0),
          feature,
        }
      })
      .collect(),
  )
}

/// The full detail view of one feature, or `None` if it does not exist.
pub async fn feature_detail<S, D>(
  store: &S,
  directory: &D,
  feature_id: Uuid,
  viewer: Option<Uuid>,
) -> Result<Option<FeatureDetail>, S::Error>
where
  S: BoardStore,
  D: ProfileDirectory,
{
  let Some(feature) = store.get_feature(feature_id).await? else {
    return Ok(None);
  };

  let tally = tally(store, feature_id, viewer).await?;
  let thread = assemble_thread(store, directory, feature_id).await?;
  let author = resolve_identities(directory, [feature.author_id])
    .await
    .get(feature.author_id);

  Ok(Some(FeatureDetail { feature, author, tally, thread }))
}

// ─── Mutations ───────────────────────────────────────────────────────────────

/// Persist a validated submission.
pub async fn submit_feature<S: BoardStore>(
  store: &S,
  input: NewFeature,
) -> Result<Feature, S::Error> {
  let feature = store.submit_feature(input).await?;
  tracing::info!(feature_id = %feature.feature_id, "feature submitted");
  Ok(feature)
}

/// Apply `direction` for `voter` and return the recomputed tally.
///
/// The tally is re-read after the write; it is never patched from the
/// outcome.
pub async fn cast_vote<S: BoardStore>(
  store: &S,
  feature_id: Uuid,
  voter: Uuid,
  direction: Direction,
) -> Result<VoteReceipt, S::Error> {
  let outcome = store.apply_vote(feature_id, voter, direction).await?;
  let tally = tally(store, feature_id, Some(voter)).await?;
  Ok(VoteReceipt { outcome, tally })
}

/// Append a comment and return it with its author resolved.
pub async fn post_comment<S, D>(
  store: &S,
  directory: &D,
  input: NewComment,
) -> Result<ThreadEntry, S::Error>
where
  S: BoardStore,
  D: ProfileDirectory,
{
  let comment = store.add_comment(input).await?;
  let author = resolve_identities(directory, [comment.author_id])
    .await
    .get(comment.author_id);
  Ok(ThreadEntry { comment, author })
}
