//! Vote aggregation. Pure functions over a feature's vote records.
//!
//! Nothing here deduplicates by voter; uniqueness is the store's job.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vote::{Direction, Vote};

/// Net score: the sum of every vote's direction. An empty set scores `0`.
pub fn compute_score<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> i64 {
  votes.into_iter().map(|v| v.direction.value()).sum()
}

/// The direction of `viewer`'s own vote, if they are signed in and have one.
pub fn viewer_state<'a>(
  votes: impl IntoIterator<Item = &'a Vote>,
  viewer: Option<Uuid>,
) -> Option<Direction> {
  let viewer = viewer?;
  votes
    .into_iter()
    .find(|v| v.voter_id == viewer)
    .map(|v| v.direction)
}

/// The aggregate shown next to a feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
  pub score:       i64,
  pub upvotes:     u64,
  pub downvotes:   u64,
  /// `None` for anonymous viewers and viewers who have not voted.
  pub viewer_vote: Option<Direction>,
}

impl Tally {
  pub fn compute(votes: &[Vote], viewer: Option<Uuid>) -> Self {
    let upvotes = votes
      .iter()
      .filter(|v| v.direction == Direction::Up)
      .count() as u64;
    Self {
      score: compute_score(votes),
      upvotes,
      downvotes: votes.len() as u64 - upvotes,
      viewer_vote: viewer_state(votes, viewer),
    }
  }
}
