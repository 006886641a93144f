//! Votes and the toggle rule.
//!
//! A voter holds at most one vote per feature. Applying a direction either
//! creates that vote, flips it in place, or removes it when the same
//! direction is applied twice (toggle-off).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Direction ───────────────────────────────────────────────────────────────

/// The signed magnitude of a vote. Only `+1` and `-1` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Direction {
  Up,
  Down,
}

impl Direction {
  /// `+1` for [`Direction::Up`], `-1` for [`Direction::Down`].
  pub fn value(self) -> i64 {
    match self {
      Self::Up => 1,
      Self::Down => -1,
    }
  }

  pub fn opposite(self) -> Self {
    match self {
      Self::Up => Self::Down,
      Self::Down => Self::Up,
    }
  }
}

impl TryFrom<i64> for Direction {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self, Self::Error> {
    match value {
      1 => Ok(Self::Up),
      -1 => Ok(Self::Down),
      other => Err(Error::InvalidDirection(other)),
    }
  }
}

impl From<Direction> for i64 {
  fn from(d: Direction) -> Self { d.value() }
}

// ─── Vote ────────────────────────────────────────────────────────────────────

/// A persisted vote, unique per `(feature_id, voter_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
  pub vote_id:    Uuid,
  pub feature_id: Uuid,
  pub voter_id:   Uuid,
  pub direction:  Direction,
  /// Set when the vote is first cast; a flip keeps the original value.
  pub created_at: DateTime<Utc>,
}

// ─── Toggle rule ─────────────────────────────────────────────────────────────

/// The single write a vote application results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
  /// No vote yet: insert one.
  Create,
  /// The existing vote points the other way: overwrite its direction.
  Flip,
  /// The existing vote already points this way: delete it.
  Remove,
}

impl VoteTransition {
  /// Decide what applying `requested` does given the voter's `existing` vote.
  pub fn decide(existing: Option<Direction>, requested: Direction) -> Self {
    match existing {
      None => Self::Create,
      Some(current) if current == requested => Self::Remove,
      Some(_) => Self::Flip,
    }
  }
}

/// The persisted result of [`crate::store::BoardStore::apply_vote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "vote", rename_all = "snake_case")]
pub enum VoteOutcome {
  Created(Vote),
  Updated(Vote),
  Removed,
}

impl VoteOutcome {
  /// The vote that remains after the write, if any.
  pub fn vote(&self) -> Option<&Vote> {
    match self {
      Self::Created(v) | Self::Updated(v) => Some(v),
      Self::Removed => None,
    }
  }
}
