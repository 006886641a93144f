//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that text ordering in SQL matches chronological
//! ordering. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use quorum_core::{
  comment::Comment,
  feature::{Feature, FeatureStatus},
  identity::Profile,
  vote::{Direction, Vote},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `features` row.
pub struct RawFeature {
  pub feature_id:  String,
  pub title:       String,
  pub description: String,
  pub status:      String,
  pub author_id:   String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawFeature {
  pub const COLUMNS: &'static str =
    "feature_id, title, description, status, author_id, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      feature_id:  row.get(0)?,
      title:       row.get(1)?,
      description: row.get(2)?,
      status:      row.get(3)?,
      author_id:   row.get(4)?,
      created_at:  row.get(5)?,
      updated_at:  row.get(6)?,
    })
  }

  pub fn into_feature(self) -> Result<Feature> {
    Ok(Feature {
      feature_id:  decode_uuid(&self.feature_id)?,
      title:       self.title,
      description: self.description,
      status:      FeatureStatus::parse(&self.status)?,
      author_id:   decode_uuid(&self.author_id)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `votes` row.
pub struct RawVote {
  pub vote_id:    String,
  pub feature_id: String,
  pub voter_id:   String,
  pub direction:  i64,
  pub created_at: String,
}

impl RawVote {
  pub const COLUMNS: &'static str =
    "vote_id, feature_id, voter_id, direction, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      vote_id:    row.get(0)?,
      feature_id: row.get(1)?,
      voter_id:   row.get(2)?,
      direction:  row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      vote_id:    decode_uuid(&self.vote_id)?,
      feature_id: decode_uuid(&self.feature_id)?,
      voter_id:   decode_uuid(&self.voter_id)?,
      direction:  Direction::try_from(self.direction)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub feature_id: String,
  pub author_id:  String,
  pub content:    String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawComment {
  pub const COLUMNS: &'static str =
    "comment_id, feature_id, author_id, content, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      feature_id: row.get(1)?,
      author_id:  row.get(2)?,
      content:    row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      feature_id: decode_uuid(&self.feature_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub id:         String,
  pub username:   String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawProfile {
  pub const COLUMNS: &'static str =
    "id, username, full_name, avatar_url, created_at, updated_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      username:   row.get(1)?,
      full_name:  row.get(2)?,
      avatar_url: row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:         decode_uuid(&self.id)?,
      username:   self.username,
      full_name:  self.full_name,
      avatar_url: self.avatar_url,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
