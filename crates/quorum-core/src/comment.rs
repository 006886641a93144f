//! Comments: append-only discussion entries attached to a feature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, feature::non_empty};

/// A persisted comment. There is no edit or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub feature_id: Uuid,
  pub author_id:  Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::BoardStore::add_comment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
  pub feature_id: Uuid,
  pub author_id:  Uuid,
  pub content:    String,
}

impl NewComment {
  /// Build a comment, trimming `content` and rejecting it if blank.
  pub fn new(
    feature_id: Uuid,
    author_id: Uuid,
    content: impl AsRef<str>,
  ) -> Result<Self> {
    Ok(Self {
      feature_id,
      author_id,
      content: non_empty("content", content.as_ref())?,
    })
  }
}
