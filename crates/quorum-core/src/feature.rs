//! Feature requests: the items that are voted on and discussed.
//!
//! A feature is immutable once submitted, except for its status, which is
//! owned by an external moderation process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of a feature request.
///
/// Newly submitted features start out as [`FeatureStatus::Pending`]; the
/// string form `"proposed"` is accepted as a synonym.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FeatureStatus {
  #[default]
  #[serde(alias = "proposed")]
  #[strum(to_string = "pending", serialize = "proposed")]
  Pending,
  InProgress,
  Completed,
  Rejected,
}

impl FeatureStatus {
  /// The string stored in the `status` column.
  pub fn as_str(self) -> &'static str { self.into() }

  /// Parse a stored or user-supplied status string.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
  }
}

// ─── Feature ─────────────────────────────────────────────────────────────────

/// A persisted feature request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
  pub feature_id:  Uuid,
  pub title:       String,
  pub description: String,
  pub status:      FeatureStatus,
  pub author_id:   Uuid,
  /// Server-assigned; never changes after creation.
  pub created_at:  DateTime<Utc>,
  /// Moves only when moderation changes `status`.
  pub updated_at:  DateTime<Utc>,
}

// ─── NewFeature ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::BoardStore::submit_feature`].
///
/// `feature_id`, `status` and the timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeature {
  pub author_id:   Uuid,
  pub title:       String,
  pub description: String,
}

impl NewFeature {
  /// Build a submission, trimming both text fields.
  ///
  /// Returns [`Error::EmptyField`] if either is blank after trimming.
  pub fn new(
    author_id: Uuid,
    title: impl AsRef<str>,
    description: impl AsRef<str>,
  ) -> Result<Self> {
    Ok(Self {
      author_id,
      title: non_empty("title", title.as_ref())?,
      description: non_empty("description", description.as_ref())?,
    })
  }
}

/// Trim `value` and reject it if nothing is left.
pub(crate) fn non_empty(field: &'static str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::EmptyField(field));
  }
  Ok(trimmed.to_owned())
}
