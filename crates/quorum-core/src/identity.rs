//! Author and voter identity.
//!
//! Profiles are owned by an external directory. Everything that displays an
//! author goes through [`resolve_identities`], which never fails: an author
//! that cannot be resolved is shown as [`Identity::anonymous`].

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, feature::non_empty, store::ProfileDirectory};

/// Handle shown for authors whose profile cannot be resolved.
pub const ANONYMOUS_HANDLE: &str = "Anonymous";

// ─── Profile ─────────────────────────────────────────────────────────────────

/// A user profile as stored by the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:         Uuid,
  pub username:   String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`ProfileDirectory::upsert_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
  pub id:         Uuid,
  pub username:   String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
}

impl ProfileUpdate {
  /// Trim every field; blank optional fields become `None`.
  pub fn new(
    id: Uuid,
    username: impl AsRef<str>,
    full_name: Option<String>,
    avatar_url: Option<String>,
  ) -> Result<Self> {
    Ok(Self {
      id,
      username: non_empty("username", username.as_ref())?,
      full_name: blank_to_none(full_name),
      avatar_url: blank_to_none(avatar_url),
    })
  }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
  value
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// The minimal projection of a profile used when rendering an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub handle:     String,
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
}

impl Identity {
  /// The placeholder substituted for unresolvable authors.
  pub fn anonymous() -> Self {
    Self {
      handle:     ANONYMOUS_HANDLE.to_owned(),
      full_name:  None,
      avatar_url: None,
    }
  }

  /// Full name if known, otherwise the handle.
  pub fn display_name(&self) -> &str {
    self.full_name.as_deref().unwrap_or(&self.handle)
  }
}

impl From<Profile> for Identity {
  fn from(p: Profile) -> Self {
    Self {
      handle:     p.username,
      full_name:  p.full_name,
      avatar_url: p.avatar_url,
    }
  }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Identities keyed by user id, with the anonymous placeholder as fallback.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
  known: HashMap<Uuid, Identity>,
}

impl IdentityMap {
  /// The identity for `id`, or the anonymous placeholder.
  pub fn get(&self, id: Uuid) -> Identity {
    self
      .known
      .get(&id)
      .cloned()
      .unwrap_or_else(Identity::anonymous)
  }

  pub fn len(&self) -> usize { self.known.len() }

  pub fn is_empty(&self) -> bool { self.known.is_empty() }
}

/// Resolve all of `ids` with a single batched directory lookup.
///
/// A directory failure is logged and every id falls back to the anonymous
/// placeholder; a missing profile affects only its own id.
pub async fn resolve_identities<D>(
  directory: &D,
  ids: impl IntoIterator<Item = Uuid>,
) -> IdentityMap
where
  D: ProfileDirectory,
{
  let ids: Vec<Uuid> = ids
    .into_iter()
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect();
  if ids.is_empty() {
    return IdentityMap::default();
  }

  match directory.get_profiles(&ids).await {
    Ok(profiles) => IdentityMap {
      known: profiles
        .into_iter()
        .map(|p| (p.id, Identity::from(p)))
        .collect(),
    },
    Err(e) => {
      tracing::warn!(
        error = %e,
        count = ids.len(),
        "identity lookup failed; showing authors as anonymous"
      );
      IdentityMap::default()
    }
  }
}
