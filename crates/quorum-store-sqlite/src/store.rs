//! [`SqliteStore`], the SQLite implementation of [`BoardStore`] and
//! [`ProfileDirectory`].

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use quorum_core::{
  comment::{Comment, NewComment},
  feature::{Feature, FeatureStatus, NewFeature},
  identity::{Profile, ProfileUpdate},
  store::{BoardStore, FeatureQuery, ProfileDirectory},
  vote::{Direction, Vote, VoteOutcome, VoteTransition},
};

use crate::{
  Result,
  encode::{
    RawComment, RawFeature, RawProfile, RawVote, decode_uuid, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

/// Current time at the precision the store persists.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

/// `?, ?, …` for an `IN (…)` list of `n` values.
fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quorum board backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── BoardStore impl ─────────────────────────────────────────────────────────

impl BoardStore for SqliteStore {
  type Error = crate::Error;

  // ── Features ──────────────────────────────────────────────────────────────

  async fn submit_feature(&self, input: NewFeature) -> Result<Feature> {
    let at = now();
    let feature = Feature {
      feature_id:  Uuid::new_v4(),
      title:       input.title,
      description: input.description,
      status:      FeatureStatus::Pending,
      author_id:   input.author_id,
      created_at:  at,
      updated_at:  at,
    };

    let id_str      = encode_uuid(feature.feature_id);
    let title       = feature.title.clone();
    let description = feature.description.clone();
    let status      = feature.status.as_str();
    let author_str  = encode_uuid(feature.author_id);
    let at_str      = encode_dt(feature.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO features
             (feature_id, title, description, status, author_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![id_str, title, description, status, author_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(feature)
  }

  async fn get_feature(&self, id: Uuid) -> Result<Option<Feature>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFeature> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM features WHERE feature_id = ?1",
                RawFeature::COLUMNS
              ),
              rusqlite::params![id_str],
              RawFeature::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFeature::into_feature).transpose()
  }

  async fn list_features(&self, query: &FeatureQuery) -> Result<Vec<Feature>> {
    let author_str = query.author.map(encode_uuid);
    let status_str = query.status.map(FeatureStatus::as_str);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = query.limit.map_or(-1, |l| l as i64);
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawFeature> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM features
           WHERE (?1 IS NULL OR author_id = ?1)
             AND (?2 IS NULL OR status = ?2)
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?3 OFFSET ?4",
          RawFeature::COLUMNS
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![author_str, status_str, limit_val, offset_val],
            RawFeature::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFeature::into_feature).collect()
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn apply_vote(
    &self,
    feature_id: Uuid,
    voter_id:   Uuid,
    direction:  Direction,
  ) -> Result<VoteOutcome> {
    let feature_str = encode_uuid(feature_id);
    let voter_str   = encode_uuid(voter_id);
    let new_id_str  = encode_uuid(Uuid::new_v4());
    let at_str      = encode_dt(now());

    // Lookup and write share one IMMEDIATE transaction, which takes the
    // write lock up front: concurrent calls for the same voter serialise.
    let (transition, written): (VoteTransition, Option<RawVote>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<RawVote> = tx
          .query_row(
            &format!(
              "SELECT {} FROM votes WHERE feature_id = ?1 AND voter_id = ?2",
              RawVote::COLUMNS
            ),
            rusqlite::params![feature_str, voter_str],
            RawVote::from_row,
          )
          .optional()?;

        let current = existing
          .as_ref()
          .map(|v| {
            Direction::try_from(v.direction)
              .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(3, v.direction))
          })
          .transpose()?;

        let transition = VoteTransition::decide(current, direction);
        let written = match (transition, existing) {
          (VoteTransition::Remove, Some(v)) => {
            tx.execute(
              "DELETE FROM votes WHERE vote_id = ?1",
              rusqlite::params![v.vote_id],
            )?;
            None
          }
          (VoteTransition::Flip, Some(mut v)) => {
            tx.execute(
              "UPDATE votes SET direction = ?1 WHERE vote_id = ?2",
              rusqlite::params![direction.value(), v.vote_id],
            )?;
            v.direction = direction.value();
            Some(v)
          }
          _ => {
            tx.execute(
              "INSERT INTO votes (vote_id, feature_id, voter_id, direction, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![
                new_id_str,
                feature_str,
                voter_str,
                direction.value(),
                at_str
              ],
            )?;
            Some(RawVote {
              vote_id:    new_id_str,
              feature_id: feature_str,
              voter_id:   voter_str,
              direction:  direction.value(),
              created_at: at_str,
            })
          }
        };

        tx.commit()?;
        Ok((transition, written))
      })
      .await?;

    tracing::debug!(%feature_id, %voter_id, ?transition, "vote applied");

    let vote = written.map(RawVote::into_vote).transpose()?;
    Ok(match (transition, vote) {
      (VoteTransition::Create, Some(v)) => VoteOutcome::Created(v),
      (VoteTransition::Flip, Some(v)) => VoteOutcome::Updated(v),
      _ => VoteOutcome::Removed,
    })
  }

  async fn get_vote(&self, feature_id: Uuid, voter_id: Uuid) -> Result<Option<Vote>> {
    let feature_str = encode_uuid(feature_id);
    let voter_str   = encode_uuid(voter_id);

    let raw: Option<RawVote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {} FROM votes WHERE feature_id = ?1 AND voter_id = ?2",
                RawVote::COLUMNS
              ),
              rusqlite::params![feature_str, voter_str],
              RawVote::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVote::into_vote).transpose()
  }

  async fn list_votes(&self, feature_id: Uuid) -> Result<Vec<Vote>> {
    let feature_str = encode_uuid(feature_id);

    let raws: Vec<RawVote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM votes WHERE feature_id = ?1 ORDER BY created_at, rowid",
          RawVote::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![feature_str], RawVote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }

  async fn list_votes_for(&self, feature_ids: &[Uuid]) -> Result<Vec<Vote>> {
    if feature_ids.is_empty() {
      return Ok(Vec::new());
    }
    let id_strs: Vec<String> = feature_ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawVote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM votes WHERE feature_id IN ({}) ORDER BY created_at, rowid",
          RawVote::COLUMNS,
          placeholders(id_strs.len()),
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(id_strs.iter()), RawVote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, input: NewComment) -> Result<Comment> {
    let at = now();
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      feature_id: input.feature_id,
      author_id:  input.author_id,
      content:    input.content,
      created_at: at,
      updated_at: at,
    };

    let id_str      = encode_uuid(comment.comment_id);
    let feature_str = encode_uuid(comment.feature_id);
    let author_str  = encode_uuid(comment.author_id);
    let content     = comment.content.clone();
    let at_str      = encode_dt(comment.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments
             (comment_id, feature_id, author_id, content, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, feature_str, author_str, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn list_comments(&self, feature_id: Uuid) -> Result<Vec<Comment>> {
    let feature_str = encode_uuid(feature_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM comments
           WHERE feature_id = ?1
           ORDER BY created_at ASC, rowid ASC",
          RawComment::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![feature_str], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn count_comments(&self, feature_id: Uuid) -> Result<u64> {
    let feature_str = encode_uuid(feature_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM comments WHERE feature_id = ?1",
          rusqlite::params![feature_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn count_comments_for(&self, feature_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
    if feature_ids.is_empty() {
      return Ok(HashMap::new());
    }
    let id_strs: Vec<String> = feature_ids.iter().copied().map(encode_uuid).collect();

    let rows: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT feature_id, COUNT(*) FROM comments
           WHERE feature_id IN ({})
           GROUP BY feature_id",
          placeholders(id_strs.len()),
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(id_strs.iter()), |r| {
            Ok((r.get(0)?, r.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, n)| decode_uuid(&id).map(|id| (id, n as u64)))
      .collect()
  }
}

// ─── ProfileDirectory impl ───────────────────────────────────────────────────

impl ProfileDirectory for SqliteStore {
  type Error = crate::Error;

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {} FROM profiles WHERE id = ?1", RawProfile::COLUMNS),
              rusqlite::params![id_str],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn get_profiles(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();

    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM profiles WHERE id IN ({})",
          RawProfile::COLUMNS,
          placeholders(id_strs.len()),
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(id_strs.iter()),
            RawProfile::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn upsert_profile(&self, update: ProfileUpdate) -> Result<Profile> {
    let id_str = encode_uuid(update.id);
    let at_str = encode_dt(now());

    let raw: RawProfile = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO profiles
               (id, username, full_name, avatar_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT (id) DO UPDATE SET
               username   = excluded.username,
               full_name  = excluded.full_name,
               avatar_url = excluded.avatar_url,
               updated_at = excluded.updated_at
             RETURNING {}",
            RawProfile::COLUMNS
          ),
          rusqlite::params![
            id_str,
            update.username,
            update.full_name,
            update.avatar_url,
            at_str
          ],
          RawProfile::from_row,
        )?)
      })
      .await?;

    raw.into_profile()
  }
}
