//! In-memory fakes of the store traits for unit tests in this crate.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  comment::{Comment, NewComment},
  feature::{Feature, FeatureStatus, NewFeature},
  identity::{Profile, ProfileUpdate},
  store::{BoardStore, FeatureQuery, ProfileDirectory},
  vote::{Direction, Vote, VoteOutcome, VoteTransition},
};

#[derive(Debug, thiserror::Error)]
#[error("fake store unavailable")]
pub struct Unavailable;

/// A board kept in plain vectors. `list_comments` returns comments in
/// storage order, unsorted. Every read counts towards `reads`.
#[derive(Default)]
pub struct FakeBoard {
  pub features:   Mutex<Vec<Feature>>,
  pub votes:      Mutex<Vec<Vote>>,
  pub comments:   Mutex<Vec<Comment>>,
  pub fail_reads: bool,
  pub reads:      AtomicUsize,
}

impl FakeBoard {
  fn check(&self) -> Result<(), Unavailable> {
    self.reads.fetch_add(1, Ordering::SeqCst);
    if self.fail_reads { Err(Unavailable) } else { Ok(()) }
  }

  pub fn reads(&self) -> usize { self.reads.load(Ordering::SeqCst) }
}

impl BoardStore for FakeBoard {
  type Error = Unavailable;

  async fn submit_feature(&self, input: NewFeature) -> Result<Feature, Unavailable> {
    let now = Utc::now();
    let feature = Feature {
      feature_id:  Uuid::new_v4(),
      title:       input.title,
      description: input.description,
      status:      FeatureStatus::Pending,
      author_id:   input.author_id,
      created_at:  now,
      updated_at:  now,
    };
    self.features.lock().unwrap().push(feature.clone());
    Ok(feature)
  }

  async fn get_feature(&self, id: Uuid) -> Result<Option<Feature>, Unavailable> {
    self.check()?;
    let features = self.features.lock().unwrap();
    Ok(features.iter().find(|f| f.feature_id == id).cloned())
  }

  async fn list_features(
    &self,
    query: &FeatureQuery,
  ) -> Result<Vec<Feature>, Unavailable> {
    self.check()?;
    let mut out: Vec<Feature> = self
      .features
      .lock()
      .unwrap()
      .iter()
      .filter(|f| query.author.is_none_or(|a| f.author_id == a))
      .filter(|f| query.status.is_none_or(|s| f.status == s))
      .cloned()
      .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(
      out
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect(),
    )
  }

  async fn apply_vote(
    &self,
    feature_id: Uuid,
    voter_id: Uuid,
    direction: Direction,
  ) -> Result<VoteOutcome, Unavailable> {
    let mut votes = self.votes.lock().unwrap();
    let existing = votes
      .iter()
      .position(|v| v.feature_id == feature_id && v.voter_id == voter_id);

    match VoteTransition::decide(existing.map(|i| votes[i].direction), direction) {
      VoteTransition::Create => {
        let vote = Vote {
          vote_id: Uuid::new_v4(),
          feature_id,
          voter_id,
          direction,
          created_at: Utc::now(),
        };
        votes.push(vote.clone());
        Ok(VoteOutcome::Created(vote))
      }
      VoteTransition::Flip => {
        let i = existing.expect("flip implies an existing vote");
        votes[i].direction = direction;
        Ok(VoteOutcome::Updated(votes[i].clone()))
      }
      VoteTransition::Remove => {
        votes.remove(existing.expect("remove implies an existing vote"));
        Ok(VoteOutcome::Removed)
      }
    }
  }

  async fn get_vote(
    &self,
    feature_id: Uuid,
    voter_id: Uuid,
  ) -> Result<Option<Vote>, Unavailable> {
    self.check()?;
    let votes = self.votes.lock().unwrap();
    Ok(
      votes
        .iter()
        .find(|v| v.feature_id == feature_id && v.voter_id == voter_id)
        .cloned(),
    )
  }

  async fn list_votes(&self, feature_id: Uuid) -> Result<Vec<Vote>, Unavailable> {
    self.check()?;
    let votes = self.votes.lock().unwrap();
    Ok(votes.iter().filter(|v| v.feature_id == feature_id).cloned().collect())
  }

  async fn list_votes_for(&self, feature_ids: &[Uuid]) -> Result<Vec<Vote>, Unavailable> {
    self.check()?;
    let votes = self.votes.lock().unwrap();
    Ok(
      votes
        .iter()
        .filter(|v| feature_ids.contains(&v.feature_id))
        .cloned()
        .collect(),
    )
  }

  async fn add_comment(&self, input: NewComment) -> Result<Comment, Unavailable> {
    let now = Utc::now();
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      feature_id: input.feature_id,
      author_id:  input.author_id,
      content:    input.content,
      created_at: now,
      updated_at: now,
    };
    self.comments.lock().unwrap().push(comment.clone());
    Ok(comment)
  }

  async fn list_comments(&self, feature_id: Uuid) -> Result<Vec<Comment>, Unavailable> {
    self.check()?;
    let comments = self.comments.lock().unwrap();
    Ok(
      comments
        .iter()
        .filter(|c| c.feature_id == feature_id)
        .cloned()
        .collect(),
    )
  }

  async fn count_comments(&self, feature_id: Uuid) -> Result<u64, Unavailable> {
    Ok(self.list_comments(feature_id).await?.len() as u64)
  }

  async fn count_comments_for(
    &self,
    feature_ids: &[Uuid],
  ) -> Result<HashMap<Uuid, u64>, Unavailable> {
    self.check()?;
    let mut counts = HashMap::new();
    for c in self.comments.lock().unwrap().iter() {
      if feature_ids.contains(&c.feature_id) {
        *counts.entry(c.feature_id).or_insert(0) += 1;
      }
    }
    Ok(counts)
  }
}

/// A directory backed by a fixed set of profiles that counts batch lookups.
#[derive(Default)]
pub struct FakeDirectory {
  profiles:    Vec<Profile>,
  batch_calls: AtomicUsize,
}

impl FakeDirectory {
  pub fn with_profiles<'a>(
    entries: impl IntoIterator<Item = (Uuid, &'a str, Option<&'a str>)>,
  ) -> Self {
    let now = Utc::now();
    Self {
      profiles:    entries
        .into_iter()
        .map(|(id, username, full_name)| Profile {
          id,
          username: username.into(),
          full_name: full_name.map(Into::into),
          avatar_url: None,
          created_at: now,
          updated_at: now,
        })
        .collect(),
      batch_calls: AtomicUsize::new(0),
    }
  }

  pub fn batch_calls(&self) -> usize { self.batch_calls.load(Ordering::SeqCst) }
}

impl ProfileDirectory for FakeDirectory {
  type Error = Unavailable;

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, Unavailable> {
    Ok(self.profiles.iter().find(|p| p.id == id).cloned())
  }

  async fn get_profiles(&self, ids: &[Uuid]) -> Result<Vec<Profile>, Unavailable> {
    self.batch_calls.fetch_add(1, Ordering::SeqCst);
    Ok(
      self
        .profiles
        .iter()
        .filter(|p| ids.contains(&p.id))
        .cloned()
        .collect(),
    )
  }

  async fn upsert_profile(&self, _: ProfileUpdate) -> Result<Profile, Unavailable> {
    unimplemented!()
  }
}

/// A directory whose every lookup fails.
pub struct FailingDirectory;

impl ProfileDirectory for FailingDirectory {
  type Error = Unavailable;

  async fn get_profile(&self, _: Uuid) -> Result<Option<Profile>, Unavailable> {
    Err(Unavailable)
  }

  async fn get_profiles(&self, _: &[Uuid]) -> Result<Vec<Profile>, Unavailable> {
    Err(Unavailable)
  }

  async fn upsert_profile(&self, _: ProfileUpdate) -> Result<Profile, Unavailable> {
    Err(Unavailable)
  }
}
