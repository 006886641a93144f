//! Comment thread assembly.
//!
//! A thread is the chronologically ordered list of a feature's comments,
//! each paired with its resolved author. Failing to load the comments is an
//! error; failing to resolve an author is not.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  comment::Comment,
  identity::{Identity, resolve_identities},
  store::{BoardStore, ProfileDirectory},
};

/// A comment with its author resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadEntry {
  pub comment: Comment,
  pub author:  Identity,
}

/// Stable-sort `comments` by `created_at`; equal timestamps keep their
/// retrieval order.
pub fn order_chronologically(comments: &mut [Comment]) {
  comments.sort_by_key(|c| c.created_at);
}

/// Build the display thread for `feature_id`.
///
/// Authors are resolved with a single batched directory lookup. The output
/// has exactly one entry per stored comment.
pub async fn assemble_thread<S, D>(
  store: &S,
  directory: &D,
  feature_id: Uuid,
) -> Result<Vec<ThreadEntry>, S::Error>
where
  S: BoardStore,
  D: ProfileDirectory,
{
  let mut comments = store.list_comments(feature_id).await?;
  order_chronologically(&mut comments);

  let identities =
    resolve_identities(directory, comments.iter().map(|c| c.author_id)).await;

  Ok(
    comments
      .into_iter()
      .map(|comment| ThreadEntry {
        author: identities.get(comment.author_id),
        comment,
      })
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::{DateTime, Duration, TimeZone, Utc};

  use super::*;
  use crate::testing::{FailingDirectory, FakeBoard, FakeDirectory};

  fn at(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  fn comment(
    feature_id: Uuid,
    author_id: Uuid,
    content: &str,
    ts: DateTime<Utc>,
  ) -> Comment {
    Comment {
      comment_id: Uuid::new_v4(),
      feature_id,
      author_id,
      content: content.into(),
      created_at: ts,
      updated_at: ts,
    }
  }

  #[tokio::test]
  async fn empty_thread_for_feature_without_comments() {
    let board = FakeBoard::default();
    let dir = FakeDirectory::default();
    let thread = assemble_thread(&board, &dir, Uuid::new_v4()).await.unwrap();
    assert!(thread.is_empty());
  }

  #[tokio::test]
  async fn thread_is_ordered_and_complete() {
    let feature = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let t0 = at(1_700_000_000);

    // Stored out of order on purpose.
    let board = FakeBoard {
      comments: Mutex::new(vec![
        comment(feature, bob, "third", t0 + Duration::seconds(20)),
        comment(feature, alice, "first", t0),
        comment(feature, alice, "second", t0 + Duration::seconds(10)),
      ]),
      ..FakeBoard::default()
    };
    let dir = FakeDirectory::with_profiles([(alice, "alice", Some("Alice"))]);

    let thread = assemble_thread(&board, &dir, feature).await.unwrap();
    let contents: Vec<_> =
      thread.iter().map(|e| e.comment.content.as_str()).collect();
    assert_eq!(contents, ["first", "second", "third"]);

    assert_eq!(thread[0].author.handle, "alice");
    assert_eq!(thread[0].author.display_name(), "Alice");
    // Bob has no profile: shown, but anonymous.
    assert_eq!(thread[2].author, Identity::anonymous());
  }

  #[tokio::test]
  async fn identical_timestamps_keep_insertion_order() {
    let feature = Uuid::new_v4();
    let author = Uuid::new_v4();
    let ts = at(1_700_000_000);
    let board = FakeBoard {
      comments: Mutex::new(vec![
        comment(feature, author, "C1", ts),
        comment(feature, author, "C2", ts),
      ]),
      ..FakeBoard::default()
    };

    let thread = assemble_thread(&board, &FakeDirectory::default(), feature)
      .await
      .unwrap();
    let contents: Vec<_> =
      thread.iter().map(|e| e.comment.content.as_str()).collect();
    assert_eq!(contents, ["C1", "C2"]);
  }

  #[tokio::test]
  async fn directory_failure_degrades_to_anonymous() {
    let feature = Uuid::new_v4();
    let board = FakeBoard {
      comments: Mutex::new(vec![
        comment(feature, Uuid::new_v4(), "a", at(1)),
        comment(feature, Uuid::new_v4(), "b", at(2)),
      ]),
      ..FakeBoard::default()
    };

    let thread = assemble_thread(&board, &FailingDirectory, feature)
      .await
      .unwrap();
    assert_eq!(thread.len(), 2);
    assert!(thread.iter().all(|e| e.author == Identity::anonymous()));
  }

  #[tokio::test]
  async fn comment_load_failure_is_propagated() {
    let board = FakeBoard { fail_reads: true, ..FakeBoard::default() };
    let result =
      assemble_thread(&board, &FakeDirectory::default(), Uuid::new_v4()).await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn authors_are_resolved_in_one_batch() {
    let feature = Uuid::new_v4();
    let author = Uuid::new_v4();
    let board = FakeBoard {
      comments: Mutex::new(
        (0..5)
          .map(|i| comment(feature, author, "x", at(i)))
          .collect(),
      ),
      ..FakeBoard::default()
    };
    let dir = FakeDirectory::with_profiles([(author, "carol", None)]);

    let thread = assemble_thread(&board, &dir, feature).await.unwrap();
    assert_eq!(thread.len(), 5);
    assert_eq!(dir.batch_calls(), 1);
  }
}
