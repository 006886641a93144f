//! Error types for `quorum-core`.
//!
//! These are caller-contract violations: the calling layer is expected to
//! validate input before it reaches a store, so none of these are retried.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("invalid vote direction: {0} (expected 1 or -1)")]
  InvalidDirection(i64),

  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("unknown feature status: {0:?}")]
  UnknownStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
