//! Core types and trait definitions for the Quorum feature-request board.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It holds the voting rules, the aggregation and thread-assembly logic, and
//! the store traits every backend implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod board;
pub mod comment;
pub mod error;
pub mod feature;
pub mod identity;
pub mod store;
pub mod tally;
pub mod thread;
pub mod vote;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
