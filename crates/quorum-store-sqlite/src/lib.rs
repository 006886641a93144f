//! SQLite backend for the Quorum board.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. One [`SqliteStore`] implements both
//! [`BoardStore`](quorum_core::store::BoardStore) and
//! [`ProfileDirectory`](quorum_core::store::ProfileDirectory).

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
