//! JSON REST API for Quorum.
//!
//! Exposes an axum [`Router`] backed by any type implementing both
//! [`BoardStore`] and [`ProfileDirectory`]. Authentication and transport
//! concerns are the caller's responsibility; see [`viewer`] for how the
//! signed-in user reaches the handlers.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", quorum_api::api_router(store.clone()))
//! ```

pub mod comments;
pub mod error;
pub mod extract;
pub mod features;
pub mod profiles;
pub mod viewer;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use quorum_core::store::{BoardStore, ProfileDirectory};

pub use error::ApiError;

/// A storage backend the API can serve from.
pub trait Backend: BoardStore + ProfileDirectory + Send + Sync + 'static {}

impl<T> Backend for T where T: BoardStore + ProfileDirectory + Send + Sync + 'static {}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: Backend>(store: Arc<S>) -> Router<()> {
  Router::new()
    // Features
    .route("/features", get(features::list::<S>).post(features::create::<S>))
    .route("/features/{id}", get(features::get_one::<S>))
    .route("/features/{id}/tally", get(features::tally::<S>))
    .route("/features/{id}/vote", post(features::vote::<S>))
    // Comments
    .route(
      "/features/{id}/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    // The caller
    .route("/me/features", get(features::mine::<S>))
    .route("/me/profile", get(profiles::me::<S>).put(profiles::update_me::<S>))
    // Profiles
    .route("/profiles/{id}", get(profiles::get_one::<S>))
    .with_state(store)
}
