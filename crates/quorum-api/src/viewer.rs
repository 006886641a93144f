//! Extractors for the calling user.
//!
//! Authentication happens upstream. The identity service that fronts this
//! API forwards the signed-in user's id in the [`USER_ID_HEADER`] header and
//! strips any client-supplied value.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller, or `None` when signed out.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<Uuid>);

/// A signed-in caller. Rejects anonymous requests with `401`.
#[derive(Debug, Clone, Copy)]
pub struct SignedIn(pub Uuid);

/// Read the viewer id from `headers`. A malformed id is a `400`, not an
/// anonymous request.
pub fn viewer_from_headers(headers: &HeaderMap) -> Result<Option<Uuid>, ApiError> {
  let Some(raw) = headers.get(USER_ID_HEADER) else {
    return Ok(None);
  };
  let id = raw
    .to_str()
    .ok()
    .and_then(|s| Uuid::parse_str(s.trim()).ok())
    .ok_or_else(|| ApiError::BadRequest(format!("malformed {USER_ID_HEADER} header")))?;
  Ok(Some(id))
}

impl<S> FromRequestParts<S> for Viewer
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    viewer_from_headers(&parts.headers).map(Viewer)
  }
}

impl<S> FromRequestParts<S> for SignedIn
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    viewer_from_headers(&parts.headers)?
      .map(SignedIn)
      .ok_or(ApiError::Unauthorized)
  }
}
