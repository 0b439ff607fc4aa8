//! Shared-secret auth for the `/api/*` surface.
//!
//! A single static key, compared exactly against the `Authorization`
//! header. Absent or mismatched keys are rejected before any handler
//! logic runs; the public `/g/*` and `/i/*` paths never pass through
//! here — permanent public links are the product.

use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::{IntoResponse, Response},
};

use evergreen_core::store::ObjectStore;

use crate::{AppState, error::ApiError};

/// Verify the shared secret directly from headers.
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
  let presented = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  if presented != expected {
    return Err(ApiError::Unauthorized);
  }
  Ok(())
}

/// Router middleware applied to every `/api/*` route.
pub async fn require_api_key<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Response
where
  S: ObjectStore + Clone + 'static,
{
  match verify_api_key(req.headers(), &state.config.api_key) {
    Ok(()) => next.run(req).await,
    Err(e) => e.into_response(),
  }
}
