//! `GET /api/status` — connectivity probe for the publishing plugin.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;

use evergreen_core::{keys::NOTES_PREFIX, store::ObjectStore};

use crate::AppState;

/// Probes the object store with a one-key listing. The `r2` field name
/// is the wire contract the existing plugin checks; it stays even though
/// the store behind it is pluggable.
pub async fn handler<S>(State(state): State<AppState<S>>) -> Response
where
  S: ObjectStore + Clone + 'static,
{
  match state.repo.store().list(NOTES_PREFIX, None, 1).await {
    Ok(_) => Json(json!({
      "status": "ok",
      "r2": true,
      "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response(),
    Err(e) => {
      tracing::error!(error = %e, "status probe failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
          "status": "error",
          "r2": false,
          "error": "object store unreachable",
        })),
      )
        .into_response()
    }
  }
}
