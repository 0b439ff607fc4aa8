//! Image upload (`POST /api/images/{noteHash}`) and public serving
//! (`GET /i/{noteHash}/{filename}`).
//!
//! The body of an upload is the raw image bytes; the content type and
//! filename ride in headers. Images are immutable once stored — they are
//! only ever removed together with their owning note.

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::{Value, json};

use evergreen_core::{keys, store::ObjectStore};

use crate::{AppState, error::ApiError, repo::OpError};

/// Header carrying the original filename of an uploaded image.
pub const FILENAME_HEADER: &str = "x-filename";

const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

// ─── Upload ──────────────────────────────────────────────────────────────────

pub async fn upload<S>(
  State(state): State<AppState<S>>,
  Path(note_hash): Path<String>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<Value>, ApiError>
where
  S: ObjectStore + Clone + 'static,
{
  let filename = headers
    .get(FILENAME_HEADER)
    .and_then(|v| v.to_str().ok())
    .filter(|f| !f.is_empty() && !f.contains('/'))
    .ok_or_else(|| ApiError::BadRequest("missing or invalid filename".into()))?;

  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or("application/octet-stream");

  let key = keys::image_key(&note_hash, filename);
  state
    .repo
    .store()
    .put(&key, body.to_vec(), content_type)
    .await
    .map_err(OpError::store)?;

  let url = format!(
    "{}{}",
    state.config.base_url.trim_end_matches('/'),
    keys::image_path(&note_hash, filename)
  );
  Ok(Json(json!({ "url": url, "key": key })))
}

// ─── Serve ───────────────────────────────────────────────────────────────────

/// Public image bytes, served with the stored content type and a
/// year-long cache.
pub async fn serve<S>(
  State(state): State<AppState<S>>,
  Path((note_hash, filename)): Path<(String, String)>,
) -> Response
where
  S: ObjectStore + Clone + 'static,
{
  let key = keys::image_key(&note_hash, &filename);
  match state.repo.store().get(&key).await {
    Ok(Some(obj)) => (
      [
        (header::CONTENT_TYPE, obj.content_type),
        (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
      ],
      obj.bytes,
    )
      .into_response(),
    Ok(None) => StatusCode::NOT_FOUND.into_response(),
    Err(e) => {
      tracing::error!(key = %key, error = %e, "image fetch failed");
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}
