//! `GET /api/notes` and `DELETE /api/notes/{vault}/{titleSlug}/{hash}`.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use evergreen_core::{note::IndexEntry, store::ObjectStore};

use crate::{AppState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub vault: Option<String>,
}

/// `GET /api/notes?vault=<vault>` — the vault's listing, newest first.
/// A vault that never published is an empty array, not an error.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<IndexEntry>>, ApiError>
where
  S: ObjectStore + Clone + 'static,
{
  let vault = params
    .vault
    .filter(|v| !v.is_empty())
    .ok_or_else(|| ApiError::BadRequest("missing vault".into()))?;

  Ok(Json(state.repo.list(&vault).await?))
}

// ─── Unshare ─────────────────────────────────────────────────────────────────

/// `DELETE /api/notes/{vault}/{titleSlug}/{hash}` — idempotent: deleting
/// a note that does not exist still succeeds.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path((vault, title_slug, hash)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError>
where
  S: ObjectStore + Clone + 'static,
{
  state.repo.delete(&vault, &title_slug, &hash).await?;
  Ok(Json(json!({ "success": true })))
}
