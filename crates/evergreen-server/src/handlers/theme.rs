//! `PUT /api/theme` — merge one theme mode for a vault.

use std::str::FromStr as _;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use evergreen_core::{
  store::ObjectStore,
  theme::{ThemeMode, ThemeSettings},
};

use crate::{AppState, error::ApiError};

/// Body: `{"vault": "...", "mode": "light"|"dark", "theme": {...}}`.
///
/// Fields are validated by hand so every missing or malformed piece is a
/// clean 400 before any storage access.
#[derive(Debug, Deserialize)]
pub struct ThemeBody {
  pub vault: Option<String>,
  pub mode:  Option<String>,
  pub theme: Option<Value>,
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<ThemeBody>,
) -> Result<Json<Value>, ApiError>
where
  S: ObjectStore + Clone + 'static,
{
  let vault = body
    .vault
    .filter(|v| !v.is_empty())
    .ok_or_else(|| ApiError::BadRequest("missing vault".into()))?;

  let mode = body
    .mode
    .as_deref()
    .ok_or_else(|| ApiError::BadRequest("missing mode".into()))
    .and_then(|m| {
      ThemeMode::from_str(m)
        .map_err(|_| ApiError::BadRequest(format!("unknown mode: {m:?}")))
    })?;

  let settings: ThemeSettings = body
    .theme
    .ok_or_else(|| ApiError::BadRequest("missing theme".into()))
    .and_then(|t| {
      serde_json::from_value(t)
        .map_err(|e| ApiError::BadRequest(format!("invalid theme: {e}")))
    })?;

  state.themes.set(&vault, mode, settings).await?;
  Ok(Json(json!({ "success": true })))
}
