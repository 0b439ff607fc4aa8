//! `GET /g/{vault}/{titleSlug}/{hash}` — the public note view.

use axum::{
  extract::{Path, State},
  http::{StatusCode, header},
  response::{Html, IntoResponse, Response},
};

use evergreen_core::store::ObjectStore;

use crate::AppState;

const NOTE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub async fn note<S>(
  State(state): State<AppState<S>>,
  Path((vault, title_slug, hash)): Path<(String, String, String)>,
) -> Response
where
  S: ObjectStore + Clone + 'static,
{
  let note = match state.repo.get(&title_slug, &hash).await {
    Ok(found) => found,
    Err(e) => {
      tracing::error!(error = %e, "note fetch failed");
      return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response();
    }
  };

  // The note key is global; the vault in the URL must match the record.
  // A mismatch renders exactly like a missing note, so a guessed hash
  // leaks nothing about other vaults.
  let note = match note.filter(|n| n.vault == vault) {
    Some(n) => n,
    None => {
      return (
        StatusCode::NOT_FOUND,
        Html(evergreen_render::not_found_page()),
      )
        .into_response();
    }
  };

  // A theme fetch fault must not take the view down; fall back to the
  // built-in defaults.
  let theme = match state.themes.get(&vault).await {
    Ok(theme) => theme.unwrap_or_default(),
    Err(e) => {
      tracing::warn!(vault = %vault, error = %e, "theme fetch failed; using defaults");
      Default::default()
    }
  };

  let html = evergreen_render::render_note(&note, &theme);
  (
    [(header::CACHE_CONTROL, NOTE_CACHE_CONTROL)],
    Html(html),
  )
    .into_response()
}
