//! HTTP layer for Evergreen.
//!
//! Exposes an axum [`Router`] over any [`ObjectStore`]: an authenticated
//! `/api/*` surface for the publishing plugin, and the public `/g/*`
//! (rendered notes) and `/i/*` (images) paths.

pub mod auth;
pub mod cache;
pub mod error;
pub mod handlers;
pub mod repo;
pub mod sweep;
pub mod themes;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  middleware,
  routing::{delete, get, post, put},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use evergreen_core::store::ObjectStore;

use crate::{repo::NoteRepository, themes::ThemeStore};

/// Largest accepted image upload.
const MAX_IMAGE_BYTES: usize = 32 * 1024 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `evergreen.toml` and
/// the `EVERGREEN_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// Absolute origin used in returned URLs, e.g. `https://notes.example`.
  pub base_url:   String,
  pub store_path: PathBuf,
  /// The shared secret every `/api/*` request must present.
  pub api_key:    String,
  #[serde(default = "default_sweep_interval_secs")]
  pub sweep_interval_secs: u64,
}

/// Daily, unless configured otherwise.
fn default_sweep_interval_secs() -> u64 { 86_400 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub repo:   Arc<NoteRepository<S>>,
  pub themes: Arc<ThemeStore<S>>,
  pub config: Arc<ServerConfig>,
}

impl<S: ObjectStore + 'static> AppState<S> {
  pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
    let repo = Arc::new(NoteRepository::new(
      Arc::clone(&store),
      config.base_url.clone(),
    ));
    let themes = Arc::new(ThemeStore::new(store));
    Self { repo, themes, config: Arc::new(config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ObjectStore + Clone + 'static,
{
  let api = Router::new()
    .route("/status", get(handlers::status::handler::<S>))
    .route("/theme", put(handlers::theme::update::<S>))
    .route("/share", post(handlers::share::handler::<S>))
    .route("/notes", get(handlers::notes::list::<S>))
    .route(
      "/notes/{vault}/{title_slug}/{hash}",
      delete(handlers::notes::remove::<S>),
    )
    .route(
      "/images/{note_hash}",
      post(handlers::images::upload::<S>)
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
    )
    // The shared secret gates every /api route before handler logic.
    .route_layer(middleware::from_fn_with_state(
      state.clone(),
      auth::require_api_key::<S>,
    ));

  Router::new()
    .nest("/api", api)
    .route("/g/{vault}/{title_slug}/{hash}", get(handlers::view::note::<S>))
    .route("/i/{note_hash}/{filename}", get(handlers::images::serve::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use evergreen_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  const KEY: &str = "s3cret";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(Arc::new(store), ServerConfig {
      host:       "127.0.0.1".to_string(),
      port:       8123,
      base_url:   "http://localhost:8123".to_string(),
      store_path: PathBuf::from(":memory:"),
      api_key:    KEY.to_string(),
      sweep_interval_secs: 86_400,
    })
  }

  async fn send(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    with_key: bool,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if with_key {
      builder = builder.header(header::AUTHORIZATION, KEY);
    }
    let request = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state).oneshot(request).await.unwrap()
  }

  async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(resp).await).unwrap()
  }

  fn share_body(vault: &str, title: &str, content: &str) -> Value {
    json!({ "vault": vault, "title": title, "content": content })
  }

  // ── Auth ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn api_routes_require_the_shared_secret() {
    for (method, uri) in [
      ("GET", "/api/status"),
      ("GET", "/api/notes?vault=demo"),
      ("POST", "/api/share"),
      ("PUT", "/api/theme"),
      ("DELETE", "/api/notes/demo/x/00000000"),
    ] {
      let resp = send(make_state().await, method, uri, false, None).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
  }

  #[tokio::test]
  async fn status_reports_ok_with_valid_key() {
    let resp = send(make_state().await, "GET", "/api/status", true, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["r2"], true);
    assert!(body["version"].is_string());
  }

  // ── Publish + view (end-to-end scenario A) ───────────────────────────────

  #[tokio::test]
  async fn share_then_view_renders_highlight_and_tag() {
    let state = make_state().await;

    let resp = send(
      state.clone(),
      "POST",
      "/api/share",
      true,
      Some(share_body("demo", "Hello World", "# Hi\n==important==\n#tag")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let receipt = body_json(resp).await;

    let hash = receipt["hash"].as_str().unwrap();
    assert_eq!(hash.len(), 8);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(receipt["titleSlug"], "hello-world");
    assert_eq!(
      receipt["url"],
      format!("http://localhost:8123/g/demo/hello-world/{hash}")
    );

    // The view path is public: no key.
    let view = send(
      state,
      "GET",
      &format!("/g/demo/hello-world/{hash}"),
      false,
      None,
    )
    .await;
    assert_eq!(view.status(), StatusCode::OK);
    let cache = view
      .headers()
      .get(header::CACHE_CONTROL)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(cache.contains("immutable"), "Cache-Control: {cache}");

    let html = body_text(view).await;
    assert!(html.contains("<mark>important</mark>"), "{html}");
    assert!(html.contains("class=\"tag\""), "{html}");
  }

  #[tokio::test]
  async fn republish_keeps_the_same_url() {
    let state = make_state().await;
    let first = body_json(
      send(state.clone(), "POST", "/api/share", true,
        Some(share_body("demo", "Hello", "v1"))).await,
    )
    .await;
    let second = body_json(
      send(state, "POST", "/api/share", true,
        Some(share_body("demo", "Hello", "v2"))).await,
    )
    .await;
    assert_eq!(first["url"], second["url"]);
  }

  #[tokio::test]
  async fn share_rejects_missing_fields_before_any_write() {
    let state = make_state().await;
    let resp = send(
      state.clone(),
      "POST",
      "/api/share",
      true,
      Some(json!({ "vault": "demo", "title": "No Content" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing landed in the listing.
    let listing = body_json(
      send(state, "GET", "/api/notes?vault=demo", true, None).await,
    )
    .await;
    assert_eq!(listing, json!([]));
  }

  // ── Linked notes (end-to-end scenario B) ─────────────────────────────────

  #[tokio::test]
  async fn linked_note_is_hyperlinked_and_viewable() {
    let state = make_state().await;

    let resp = send(
      state.clone(),
      "POST",
      "/api/share",
      true,
      Some(json!({
        "vault": "demo",
        "title": "Primary",
        "content": "see [[Branch]]",
        "linkedNotes": [{ "title": "Branch", "content": "leaf body" }],
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let receipt = body_json(resp).await;
    let hash = receipt["hash"].as_str().unwrap().to_string();

    let view = send(state.clone(), "GET", &format!("/g/demo/primary/{hash}"), false, None).await;
    let html = body_text(view).await;

    // The wikilink resolved to the linked note's computed URL.
    let branch_hash = evergreen_core::identity::note_hash("demo", "Branch");
    let branch_path = format!("/g/demo/branch/{branch_hash}");
    assert!(html.contains(&format!("href=\"{branch_path}\"")), "{html}");

    // And the linked note is itself viewable.
    let branch_view = send(state, "GET", &branch_path, false, None).await;
    assert_eq!(branch_view.status(), StatusCode::OK);
    assert!(body_text(branch_view).await.contains("leaf body"));
  }

  #[tokio::test]
  async fn unlinked_wikilink_renders_unresolved_marker() {
    let state = make_state().await;
    let receipt = body_json(
      send(state.clone(), "POST", "/api/share", true,
        Some(share_body("demo", "Lonely", "see [[Nowhere]]"))).await,
    )
    .await;
    let hash = receipt["hash"].as_str().unwrap().to_string();

    let html = body_text(
      send(state, "GET", &format!("/g/demo/lonely/{hash}"), false, None).await,
    )
    .await;
    assert!(html.contains("class=\"unresolved-link\""), "{html}");
    assert!(!html.contains("href=\"/g/demo/nowhere"), "{html}");
  }

  // ── Themes (end-to-end scenario C) ───────────────────────────────────────

  #[tokio::test]
  async fn dark_theme_put_shows_in_rendered_css() {
    let state = make_state().await;

    let resp = send(
      state.clone(),
      "PUT",
      "/api/theme",
      true,
      Some(json!({
        "vault": "demo",
        "mode": "dark",
        "theme": {
          "background": "#0b0c10",
          "text": "#e6e6e6",
          "accent": "#a48aff",
          "codeBackground": "#16181d",
          "fontSize": 17,
        },
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "success": true }));

    let receipt = body_json(
      send(state.clone(), "POST", "/api/share", true,
        Some(share_body("demo", "Themed", "text"))).await,
    )
    .await;
    let hash = receipt["hash"].as_str().unwrap().to_string();

    let html = body_text(
      send(state, "GET", &format!("/g/demo/themed/{hash}"), false, None).await,
    )
    .await;
    // Dark mode carries the stored values; light stays the default.
    assert!(html.contains("--background: #0b0c10;"), "{html}");
    assert!(html.contains("--background: #ffffff;"), "{html}");
  }

  #[tokio::test]
  async fn theme_put_rejects_missing_or_unknown_mode() {
    let state = make_state().await;

    let missing = send(state.clone(), "PUT", "/api/theme", true,
      Some(json!({ "vault": "demo" }))).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let unknown = send(state, "PUT", "/api/theme", true,
      Some(json!({ "vault": "demo", "mode": "sepia", "theme": {} }))).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
  }

  // ── Listing and deletion ─────────────────────────────────────────────────

  #[tokio::test]
  async fn listing_requires_a_vault_parameter() {
    let resp = send(make_state().await, "GET", "/api/notes", true, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn delete_removes_from_listing_and_is_idempotent() {
    let state = make_state().await;
    let receipt = body_json(
      send(state.clone(), "POST", "/api/share", true,
        Some(share_body("demo", "Doomed", "x"))).await,
    )
    .await;
    let hash = receipt["hash"].as_str().unwrap().to_string();
    let uri = format!("/api/notes/demo/doomed/{hash}");

    let first = send(state.clone(), "DELETE", &uri, true, None).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await, json!({ "success": true }));

    let listing = body_json(
      send(state.clone(), "GET", "/api/notes?vault=demo", true, None).await,
    )
    .await;
    assert_eq!(listing, json!([]));

    // Deleting again still succeeds.
    let second = send(state.clone(), "DELETE", &uri, true, None).await;
    assert_eq!(second.status(), StatusCode::OK);

    // And the view path now hides it.
    let view = send(state, "GET", &format!("/g/demo/doomed/{hash}"), false, None).await;
    assert_eq!(view.status(), StatusCode::NOT_FOUND);
  }

  // ── View path hardening ──────────────────────────────────────────────────

  #[tokio::test]
  async fn vault_mismatch_renders_the_same_not_found_page() {
    let state = make_state().await;
    let receipt = body_json(
      send(state.clone(), "POST", "/api/share", true,
        Some(share_body("demo", "Secret", "hidden"))).await,
    )
    .await;
    let hash = receipt["hash"].as_str().unwrap().to_string();

    let wrong_vault = send(
      state.clone(),
      "GET",
      &format!("/g/other/secret/{hash}"),
      false,
      None,
    )
    .await;
    assert_eq!(wrong_vault.status(), StatusCode::NOT_FOUND);
    let mismatch_page = body_text(wrong_vault).await;
    assert!(mismatch_page.contains("Note not found"), "{mismatch_page}");
    assert!(!mismatch_page.contains("hidden"), "{mismatch_page}");

    let missing = send(state, "GET", "/g/demo/never/00000000", false, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(missing).await, mismatch_page);
  }

  // ── Images ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn image_upload_and_public_serve_round_trip() {
    let state = make_state().await;

    let upload = Request::builder()
      .method("POST")
      .uri("/api/images/a1b2c3d4")
      .header(header::AUTHORIZATION, KEY)
      .header(header::CONTENT_TYPE, "image/webp")
      .header(handlers::images::FILENAME_HEADER, "chart.webp")
      .body(Body::from(vec![1u8, 2, 3]))
      .unwrap();
    let resp = router(state.clone()).oneshot(upload).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["key"], "images/a1b2c3d4/chart.webp");
    assert_eq!(body["url"], "http://localhost:8123/i/a1b2c3d4/chart.webp");

    let served = send(state, "GET", "/i/a1b2c3d4/chart.webp", false, None).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(
      served.headers().get(header::CONTENT_TYPE).unwrap(),
      "image/webp"
    );
    let cache = served
      .headers()
      .get(header::CACHE_CONTROL)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(cache.contains("max-age=31536000"), "{cache}");
    let bytes = axum::body::to_bytes(served.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.to_vec(), vec![1, 2, 3]);
  }

  #[tokio::test]
  async fn image_upload_without_filename_is_rejected() {
    let state = make_state().await;
    let upload = Request::builder()
      .method("POST")
      .uri("/api/images/a1b2c3d4")
      .header(header::AUTHORIZATION, KEY)
      .header(header::CONTENT_TYPE, "image/webp")
      .body(Body::from(vec![1u8]))
      .unwrap();
    let resp = router(state).oneshot(upload).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn missing_image_is_404() {
    let resp = send(make_state().await, "GET", "/i/ffffffff/none.webp", false, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
