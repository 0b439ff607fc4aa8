//! Integration tests for `SqliteStore` against an in-memory database.

use evergreen_core::store::{ObjectStore, StoredObject};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Get / put ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_then_get_round_trips() {
  let s = store().await;

  s.put("notes/a-11111111.json", b"{\"x\":1}".to_vec(), "application/json")
    .await
    .unwrap();

  let got = s.get("notes/a-11111111.json").await.unwrap().unwrap();
  assert_eq!(
    got,
    StoredObject {
      bytes:        b"{\"x\":1}".to_vec(),
      content_type: "application/json".into(),
    }
  );
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get("notes/missing.json").await.unwrap().is_none());
}

#[tokio::test]
async fn put_overwrites_in_place() {
  let s = store().await;

  s.put("demo/index.json", b"[]".to_vec(), "application/json")
    .await
    .unwrap();
  s.put("demo/index.json", b"[1]".to_vec(), "application/json")
    .await
    .unwrap();

  let got = s.get("demo/index.json").await.unwrap().unwrap();
  assert_eq!(got.bytes, b"[1]");
}

#[tokio::test]
async fn content_type_is_preserved() {
  let s = store().await;

  s.put("images/ab/pic.webp", vec![1, 2, 3], "image/webp")
    .await
    .unwrap();

  let got = s.get("images/ab/pic.webp").await.unwrap().unwrap();
  assert_eq!(got.content_type, "image/webp");
  assert_eq!(got.bytes, vec![1, 2, 3]);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_object() {
  let s = store().await;

  s.put("k", vec![0], "application/octet-stream").await.unwrap();
  s.delete("k").await.unwrap();
  assert!(s.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_is_a_success() {
  let s = store().await;
  s.delete("never-existed").await.unwrap();
}

// ─── List ────────────────────────────────────────────────────────────────────

async fn seed_keys(s: &SqliteStore, keys: &[&str]) {
  for key in keys {
    s.put(key, vec![], "application/octet-stream").await.unwrap();
  }
}

#[tokio::test]
async fn list_filters_by_prefix() {
  let s = store().await;
  seed_keys(&s, &[
    "notes/a-11111111.json",
    "notes/b-22222222.json",
    "demo/index.json",
    "images/11111111/pic.webp",
  ])
  .await;

  let page = s.list("notes/", None, 10).await.unwrap();
  assert_eq!(page.keys, vec![
    "notes/a-11111111.json".to_string(),
    "notes/b-22222222.json".to_string(),
  ]);
  assert!(!page.truncated);
  assert!(page.cursor.is_none());
}

#[tokio::test]
async fn list_paginates_with_cursor_until_exhausted() {
  let s = store().await;
  let keys: Vec<String> = (0..7).map(|i| format!("notes/n{i}.json")).collect();
  for key in &keys {
    s.put(key, vec![], "application/octet-stream").await.unwrap();
  }

  let mut seen = Vec::new();
  let mut cursor = None;
  loop {
    let page = s.list("notes/", cursor, 3).await.unwrap();
    assert!(page.keys.len() <= 3);
    seen.extend(page.keys);
    if !page.truncated {
      break;
    }
    cursor = page.cursor;
    assert!(cursor.is_some());
  }

  assert_eq!(seen, keys);
}

#[tokio::test]
async fn list_treats_underscore_literally() {
  // `_` is a LIKE wildcard; the prefix must be escaped so `images/a_b/`
  // does not also match `images/axb/`.
  let s = store().await;
  seed_keys(&s, &["images/a_b/x.webp", "images/axb/y.webp"]).await;

  let page = s.list("images/a_b/", None, 10).await.unwrap();
  assert_eq!(page.keys, vec!["images/a_b/x.webp".to_string()]);
}

#[tokio::test]
async fn list_empty_prefix_returns_everything() {
  let s = store().await;
  seed_keys(&s, &["a", "b", "c"]).await;

  let page = s.list("", None, 10).await.unwrap();
  assert_eq!(page.keys.len(), 3);
}
