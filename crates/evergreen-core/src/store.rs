//! The `ObjectStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `evergreen-store-sqlite`). Higher layers (the repository, the theme
//! store, the sweep) depend on this abstraction, not on any concrete
//! backend. It is the system's only persistence substrate: every record
//! is an opaque blob at a string key.

use std::future::Future;

// ─── Values ──────────────────────────────────────────────────────────────────

/// A stored blob together with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
  pub bytes:        Vec<u8>,
  /// MIME type recorded at put time; served back verbatim for images.
  pub content_type: String,
}

/// One page of keys from [`ObjectStore::list`].
///
/// Callers loop until `truncated` is false, passing `cursor` back in.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
  /// Matching keys in ascending key order.
  pub keys:      Vec<String>,
  /// Opaque continuation token; `Some` iff `truncated`.
  pub cursor:    Option<String>,
  pub truncated: bool,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a key/value object store.
///
/// Implementations must provide read-after-write consistency within a
/// single call chain: a `get` issued after a `put` of the same key
/// observes that write. `delete` is idempotent; removing an absent key
/// succeeds.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ObjectStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the object at `key`. Returns `None` if absent — absence is a
  /// normal outcome, never an error.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<StoredObject>, Self::Error>> + Send + 'a;

  /// Write (or overwrite) the object at `key`.
  fn put<'a>(
    &'a self,
    key: &'a str,
    bytes: Vec<u8>,
    content_type: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove the object at `key`, succeeding whether or not it exists.
  fn delete<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Page through keys starting with `prefix`, in key order.
  ///
  /// `cursor` is the token from a previous page (`None` for the first);
  /// at most `limit` keys are returned per page.
  fn list<'a>(
    &'a self,
    prefix: &'a str,
    cursor: Option<String>,
    limit: usize,
  ) -> impl Future<Output = Result<ListPage, Self::Error>> + Send + 'a;
}
