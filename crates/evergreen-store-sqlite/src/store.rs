//! [`SqliteStore`] — the SQLite implementation of [`ObjectStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use evergreen_core::store::{ListPage, ObjectStore, StoredObject};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An object store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Escape `\`, `%`, and `_` so a key prefix can be used verbatim in a
/// `LIKE … ESCAPE '\'` pattern. Image filenames routinely contain `_`.
fn escape_like_prefix(prefix: &str) -> String {
  let mut out = String::with_capacity(prefix.len() + 1);
  for c in prefix.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

impl ObjectStore for SqliteStore {
  type Error = Error;

  async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
    let key = key.to_string();
    let row = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT body, content_type FROM objects WHERE key = ?1",
            rusqlite::params![key],
            |r| {
              Ok(StoredObject {
                bytes:        r.get(0)?,
                content_type: r.get(1)?,
              })
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;
    Ok(row)
  }

  async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
    let key = key.to_string();
    let content_type = content_type.to_string();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO objects (key, body, content_type) VALUES (?1, ?2, ?3)
           ON CONFLICT (key) DO UPDATE
           SET body = excluded.body, content_type = excluded.content_type",
          rusqlite::params![key, bytes, content_type],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<()> {
    let key = key.to_string();
    self
      .conn
      .call(move |conn| {
        // Removing an absent key is a success, per the trait contract.
        conn.execute("DELETE FROM objects WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list(
    &self,
    prefix: &str,
    cursor: Option<String>,
    limit: usize,
  ) -> Result<ListPage> {
    let pattern = escape_like_prefix(prefix);
    let after = cursor.unwrap_or_default();
    let limit = limit.max(1);

    let mut keys = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT key FROM objects
           WHERE key LIKE ?1 ESCAPE '\\' AND key > ?2
           ORDER BY key
           LIMIT ?3",
        )?;
        // Fetch one extra row to learn whether another page exists.
        let rows = stmt
          .query_map(rusqlite::params![pattern, after, limit + 1], |r| {
            r.get::<_, String>(0)
          })?
          .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
      })
      .await?;

    let truncated = keys.len() > limit;
    if truncated {
      keys.truncate(limit);
    }
    let cursor = truncated.then(|| keys.last().cloned()).flatten();

    Ok(ListPage { keys, cursor, truncated })
  }
}
