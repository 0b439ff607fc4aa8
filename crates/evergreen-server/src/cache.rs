//! A small TTL cache with an injected clock.
//!
//! Used by the theme store to keep the hot view path off storage. The
//! cache is an explicit object — `(value, expires_at)` per key — rather
//! than ambient process state, and every call takes "now" from the
//! caller, who owns a [`Clock`], so tests can advance time instead of
//! sleeping. Expiry is lazy: entries are checked on read, never actively
//! swept.

use std::{collections::HashMap, sync::RwLock};

use chrono::{DateTime, Duration, Utc};

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of the current time.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

// ─── Cache ───────────────────────────────────────────────────────────────────

/// String-keyed cache where every entry lives for a fixed TTL.
///
/// Last-writer-wins and short-lived by design: it is never a source of
/// truth, so a stale read within the TTL window is acceptable.
pub struct TtlCache<V> {
  ttl:     Duration,
  entries: RwLock<HashMap<String, (V, DateTime<Utc>)>>,
}

impl<V: Clone> TtlCache<V> {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entries: RwLock::new(HashMap::new()) }
  }

  /// Fetch a live entry; an expired one is treated as absent.
  pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
    let entries = self.entries.read().expect("cache lock poisoned");
    let (value, expires_at) = entries.get(key)?;
    (now < *expires_at).then(|| value.clone())
  }

  pub fn put(&self, key: &str, value: V, now: DateTime<Utc>) {
    let mut entries = self.entries.write().expect("cache lock poisoned");
    entries.insert(key.to_string(), (value, now + self.ttl));
  }

  pub fn invalidate(&self, key: &str) {
    let mut entries = self.entries.write().expect("cache lock poisoned");
    entries.remove(key);
  }
}
