//! The per-vault theme store.
//!
//! Reads sit on the hot view path, so they go through a short TTL cache
//! (absence is cached too). Writes read-merge-write the stored record so
//! one mode never clobbers the other, then invalidate the cache entry
//! immediately. Another process instance may still serve a stale theme
//! for up to the TTL after an external write; that window is accepted.

use std::sync::Arc;

use chrono::Duration;

use evergreen_core::{
  keys,
  store::ObjectStore,
  theme::{DualTheme, ThemeMode, ThemeSettings},
};

use crate::{
  cache::{Clock, SystemClock, TtlCache},
  repo::OpError,
};

/// How long a cached theme may be served before re-reading storage.
const CACHE_TTL_MINUTES: i64 = 5;

pub struct ThemeStore<S> {
  store: Arc<S>,
  cache: TtlCache<Option<DualTheme>>,
  clock: Arc<dyn Clock>,
}

impl<S: ObjectStore> ThemeStore<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self::with_clock(store, Arc::new(SystemClock))
  }

  /// Injectable clock so tests can advance time instead of sleeping.
  pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self {
      store,
      cache: TtlCache::new(Duration::minutes(CACHE_TTL_MINUTES)),
      clock,
    }
  }

  /// The vault's theme record, if it has one. Cached.
  pub async fn get(&self, vault: &str) -> Result<Option<DualTheme>, OpError> {
    let now = self.clock.now();
    if let Some(cached) = self.cache.get(vault, now) {
      return Ok(cached);
    }

    let key = keys::theme_key(vault);
    let theme = match self.store.get(&key).await.map_err(OpError::store)? {
      Some(obj) => Some(DualTheme::from_bytes(&obj.bytes)?),
      None => None,
    };

    self.cache.put(vault, theme.clone(), now);
    Ok(theme)
  }

  /// Merge one mode's settings into the vault's record.
  pub async fn set(
    &self,
    vault: &str,
    mode: ThemeMode,
    settings: ThemeSettings,
  ) -> Result<(), OpError> {
    let key = keys::theme_key(vault);
    let mut theme = match self.store.get(&key).await.map_err(OpError::store)? {
      Some(obj) => DualTheme::from_bytes(&obj.bytes)?,
      None => DualTheme::default(),
    };

    theme.merge(mode, settings, self.clock.now());
    self
      .store
      .put(&key, theme.to_bytes()?, "application/json")
      .await
      .map_err(OpError::store)?;

    self.cache.invalidate(vault);
    Ok(())
  }
}
