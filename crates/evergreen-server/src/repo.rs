//! The note repository: publish, list, delete, and fetch, built on any
//! [`ObjectStore`].
//!
//! The repository owns the multi-object write discipline. A publish is an
//! ordered saga: every linked note is written first (concurrently, they
//! touch independent keys), then the primary note that references them,
//! then one index update covering the whole batch. There is no multi-key
//! transaction underneath — a crash between note and index leaves a note
//! that is viewable by URL but missing from listings, never an index
//! entry with no backing note. Deletion fans out over the note object,
//! its image prefix, and its index entry concurrently; the retention
//! sweep drives the same path.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinSet;

use evergreen_core::{
  identity::{note_hash, slugify},
  keys,
  note::{Index, IndexEntry, Note, NoteRef},
  store::ObjectStore,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A repository operation failure. Absence is never an error — missing
/// objects surface as `None`/empty results.
#[derive(Debug, Error)]
pub enum OpError {
  #[error("store fault: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("encoding error: {0}")]
  Encoding(#[from] evergreen_core::Error),
}

impl OpError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

// ─── Requests and receipts ───────────────────────────────────────────────────

/// One note to publish alongside the primary (a "linked note").
#[derive(Debug, Clone)]
pub struct LinkedInput {
  pub title:   String,
  pub content: String,
}

/// Input to [`NoteRepository::publish`].
#[derive(Debug, Clone)]
pub struct PublishRequest {
  pub vault:          String,
  pub title:          String,
  pub content:        String,
  pub linked:         Vec<LinkedInput>,
  pub retention_days: u32,
}

/// What a successful publish returns to the client.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
  pub url:        String,
  pub title_slug: String,
  pub hash:       String,
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// CRUD over notes and the per-vault index.
pub struct NoteRepository<S> {
  store:    Arc<S>,
  base_url: String,
}

impl<S> NoteRepository<S>
where
  S: ObjectStore + 'static,
{
  pub fn new(store: Arc<S>, base_url: impl Into<String>) -> Self {
    Self { store, base_url: base_url.into() }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Publish ───────────────────────────────────────────────────────────

  /// Publish the primary note and its linked notes.
  ///
  /// The receipt's URL is fully determined by `(vault, title)` before any
  /// storage round trip; re-publishing the same pair overwrites in place
  /// and preserves the original `createdAt`.
  pub async fn publish(&self, req: PublishRequest) -> Result<PublishReceipt, OpError> {
    let PublishRequest { vault, title, content, linked, retention_days } = req;

    let primary_ref = NoteRef {
      title_slug: slugify(&title),
      hash:       note_hash(&vault, &title),
    };
    let linked_refs: Vec<NoteRef> = linked
      .iter()
      .map(|input| NoteRef {
        title_slug: slugify(&input.title),
        hash:       note_hash(&vault, &input.title),
      })
      .collect();

    // Linked notes first, concurrently: independent keys. Each record
    // carries the rest of the batch as its own link table, so a linked
    // note viewed directly still resolves its siblings.
    let mut tasks: JoinSet<(usize, Result<Note, OpError>)> = JoinSet::new();
    for (i, input) in linked.into_iter().enumerate() {
      let store = Arc::clone(&self.store);
      let vault = vault.clone();
      let own = linked_refs[i].clone();
      let table: Vec<NoteRef> = std::iter::once(primary_ref.clone())
        .chain(linked_refs.iter().cloned())
        .filter(|r| *r != own)
        .collect();
      tasks.spawn(async move {
        let written =
          store_note(&*store, vault, input.title, input.content, table, retention_days)
            .await;
        (i, written)
      });
    }

    let mut linked_notes: Vec<Option<Note>> = vec![None; linked_refs.len()];
    while let Some(joined) = tasks.join_next().await {
      let (i, written) = joined.map_err(OpError::store)?;
      linked_notes[i] = Some(written?);
    }

    // The primary is written last, so a success response implies every
    // note it references is already durable.
    let primary = store_note(
      &*self.store,
      vault.clone(),
      title,
      content,
      linked_refs,
      retention_days,
    )
    .await?;

    // One remove-then-prepend pass per written note; the primary ends up
    // at the front of the listing.
    let mut index = self.load_index(&vault).await?;
    for note in linked_notes.into_iter().flatten() {
      index.upsert_front(IndexEntry::for_note(&note));
    }
    index.upsert_front(IndexEntry::for_note(&primary));
    self.save_index(&vault, &index).await?;

    Ok(PublishReceipt {
      url:        keys::note_url(
        &self.base_url,
        &vault,
        &primary.title_slug,
        &primary.hash,
      ),
      title_slug: primary.title_slug,
      hash:       primary.hash,
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// A vault's listing, newest first. A vault with no index yet is an
  /// empty listing, not an error.
  pub async fn list(&self, vault: &str) -> Result<Vec<IndexEntry>, OpError> {
    Ok(self.load_index(vault).await?.entries)
  }

  /// Fetch a note by its global address. The caller is responsible for
  /// checking `note.vault` against any vault taken from a URL.
  pub async fn get(&self, slug: &str, hash: &str) -> Result<Option<Note>, OpError> {
    let key = keys::note_key(slug, hash);
    match self.store.get(&key).await.map_err(OpError::store)? {
      Some(obj) => Ok(Some(Note::from_bytes(&obj.bytes)?)),
      None => Ok(None),
    }
  }

  // ── Delete ────────────────────────────────────────────────────────────

  /// Remove a note, its images, and its index entry; the three deletions
  /// run concurrently. Idempotent: deleting an absent note succeeds.
  pub async fn delete(&self, vault: &str, slug: &str, hash: &str) -> Result<(), OpError> {
    let note_key = keys::note_key(slug, hash);
    tokio::try_join!(
      async {
        self.store.delete(&note_key).await.map_err(OpError::store)
      },
      self.delete_images(hash),
      self.remove_index_entry(vault, slug, hash),
    )?;
    Ok(())
  }

  /// Best-effort removal of everything under the note's image prefix.
  async fn delete_images(&self, hash: &str) -> Result<(), OpError> {
    let prefix = keys::image_prefix(hash);
    loop {
      let page = self
        .store
        .list(&prefix, None, 100)
        .await
        .map_err(OpError::store)?;
      for key in &page.keys {
        self.store.delete(key).await.map_err(OpError::store)?;
      }
      // Deleting shrinks the prefix, so each page restarts from the top.
      if !page.truncated {
        return Ok(());
      }
    }
  }

  async fn remove_index_entry(&self, vault: &str, slug: &str, hash: &str) -> Result<(), OpError> {
    let mut index = self.load_index(vault).await?;
    let before = index.entries.len();
    index.remove(slug, hash);
    if index.entries.len() != before {
      self.save_index(vault, &index).await?;
    }
    Ok(())
  }

  // ── Index plumbing ────────────────────────────────────────────────────

  async fn load_index(&self, vault: &str) -> Result<Index, OpError> {
    let key = keys::index_key(vault);
    let Some(obj) = self.store.get(&key).await.map_err(OpError::store)? else {
      return Ok(Index::default());
    };
    match Index::from_bytes(&obj.bytes) {
      Ok(index) => Ok(index),
      Err(e) => {
        // A corrupt index is a lost listing, not a lost note; rebuildable
        // by re-publishing, so start over rather than failing the write.
        tracing::warn!(vault, error = %e, "discarding unreadable index");
        Ok(Index::default())
      }
    }
  }

  async fn save_index(&self, vault: &str, index: &Index) -> Result<(), OpError> {
    let key = keys::index_key(vault);
    self
      .store
      .put(&key, index.to_bytes()?, "application/json")
      .await
      .map_err(OpError::store)
  }
}

/// Write one note record, preserving `createdAt` across re-publishes.
async fn store_note<S: ObjectStore>(
  store: &S,
  vault: String,
  title: String,
  content: String,
  linked_notes: Vec<NoteRef>,
  retention_days: u32,
) -> Result<Note, OpError> {
  let title_slug = slugify(&title);
  let hash = note_hash(&vault, &title);
  let key = keys::note_key(&title_slug, &hash);

  let existing = store
    .get(&key)
    .await
    .map_err(OpError::store)?
    .and_then(|obj| Note::from_bytes(&obj.bytes).ok());

  let now = Utc::now();
  let note = Note {
    vault,
    title_slug,
    hash,
    title,
    content,
    created_at: existing.map(|n| n.created_at).unwrap_or(now),
    updated_at: now,
    linked_notes,
    retention_days,
  };

  store
    .put(&key, note.to_bytes()?, "application/json")
    .await
    .map_err(OpError::store)?;
  Ok(note)
}
