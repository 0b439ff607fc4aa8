//! Note and index records.
//!
//! Both are stored as JSON objects with camelCase field names: the same
//! wire format the publishing plugin produces and the view path consumes.
//! A note's address never changes across re-publishes; only `content`,
//! `linkedNotes`, `retentionDays`, and `updatedAt` move.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A reference to another note published in the same operation.
///
/// The render engine resolves `[[wikilinks]]` against this table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRef {
  pub title_slug: String,
  pub hash:       String,
}

/// A published note, stored at `notes/{titleSlug}-{hash}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  /// Owning namespace. The key is global; this field gates the view path.
  pub vault:          String,
  pub title_slug:     String,
  pub hash:           String,
  pub title:          String,
  /// Raw extended-markdown source.
  pub content:        String,
  /// Set at first publish, preserved across re-publishes.
  pub created_at:     DateTime<Utc>,
  /// Refreshed on every write.
  pub updated_at:     DateTime<Utc>,
  #[serde(default)]
  pub linked_notes:   Vec<NoteRef>,
  /// Days until the retention sweep may delete this note; 0 = never.
  #[serde(default)]
  pub retention_days: u32,
}

impl Note {
  /// When this note becomes eligible for the retention sweep, if ever.
  /// Measured from the last update.
  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    if self.retention_days == 0 {
      return None;
    }
    Some(self.updated_at + chrono::Duration::days(self.retention_days as i64))
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(self)?)
  }

  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    Ok(serde_json::from_slice(bytes)?)
  }
}

/// One line of a vault's listing, stored newest first in
/// `{vault}/index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
  pub title_slug: String,
  pub hash:       String,
  pub title:      String,
  pub created_at: DateTime<Utc>,
}

impl IndexEntry {
  pub fn for_note(note: &Note) -> Self {
    Self {
      title_slug: note.title_slug.clone(),
      hash:       note.hash.clone(),
      title:      note.title.clone(),
      created_at: note.created_at,
    }
  }

  /// Identity match: the index holds at most one entry per pair.
  pub fn is_for(&self, slug: &str, hash: &str) -> bool {
    self.title_slug == slug && self.hash == hash
  }
}

/// The per-vault index: a denormalised read model over the vault's live
/// notes. Never the source of truth for a note's existence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Index {
  pub entries: Vec<IndexEntry>,
}

impl Index {
  /// Remove any stale entry for the note, then prepend a fresh one, so a
  /// re-published note moves to the front instead of duplicating.
  pub fn upsert_front(&mut self, entry: IndexEntry) {
    self
      .entries
      .retain(|e| !e.is_for(&entry.title_slug, &entry.hash));
    self.entries.insert(0, entry);
  }

  pub fn remove(&mut self, slug: &str, hash: &str) {
    self.entries.retain(|e| !e.is_for(slug, hash));
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(self)?)
  }

  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    Ok(serde_json::from_slice(bytes)?)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn note(slug: &str, hash: &str) -> Note {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Note {
      vault:          "demo".into(),
      title_slug:     slug.into(),
      hash:           hash.into(),
      title:          slug.into(),
      content:        String::new(),
      created_at:     ts,
      updated_at:     ts,
      linked_notes:   vec![],
      retention_days: 0,
    }
  }

  #[test]
  fn note_json_uses_camel_case_fields() {
    let json = serde_json::to_value(note("a", "11111111")).unwrap();
    assert!(json.get("titleSlug").is_some());
    assert!(json.get("createdAt").is_some());
    assert!(json.get("linkedNotes").is_some());
    assert!(json.get("retentionDays").is_some());
  }

  #[test]
  fn note_with_zero_retention_never_expires() {
    assert_eq!(note("a", "11111111").expires_at(), None);
  }

  #[test]
  fn retention_counts_from_last_update() {
    let mut n = note("a", "11111111");
    n.retention_days = 7;
    n.updated_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    assert_eq!(
      n.expires_at().unwrap(),
      Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap()
    );
  }

  #[test]
  fn upsert_front_moves_existing_entry_forward() {
    let mut index = Index::default();
    index.upsert_front(IndexEntry::for_note(&note("a", "11111111")));
    index.upsert_front(IndexEntry::for_note(&note("b", "22222222")));
    assert_eq!(index.entries[0].title_slug, "b");

    index.upsert_front(IndexEntry::for_note(&note("a", "11111111")));
    assert_eq!(index.entries.len(), 2);
    assert_eq!(index.entries[0].title_slug, "a");
  }

  #[test]
  fn remove_is_a_noop_for_unknown_entries() {
    let mut index = Index::default();
    index.upsert_front(IndexEntry::for_note(&note("a", "11111111")));
    index.remove("missing", "00000000");
    assert_eq!(index.entries.len(), 1);
  }

  #[test]
  fn index_serialises_as_a_bare_array() {
    let mut index = Index::default();
    index.upsert_front(IndexEntry::for_note(&note("a", "11111111")));
    let json = serde_json::to_value(&index).unwrap();
    assert!(json.is_array());
  }
}
