//! Object-store key layout and public URL paths.
//!
//! The whole persisted state lives in four key families:
//!
//! | Key | Record |
//! |-----|--------|
//! | `notes/{titleSlug}-{hash}.json` | note (global, self-describes its vault) |
//! | `{vault}/index.json` | per-vault listing |
//! | `{vault}/theme.json` | per-vault dual theme |
//! | `images/{noteHash}/{filename}` | binary image |

/// Prefix under which every note object is stored.
pub const NOTES_PREFIX: &str = "notes/";

pub fn note_key(slug: &str, hash: &str) -> String {
  format!("notes/{slug}-{hash}.json")
}

pub fn index_key(vault: &str) -> String { format!("{vault}/index.json") }

pub fn theme_key(vault: &str) -> String { format!("{vault}/theme.json") }

/// Prefix holding every image owned by one note; scanned on deletion.
pub fn image_prefix(note_hash: &str) -> String {
  format!("images/{note_hash}/")
}

pub fn image_key(note_hash: &str, filename: &str) -> String {
  format!("images/{note_hash}/{filename}")
}

/// Public view path for a note, relative to the server base URL.
pub fn note_path(vault: &str, slug: &str, hash: &str) -> String {
  format!("/g/{vault}/{slug}/{hash}")
}

/// Absolute view URL for a note.
pub fn note_url(base_url: &str, vault: &str, slug: &str, hash: &str) -> String {
  format!(
    "{}{}",
    base_url.trim_end_matches('/'),
    note_path(vault, slug, hash)
  )
}

/// Public serving path for an image, relative to the server base URL.
pub fn image_path(note_hash: &str, filename: &str) -> String {
  format!("/i/{note_hash}/{filename}")
}
