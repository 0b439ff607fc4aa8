//! Note identity derivation.
//!
//! A note's public address is fully determined by `(vault, title)`: the
//! slug is a normalised form of the title and the hash is a truncated
//! SHA-256 digest of `"{vault}:{title}"`. Both are pure functions, so the
//! publishing client can compute the final URL before any network round
//! trip. Re-publishing the same title in the same vault always lands on
//! the same address (update-in-place).

use sha2::{Digest, Sha256};

/// Number of leading digest bytes kept in a note hash (8 hex characters).
///
/// Truncation collisions are an accepted risk: widening the hash would
/// invalidate every previously shared URL.
pub const HASH_BYTES: usize = 4;

/// Normalise a title into its URL slug.
///
/// Lowercases, collapses every maximal run of non `[a-z0-9]` characters
/// into a single hyphen, and strips leading/trailing hyphens.
/// Idempotent: `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(title: &str) -> String {
  let mut slug = String::with_capacity(title.len());
  let mut pending_hyphen = false;

  for c in title.chars() {
    let c = c.to_ascii_lowercase();
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(c);
    } else {
      pending_hyphen = true;
    }
  }

  slug
}

/// Derive the short identity hash for a note from its vault and title.
///
/// SHA-256 over the UTF-8 string `"{vault}:{title}"`, truncated to
/// [`HASH_BYTES`] leading bytes, lowercase hex. Content plays no part:
/// the hash addresses the note, not a revision of it.
pub fn note_hash(vault: &str, title: &str) -> String {
  let digest = Sha256::digest(format!("{vault}:{title}").as_bytes());
  hex::encode(&digest[..HASH_BYTES])
}
