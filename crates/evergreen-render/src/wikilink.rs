//! Internal-link (`[[wikilink]]`) pass.
//!
//! Input contract: text after the checkbox pass. `[[Target]]` and
//! `[[Target|Display Text]]` are resolved by slugifying the target and
//! looking it up in the note's linked-note table. A hit becomes a
//! hyperlink to the linked note's view URL; a miss becomes a visually
//! distinct "unresolved" span rather than a broken link — the viewed note
//! may reference notes that were not part of this publish.

use evergreen_core::{identity::slugify, keys, note::NoteRef};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::escape::escape_html;

static WIKILINK: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\[\[([^\[\]|\n]+)(?:\|([^\[\]\n]+))?\]\]").expect("wikilink pattern")
});

/// Rewrite every `[[...]]` in `text` against `linked`, linking into
/// `vault`'s namespace.
pub fn rewrite(text: &str, vault: &str, linked: &[NoteRef]) -> String {
  WIKILINK
    .replace_all(text, |caps: &Captures| {
      let target = caps[1].trim();
      let display = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(target);

      let slug = slugify(target);
      match linked.iter().find(|r| r.title_slug == slug) {
        Some(r) => format!(
          "<a class=\"internal-link\" href=\"{}\">{}</a>",
          keys::note_path(vault, &r.title_slug, &r.hash),
          escape_html(display)
        ),
        None => format!(
          "<span class=\"unresolved-link\">{}</span>",
          escape_html(display)
        ),
      }
    })
    .into_owned()
}
