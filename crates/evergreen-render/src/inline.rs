//! Inline rewrite passes: highlights, tags, and checkboxes.
//!
//! Each pass is a plain text rewrite over the whole note body. They run
//! after the callout pass (so callout bodies are included) and before the
//! wikilink pass and the final GFM parse. None of them is markdown-aware:
//! a pattern inside a fenced code block is rewritten too. That heuristic
//! is an accepted limitation of the dialect.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// ─── Highlights ──────────────────────────────────────────────────────────────

static HIGHLIGHT: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"==([^\n=][^\n]*?)==").expect("highlight pattern"));

/// `==text==` → `<mark>text</mark>`. Unterminated markers stay literal.
pub fn highlights(text: &str) -> String {
  HIGHLIGHT.replace_all(text, "<mark>$1</mark>").into_owned()
}

// ─── Tags ────────────────────────────────────────────────────────────────────

// A `#` opens a tag only at a line start or after whitespace; the token
// must start with a letter or underscore so headings and URL fragments
// stay untouched.
static TAG: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?m)(^|\s)#([A-Za-z_][A-Za-z0-9_/-]*)").expect("tag pattern")
});

/// `#identifier` → a styled tag chip.
pub fn tags(text: &str) -> String {
  TAG
    .replace_all(text, |caps: &Captures| {
      format!(
        "{}<span class=\"tag\">#{}</span>",
        &caps[1], &caps[2]
      )
    })
    .into_owned()
}

// ─── Checkboxes ──────────────────────────────────────────────────────────────

static CHECKBOX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?m)^(\s*)- \[( |x|X)\] ").expect("checkbox pattern")
});

/// `- [x]` / `- [ ]` list items → disabled checkbox inputs with the
/// checked state preserved.
pub fn checkboxes(text: &str) -> String {
  CHECKBOX
    .replace_all(text, |caps: &Captures| {
      let checked = if &caps[2] == " " { "" } else { " checked" };
      format!(
        "{}- <input type=\"checkbox\" disabled{checked}> ",
        &caps[1]
      )
    })
    .into_owned()
}
