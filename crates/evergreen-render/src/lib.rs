//! Markdown render engine for Evergreen.
//!
//! Turns one note's raw extended-markdown source into a complete themed
//! HTML document. The dialect extensions are applied as ordered
//! text-rewrite passes — each pass assumes the text shape produced by the
//! previous one — and the result is handed to a GFM parser:
//!
//!   raw content
//!     └─ callout::rewrite()    → callout blocks become HTML wrappers
//!          └─ inline::highlights() → `==x==` becomes `<mark>`
//!               └─ inline::tags()      → `#x` becomes a tag chip
//!                    └─ inline::checkboxes() → `- [x]` becomes an input
//!                         └─ wikilink::rewrite()  → `[[x]]` becomes a link
//!                              └─ markdown::to_html()  → final GFM parse
//!
//! Rendering never fails: a construct that does not match its expected
//! pattern is left as literal text, and a missing theme renders with the
//! built-in defaults.

pub mod callout;
pub mod escape;
pub mod inline;
pub mod markdown;
pub mod page;
pub mod theme_css;
pub mod wikilink;

use evergreen_core::{note::Note, theme::DualTheme};

/// Render a note's content through the full dialect pipeline, without the
/// surrounding document. Produces an HTML fragment.
pub fn render_body(note: &Note) -> String {
  let text = callout::rewrite(&note.content);
  let text = inline::highlights(&text);
  let text = inline::tags(&text);
  let text = inline::checkboxes(&text);
  let text = wikilink::rewrite(&text, &note.vault, &note.linked_notes);
  markdown::to_html(&text)
}

/// Render a note as a complete HTML document with the vault's theme (or
/// the built-in defaults for any missing mode).
pub fn render_note(note: &Note, theme: &DualTheme) -> String {
  let body = render_body(note);
  let css = theme_css::stylesheet(&theme.light_or_default(), &theme.dark_or_default());
  let description = page::description(&body);
  page::document(&note.title, &body, &css, &description)
}

/// The public "note not found" page, styled with the default theme.
///
/// Served for both a missing note and a vault mismatch, so the two cases
/// are indistinguishable from outside.
pub fn not_found_page() -> String {
  use evergreen_core::theme::ThemeSettings;
  let css = theme_css::stylesheet(
    &ThemeSettings::default_light(),
    &ThemeSettings::default_dark(),
  );
  page::document(
    "Note not found",
    "<h2>Note not found</h2>\n<p>This note does not exist or is no longer shared.</p>",
    &css,
    "Note not found",
  )
}
