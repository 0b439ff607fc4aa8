//! Document assembly: wraps a rendered body in the full HTML page.
//!
//! The page carries the stylesheet inline (one request per view), a
//! plain-text description for link previews, and the theme toggle that
//! cycles system → opposite → system.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::escape::escape_html;

/// Target length for the link-preview description.
const DESCRIPTION_CHARS: usize = 160;

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("space pattern"));

/// Extract a plain-text description from a rendered HTML fragment: tags
/// stripped, whitespace collapsed, cut at roughly [`DESCRIPTION_CHARS`].
pub fn description(body_html: &str) -> String {
  let text = TAGS.replace_all(body_html, " ");
  let text = SPACE.replace_all(&text, " ");
  let text = text.trim();

  match text.char_indices().nth(DESCRIPTION_CHARS) {
    Some((cut, _)) => format!("{}…", &text[..cut].trim_end()),
    None => text.to_string(),
  }
}

/// Assemble the final document.
pub fn document(title: &str, body_html: &str, css: &str, description: &str) -> String {
  let title = escape_html(title);
  let description = escape_html(description);
  format!(
    "<!DOCTYPE html>\n\
     <html lang=\"en\">\n\
     <head>\n\
     <meta charset=\"utf-8\">\n\
     <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
     <meta name=\"description\" content=\"{description}\">\n\
     <meta property=\"og:title\" content=\"{title}\">\n\
     <meta property=\"og:description\" content=\"{description}\">\n\
     <title>{title}</title>\n\
     <style>\n{css}</style>\n\
     </head>\n\
     <body>\n\
     <button id=\"theme-toggle\" aria-label=\"Toggle theme\">◐</button>\n\
     <h1 class=\"note-title\">{title}</h1>\n\
     <main>\n{body_html}</main>\n\
     <script>\n{TOGGLE_SCRIPT}</script>\n\
     </body>\n\
     </html>\n"
  )
}

// Forced mode is a class on <html> plus a localStorage key; no class
// means "follow the system". The button cycles system → opposite of the
// current system mode → back to system.
const TOGGLE_SCRIPT: &str = "\
(function () {
  var root = document.documentElement;
  var KEY = 'evergreen-theme';
  var saved = localStorage.getItem(KEY);
  if (saved === 'light' || saved === 'dark') root.classList.add('theme-' + saved);
  document.getElementById('theme-toggle').addEventListener('click', function () {
    var systemDark = window.matchMedia('(prefers-color-scheme: dark)').matches;
    var forced = root.classList.contains('theme-light') ? 'light'
               : root.classList.contains('theme-dark') ? 'dark' : null;
    root.classList.remove('theme-light', 'theme-dark');
    if (forced === null) {
      var next = systemDark ? 'light' : 'dark';
      root.classList.add('theme-' + next);
      localStorage.setItem(KEY, next);
    } else {
      localStorage.removeItem(KEY);
    }
  });
})();
";
