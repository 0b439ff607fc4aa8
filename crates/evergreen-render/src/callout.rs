//! Callout block pass.
//!
//! Input contract: raw note text. A callout opens with a line of the form
//! `> [!TYPE]` plus an optional fold marker (`+` open, `-` collapsed,
//! absent = static) and an optional inline title; every following line
//! starting with `>` belongs to its body.
//!
//! Output contract: each callout becomes an HTML wrapper (a `<details>`
//! element when foldable) with the body lines unquoted and left as
//! markdown, separated from the wrapper by blank lines so the final GFM
//! parse still processes them. Lines that are not part of a callout pass
//! through untouched, and a `> [!` line that fails to parse stays a plain
//! blockquote.

use std::str::FromStr as _;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::escape::escape_html;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// Canonical callout kinds. The authoring dialect accepts ~25 type
/// strings which collapse onto these; unknown strings fall back to
/// [`CalloutKind::Note`]'s icon with their own label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum CalloutKind {
  #[strum(serialize = "note")]
  Note,
  #[strum(serialize = "abstract", serialize = "summary", serialize = "tldr")]
  Abstract,
  #[strum(serialize = "info")]
  Info,
  #[strum(serialize = "todo")]
  Todo,
  #[strum(serialize = "tip", serialize = "hint", serialize = "important")]
  Tip,
  #[strum(serialize = "success", serialize = "check", serialize = "done")]
  Success,
  #[strum(serialize = "question", serialize = "help", serialize = "faq")]
  Question,
  #[strum(serialize = "warning", serialize = "caution", serialize = "attention")]
  Warning,
  #[strum(serialize = "failure", serialize = "fail", serialize = "missing")]
  Failure,
  #[strum(serialize = "danger", serialize = "error")]
  Danger,
  #[strum(serialize = "bug")]
  Bug,
  #[strum(serialize = "example")]
  Example,
  #[strum(serialize = "quote", serialize = "cite")]
  Quote,
}

impl CalloutKind {
  /// CSS class suffix; also keys the per-kind accent colour rules.
  pub fn css_class(self) -> &'static str {
    match self {
      Self::Note => "note",
      Self::Abstract => "abstract",
      Self::Info => "info",
      Self::Todo => "todo",
      Self::Tip => "tip",
      Self::Success => "success",
      Self::Question => "question",
      Self::Warning => "warning",
      Self::Failure => "failure",
      Self::Danger => "danger",
      Self::Bug => "bug",
      Self::Example => "example",
      Self::Quote => "quote",
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      Self::Note => "✏️",
      Self::Abstract => "📋",
      Self::Info => "ℹ️",
      Self::Todo => "☑️",
      Self::Tip => "🔥",
      Self::Success => "✅",
      Self::Question => "❓",
      Self::Warning => "⚠️",
      Self::Failure => "❌",
      Self::Danger => "⚡",
      Self::Bug => "🐛",
      Self::Example => "📖",
      Self::Quote => "💬",
    }
  }
}

// ─── Fold behaviour ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
  /// No marker: a plain box, no collapse control.
  Static,
  /// `+`: collapsible, initially expanded.
  Open,
  /// `-`: collapsible, initially collapsed.
  Closed,
}

// ─── Pass ────────────────────────────────────────────────────────────────────

static OPENER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^>\s*\[!([A-Za-z]+)\]([+-]?)[ \t]*(.*)$").expect("callout opener pattern")
});

/// Rewrite every callout block in `text`. See the module contract.
pub fn rewrite(text: &str) -> String {
  let lines: Vec<&str> = text.lines().collect();
  let mut out = String::with_capacity(text.len());
  let mut i = 0;

  while i < lines.len() {
    let Some(caps) = OPENER.captures(lines[i]) else {
      out.push_str(lines[i]);
      out.push('\n');
      i += 1;
      continue;
    };

    let type_str = caps.get(1).map(|m| m.as_str()).unwrap_or("note");
    let fold = match caps.get(2).map(|m| m.as_str()) {
      Some("+") => Fold::Open,
      Some("-") => Fold::Closed,
      _ => Fold::Static,
    };
    let inline_title = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");

    // Collect the body: every following `>`-quoted line, one level
    // unquoted.
    let mut body: Vec<&str> = Vec::new();
    i += 1;
    while i < lines.len() {
      let Some(rest) = lines[i].strip_prefix('>') else { break };
      body.push(rest.strip_prefix(' ').unwrap_or(rest));
      i += 1;
    }

    out.push_str(&render_callout(type_str, fold, inline_title, &body));
  }

  out
}

fn render_callout(type_str: &str, fold: Fold, inline_title: &str, body: &[&str]) -> String {
  let kind = CalloutKind::from_str(type_str).unwrap_or(CalloutKind::Note);
  let title = if inline_title.is_empty() {
    titlecase(type_str)
  } else {
    inline_title.to_string()
  };
  let title = escape_html(&title);
  let class = format!("callout callout-{}", kind.css_class());
  let icon = kind.icon();

  let mut html = String::new();
  match fold {
    Fold::Static => {
      html.push_str(&format!("<div class=\"{class}\">\n"));
      html.push_str(&format!(
        "<div class=\"callout-title\"><span class=\"callout-icon\">{icon}</span>{title}</div>\n"
      ));
    }
    Fold::Open => {
      html.push_str(&format!("<details class=\"{class}\" open>\n"));
      html.push_str(&format!(
        "<summary class=\"callout-title\"><span class=\"callout-icon\">{icon}</span>{title}</summary>\n"
      ));
    }
    Fold::Closed => {
      html.push_str(&format!("<details class=\"{class}\">\n"));
      html.push_str(&format!(
        "<summary class=\"callout-title\"><span class=\"callout-icon\">{icon}</span>{title}</summary>\n"
      ));
    }
  }

  // The blank lines around the body end the HTML block, so the body is
  // parsed as ordinary markdown by the final pass.
  html.push_str("<div class=\"callout-content\">\n\n");
  for line in body {
    html.push_str(line);
    html.push('\n');
  }
  html.push_str("\n</div>\n");
  html.push_str(match fold {
    Fold::Static => "</div>\n",
    _ => "</details>\n",
  });
  html
}

/// Uppercase the first letter, lowercase the rest: the default title for
/// a callout without an inline one.
fn titlecase(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => {
      first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    }
    None => String::new(),
  }
}
