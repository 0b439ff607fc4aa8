//! Final markdown pass: GFM-flavoured parse of the rewritten text.
//!
//! Runs last. The earlier passes emit inline and block HTML, which flows
//! through the parser untouched. The dialect is line-break-sensitive, so
//! soft breaks are promoted to hard breaks before pushing HTML.

use pulldown_cmark::{Event, Options, Parser, html};

/// Parse `text` as markdown and return the HTML fragment.
pub fn to_html(text: &str) -> String {
  let mut options = Options::empty();
  options.insert(Options::ENABLE_TABLES);
  options.insert(Options::ENABLE_STRIKETHROUGH);

  let parser = Parser::new_ext(text, options).map(|event| match event {
    // Single newlines are real line breaks in the authoring dialect.
    Event::SoftBreak => Event::HardBreak,
    other => other,
  });

  let mut out = String::new();
  html::push_html(&mut out, parser);
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_headings_and_emphasis() {
    let html = to_html("# Title\n\n*em*");
    assert!(html.contains("<h1>Title</h1>"), "{html}");
    assert!(html.contains("<em>em</em>"), "{html}");
  }

  #[test]
  fn soft_breaks_become_hard_breaks() {
    let html = to_html("one\ntwo");
    assert!(html.contains("<br"), "{html}");
  }

  #[test]
  fn tables_are_enabled() {
    let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |");
    assert!(html.contains("<table>"), "{html}");
  }

  #[test]
  fn strikethrough_is_enabled() {
    let html = to_html("~~gone~~");
    assert!(html.contains("<del>gone</del>"), "{html}");
  }

  #[test]
  fn inline_html_flows_through() {
    let html = to_html("a <mark>b</mark> c");
    assert!(html.contains("<mark>b</mark>"), "{html}");
  }

  #[test]
  fn block_html_wrapper_leaves_inner_markdown_live() {
    let html = to_html("<div class=\"x\">\n\n**bold**\n\n</div>");
    assert!(html.contains("<div class=\"x\">"), "{html}");
    assert!(html.contains("<strong>bold</strong>"), "{html}");
  }

  #[test]
  fn code_fences_render_with_code_element() {
    let html = to_html("```\nlet x = 1;\n```");
    assert!(html.contains("<code>"), "{html}");
  }
}
