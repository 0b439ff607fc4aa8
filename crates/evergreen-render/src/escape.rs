//! Minimal HTML escaping for text the rewrite passes interpolate into
//! attribute values and element bodies.

/// Escape `&`, `<`, `>`, and `"` for safe interpolation.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(c),
    }
  }
  out
}
