//! Theme-driven CSS generation.
//!
//! The engine emits CSS custom properties for both modes: light values on
//! `:root`, dark values both under a `prefers-color-scheme: dark` media
//! query and on the `.theme-dark` override class, so a viewer can force
//! either mode regardless of system preference. Derived colours (border,
//! highlight background, tag background) are computed here from the
//! primary colours with mode-specific alpha, never stored.

use evergreen_core::theme::ThemeSettings;

// ─── Colour helpers ──────────────────────────────────────────────────────────

/// Parse `#rgb` or `#rrggbb` into channels.
fn hex_to_rgb(color: &str) -> Option<(u8, u8, u8)> {
  let hex = color.strip_prefix('#')?;
  match hex.len() {
    3 => {
      let mut it = hex.chars();
      let mut channel = || {
        let c = it.next()?;
        let v = c.to_digit(16)? as u8;
        Some(v * 16 + v)
      };
      Some((channel()?, channel()?, channel()?))
    }
    6 => {
      let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
      let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
      let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
      Some((r, g, b))
    }
    _ => None,
  }
}

/// `color` at `alpha`, as a CSS value. An unparsable colour is passed
/// through opaque rather than failing the render.
fn with_alpha(color: &str, alpha: f32) -> String {
  match hex_to_rgb(color) {
    Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
    None => color.to_string(),
  }
}

// ─── Variable blocks ─────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Mode {
  Light,
  Dark,
}

/// The custom-property declarations for one mode.
fn vars(s: &ThemeSettings, mode: Mode) -> String {
  // Dark surfaces need stronger alphas to stay visible.
  let (border_a, highlight_a, tag_a) = match mode {
    Mode::Light => (0.15, 0.30, 0.12),
    Mode::Dark => (0.25, 0.40, 0.20),
  };
  format!(
    "  --background: {bg};\n  \
       --text: {text};\n  \
       --accent: {accent};\n  \
       --code-background: {code};\n  \
       --font-size: {size}px;\n  \
       --border: {border};\n  \
       --highlight-bg: {highlight};\n  \
       --tag-bg: {tag};\n",
    bg = s.background,
    text = s.text,
    accent = s.accent,
    code = s.code_background,
    size = s.font_size,
    border = with_alpha(&s.text, border_a),
    highlight = with_alpha(&s.accent, highlight_a),
    tag = with_alpha(&s.accent, tag_a),
  )
}

// ─── Callout accents ─────────────────────────────────────────────────────────

// Fixed per-kind accents, shared by both modes; keyed by the class the
// callout pass emits.
const CALLOUT_COLORS: &[(&str, &str)] = &[
  ("note", "68, 138, 255"),
  ("abstract", "0, 176, 255"),
  ("info", "0, 184, 212"),
  ("todo", "0, 184, 212"),
  ("tip", "0, 191, 166"),
  ("success", "0, 200, 83"),
  ("question", "236, 159, 5"),
  ("warning", "255, 145, 0"),
  ("failure", "255, 82, 82"),
  ("danger", "255, 23, 68"),
  ("bug", "245, 0, 87"),
  ("example", "124, 77, 255"),
  ("quote", "158, 158, 158"),
];

fn callout_rules() -> String {
  let mut out = String::new();
  for (class, rgb) in CALLOUT_COLORS {
    out.push_str(&format!(
      ".callout-{class} {{ --callout-rgb: {rgb}; }}\n"
    ));
  }
  out
}

// ─── Stylesheet ──────────────────────────────────────────────────────────────

/// Build the full stylesheet for a rendered note document.
pub fn stylesheet(light: &ThemeSettings, dark: &ThemeSettings) -> String {
  let light_vars = vars(light, Mode::Light);
  let dark_vars = vars(dark, Mode::Dark);
  let callouts = callout_rules();

  format!(
    ":root {{\n{light_vars}}}\n\
     :root.theme-dark {{\n{dark_vars}}}\n\
     @media (prefers-color-scheme: dark) {{\n:root:not(.theme-light) {{\n{dark_vars}}}\n}}\n\
     {LAYOUT}\n{callouts}"
  )
}

/// Mode-independent layout rules; everything colourful goes through the
/// custom properties above.
const LAYOUT: &str = "\
* { box-sizing: border-box; }
body {
  margin: 0 auto;
  max-width: 46rem;
  padding: 2rem 1.25rem 4rem;
  background: var(--background);
  color: var(--text);
  font-size: var(--font-size);
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  line-height: 1.6;
}
a { color: var(--accent); }
h1, h2, h3, h4, h5, h6 { line-height: 1.25; }
mark { background: var(--highlight-bg); color: inherit; padding: 0 0.15em; border-radius: 2px; }
code { background: var(--code-background); padding: 0.125em 0.3em; border-radius: 3px; font-size: 0.9em; }
pre { background: var(--code-background); padding: 0.75em 1em; border-radius: 6px; overflow-x: auto; }
pre code { background: none; padding: 0; }
blockquote { border-left: 3px solid var(--border); margin-left: 0; padding-left: 1em; opacity: 0.9; }
table { border-collapse: collapse; }
th, td { border: 1px solid var(--border); padding: 0.3em 0.7em; }
hr { border: none; border-top: 1px solid var(--border); }
img { max-width: 100%; }
.tag {
  background: var(--tag-bg);
  color: var(--accent);
  padding: 0.1em 0.5em;
  border-radius: 1em;
  font-size: 0.85em;
  white-space: nowrap;
}
.internal-link { text-decoration: none; border-bottom: 1px dashed var(--accent); }
.unresolved-link { color: var(--text); opacity: 0.55; border-bottom: 1px dashed var(--border); cursor: default; }
.callout {
  --callout-rgb: 68, 138, 255;
  border-left: 3px solid rgb(var(--callout-rgb));
  background: rgba(var(--callout-rgb), 0.08);
  border-radius: 4px;
  padding: 0.25em 1em 0.5em;
  margin: 1em 0;
}
.callout-title {
  font-weight: 600;
  color: rgb(var(--callout-rgb));
  margin: 0.5em 0;
  cursor: default;
}
details.callout > summary { cursor: pointer; }
.callout-icon { margin-right: 0.4em; }
input[type='checkbox'] { accent-color: var(--accent); }
#theme-toggle {
  position: fixed;
  top: 0.75rem;
  right: 0.75rem;
  border: 1px solid var(--border);
  background: var(--background);
  color: var(--text);
  border-radius: 50%;
  width: 2.25rem;
  height: 2.25rem;
  cursor: pointer;
}
";

#[cfg(test)]
mod tests {
  use super::*;

  fn light() -> ThemeSettings { ThemeSettings::default_light() }
  fn dark() -> ThemeSettings { ThemeSettings::default_dark() }

  #[test]
  fn parses_long_and_short_hex() {
    assert_eq!(hex_to_rgb("#ffffff"), Some((255, 255, 255)));
    assert_eq!(hex_to_rgb("#1e1e1e"), Some((30, 30, 30)));
    assert_eq!(hex_to_rgb("#f00"), Some((255, 0, 0)));
    assert_eq!(hex_to_rgb("tomato"), None);
    assert_eq!(hex_to_rgb("#12345"), None);
  }

  #[test]
  fn derived_colours_carry_alpha() {
    let css = vars(&light(), Mode::Light);
    assert!(css.contains("--highlight-bg: rgba("), "{css}");
    assert!(css.contains("0.3)"), "{css}");
  }

  #[test]
  fn unparsable_colour_degrades_to_opaque() {
    let mut odd = light();
    odd.accent = "rebeccapurple".into();
    let css = vars(&odd, Mode::Light);
    assert!(css.contains("--highlight-bg: rebeccapurple;"), "{css}");
  }

  #[test]
  fn stylesheet_has_both_modes_and_override_hooks() {
    let css = stylesheet(&light(), &dark());
    assert!(css.contains(":root {"), "{css}");
    assert!(css.contains(":root.theme-dark {"), "{css}");
    assert!(css.contains("prefers-color-scheme: dark"), "{css}");
    assert!(css.contains(":root:not(.theme-light)"), "{css}");
  }

  #[test]
  fn stylesheet_reflects_custom_colours() {
    let mut d = dark();
    d.background = "#101214".into();
    let css = stylesheet(&light(), &d);
    assert!(css.contains("--background: #101214;"), "{css}");
  }

  #[test]
  fn every_callout_kind_has_an_accent_rule() {
    let css = stylesheet(&light(), &dark());
    for (class, _) in CALLOUT_COLORS {
      assert!(css.contains(&format!(".callout-{class}")), "missing {class}");
    }
  }
}
