//! Per-vault theme records.
//!
//! A vault stores at most one [`DualTheme`], holding independent light and
//! dark settings. Writes merge a single mode; the other mode's slot is
//! never clobbered. Rendering falls back to the built-in defaults for any
//! missing mode, so a theme record is always optional.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::Result;

/// Which half of a [`DualTheme`] a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ThemeMode {
  Light,
  Dark,
}

/// Colour and size settings for one mode, as synced from the authoring
/// application. Derived colours (borders, highlight and tag backgrounds)
/// are computed at render time, not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
  /// Page background, `#rrggbb`.
  pub background:      String,
  /// Body text colour, `#rrggbb`.
  pub text:            String,
  /// Accent used for links, tags, and callout defaults, `#rrggbb`.
  pub accent:          String,
  /// Background for code spans and fences, `#rrggbb`.
  pub code_background: String,
  /// Base font size in pixels.
  pub font_size:       u8,
}

impl ThemeSettings {
  /// Built-in light mode, used when a vault has no stored light theme.
  pub fn default_light() -> Self {
    Self {
      background:      "#ffffff".into(),
      text:            "#222222".into(),
      accent:          "#705dcf".into(),
      code_background: "#f5f5f5".into(),
      font_size:       16,
    }
  }

  /// Built-in dark mode, used when a vault has no stored dark theme.
  pub fn default_dark() -> Self {
    Self {
      background:      "#1e1e1e".into(),
      text:            "#dadada".into(),
      accent:          "#a48aff".into(),
      code_background: "#2a2a2a".into(),
      font_size:       16,
    }
  }
}

/// A vault's stored theme record, at `{vault}/theme.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualTheme {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub light:      Option<ThemeSettings>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dark:       Option<ThemeSettings>,
  #[serde(default)]
  pub updated_at: Option<DateTime<Utc>>,
}

impl DualTheme {
  /// Set one mode's slot, leaving the other untouched.
  pub fn merge(&mut self, mode: ThemeMode, settings: ThemeSettings, now: DateTime<Utc>) {
    match mode {
      ThemeMode::Light => self.light = Some(settings),
      ThemeMode::Dark => self.dark = Some(settings),
    }
    self.updated_at = Some(now);
  }

  /// The light settings to render with, stored or default.
  pub fn light_or_default(&self) -> ThemeSettings {
    self.light.clone().unwrap_or_else(ThemeSettings::default_light)
  }

  /// The dark settings to render with, stored or default.
  pub fn dark_or_default(&self) -> ThemeSettings {
    self.dark.clone().unwrap_or_else(ThemeSettings::default_dark)
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(self)?)
  }

  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    Ok(serde_json::from_slice(bytes)?)
  }
}
