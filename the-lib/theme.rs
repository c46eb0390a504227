//! Colour themes.
//!
//! A theme is a plain value handed to whichever surface draws with it; there
//! is no global palette. Loading a custom theme from disk lives in
//! `the-quill-loader`, this module only knows how to merge overrides onto a
//! base palette.

use std::{
  fmt,
  ops::Range,
  str::FromStr,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
  #[error("malformed hex colour '{0}', expected #RRGGBB")]
  MalformedColor(String),
  #[error("unknown base theme '{0}'")]
  UnknownBase(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub const fn new(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }

  /// Build from a `0xRRGGBB` literal.
  const fn hex(value: u32) -> Self {
    Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
  }
}

impl FromStr for Rgb {
  type Err = ThemeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let malformed = || ThemeError::MalformedColor(s.to_string());
    let digits = s.strip_prefix('#').ok_or_else(malformed)?;
    if digits.len() != 6 || !digits.is_ascii() {
      return Err(malformed());
    }
    let channel = |range: Range<usize>| {
      u8::from_str_radix(&digits[range], 16).map_err(|_| malformed())
    };
    Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
  }
}

impl fmt::Display for Rgb {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
  }
}

/// Colours for every role a surface can paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
  pub window:         Rgb,
  pub text:           Rgb,
  pub base:           Rgb,
  pub button:         Rgb,
  pub button_text:    Rgb,
  pub highlight:      Rgb,
  pub highlight_text: Rgb,
}

impl Palette {
  pub const LIGHT: Self = Self {
    window:         Rgb::hex(0xFFFFFF),
    text:           Rgb::hex(0x000000),
    base:           Rgb::hex(0xFFFFFF),
    button:         Rgb::hex(0xF0F0F0),
    button_text:    Rgb::hex(0x000000),
    highlight:      Rgb::hex(0x0078D7),
    highlight_text: Rgb::hex(0xFFFFFF),
  };

  pub const DARK: Self = Self {
    window:         Rgb::hex(0x1E1E1E),
    text:           Rgb::hex(0xFFFFFF),
    base:           Rgb::hex(0x2D2D2D),
    button:         Rgb::hex(0x333333),
    button_text:    Rgb::hex(0xFFFFFF),
    highlight:      Rgb::hex(0x0078D7),
    highlight_text: Rgb::hex(0xFFFFFF),
  };
}

/// Per-role overrides for a custom theme, as written in config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct PaletteOverrides {
  /// Theme to start from. Defaults to the active theme.
  pub inherits:       Option<String>,
  pub window:         Option<String>,
  pub text:           Option<String>,
  pub base:           Option<String>,
  pub button:         Option<String>,
  pub button_text:    Option<String>,
  pub highlight:      Option<String>,
  pub highlight_text: Option<String>,
}

impl PaletteOverrides {
  /// Apply every override onto `base`.
  pub fn apply(&self, base: Palette) -> Result<Palette, ThemeError> {
    fn set(slot: &mut Rgb, value: &Option<String>) -> Result<(), ThemeError> {
      if let Some(value) = value {
        *slot = value.parse()?;
      }
      Ok(())
    }

    let mut palette = base;
    set(&mut palette.window, &self.window)?;
    set(&mut palette.text, &self.text)?;
    set(&mut palette.base, &self.base)?;
    set(&mut palette.button, &self.button)?;
    set(&mut palette.button_text, &self.button_text)?;
    set(&mut palette.highlight, &self.highlight)?;
    set(&mut palette.highlight_text, &self.highlight_text)?;
    Ok(palette)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
  name:    String,
  palette: Palette,
}

impl Theme {
  pub fn new(name: impl Into<String>, palette: Palette) -> Self {
    Self {
      name: name.into(),
      palette,
    }
  }

  pub fn light() -> Self {
    Self::new(Themes::LIGHT, Palette::LIGHT)
  }

  pub fn dark() -> Self {
    Self::new(Themes::DARK, Palette::DARK)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn palette(&self) -> &Palette {
    &self.palette
  }

  pub fn is_dark(&self) -> bool {
    let Rgb { r, g, b } = self.palette.window;
    // Rec. 601 luma.
    (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000 < 128
  }
}

impl Default for Theme {
  fn default() -> Self {
    Self::light()
  }
}

/// The themes a session can switch between by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Themes {
  themes: Vec<Theme>,
}

impl Default for Themes {
  fn default() -> Self {
    Self {
      themes: vec![Theme::light(), Theme::dark()],
    }
  }
}

impl Themes {
  pub const LIGHT: &'static str = "light";
  pub const DARK: &'static str = "dark";
  pub const CUSTOM: &'static str = "custom";

  /// Register the `custom` theme built from `overrides`.
  ///
  /// `fallback_base` names the base used when the overrides don't specify
  /// one. Replaces any earlier custom theme.
  pub fn set_custom(
    &mut self,
    overrides: &PaletteOverrides,
    fallback_base: &str,
  ) -> Result<&Theme, ThemeError> {
    let base_name = overrides.inherits.as_deref().unwrap_or(fallback_base);
    let base = self
      .get(base_name)
      .ok_or_else(|| ThemeError::UnknownBase(base_name.to_string()))?;
    let palette = overrides.apply(*base.palette())?;

    self.themes.retain(|theme| theme.name != Self::CUSTOM);
    self.themes.push(Theme::new(Self::CUSTOM, palette));
    Ok(&self.themes[self.themes.len() - 1])
  }

  pub fn get(&self, name: &str) -> Option<&Theme> {
    self.themes.iter().find(|theme| theme.name == name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.themes.iter().map(Theme::name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_and_prints_hex() {
    let color: Rgb = "#0078d7".parse().unwrap();
    assert_eq!(color, Rgb::new(0x00, 0x78, 0xD7));
    assert_eq!(color.to_string(), "#0078D7");
  }

  #[test]
  fn rejects_malformed_hex() {
    for bad in ["0078D7", "#0078D", "#0078D7FF", "#GGGGGG", "#\u{e9}\u{e9}\u{e9}"] {
      assert!(bad.parse::<Rgb>().is_err(), "{bad} should not parse");
    }
  }

  #[test]
  fn builtin_palettes() {
    assert_eq!(Palette::DARK.base.to_string(), "#2D2D2D");
    assert_eq!(Palette::LIGHT.button.to_string(), "#F0F0F0");
    assert!(Theme::dark().is_dark());
    assert!(!Theme::light().is_dark());
  }

  #[test]
  fn custom_theme_inherits_and_overrides() {
    let mut themes = Themes::default();
    let overrides = PaletteOverrides {
      inherits: Some("dark".into()),
      highlight: Some("#FF8800".into()),
      ..Default::default()
    };
    let custom = themes.set_custom(&overrides, Themes::LIGHT).unwrap().clone();
    assert_eq!(custom.name(), "custom");
    assert_eq!(custom.palette().highlight, Rgb::new(0xFF, 0x88, 0x00));
    assert_eq!(custom.palette().window, Palette::DARK.window);
    assert_eq!(themes.get("custom"), Some(&custom));
  }

  #[test]
  fn custom_theme_falls_back_to_given_base() {
    let mut themes = Themes::default();
    let custom = themes
      .set_custom(&PaletteOverrides::default(), Themes::LIGHT)
      .unwrap();
    assert_eq!(custom.palette(), &Palette::LIGHT);
  }

  #[test]
  fn custom_theme_errors() {
    let mut themes = Themes::default();
    let unknown = PaletteOverrides {
      inherits: Some("solarized".into()),
      ..Default::default()
    };
    assert_eq!(
      themes.set_custom(&unknown, Themes::LIGHT),
      Err(ThemeError::UnknownBase("solarized".into()))
    );

    let malformed = PaletteOverrides {
      text: Some("red".into()),
      ..Default::default()
    };
    assert!(matches!(
      themes.set_custom(&malformed, Themes::LIGHT),
      Err(ThemeError::MalformedColor(_))
    ));
    assert!(themes.get("custom").is_none());
  }

  #[test]
  fn registering_custom_twice_replaces_it() {
    let mut themes = Themes::default();
    themes
      .set_custom(&PaletteOverrides::default(), Themes::LIGHT)
      .unwrap();
    themes
      .set_custom(&PaletteOverrides::default(), Themes::DARK)
      .unwrap();
    assert_eq!(themes.names().collect::<Vec<_>>(), vec!["light", "dark", "custom"]);
    assert_eq!(themes.get("custom").unwrap().palette(), &Palette::DARK);
  }
}
