//! Palette roles mapped onto terminal styles.

use ratatui::style::{
  Color,
  Modifier,
  Style,
};
use the_quill_lib::theme::{
  Rgb,
  Theme,
};

pub fn color(rgb: Rgb) -> Color {
  Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Styles for every surface the client draws, derived from one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiStyles {
  pub editor:       Style,
  pub panel:        Style,
  pub border:       Style,
  pub border_focus: Style,
  pub selection:    Style,
  pub heading:      Style,
  pub status:       Style,
  pub error:        Style,
  pub warning:      Style,
}

impl UiStyles {
  pub fn from_theme(theme: &Theme) -> Self {
    let p = theme.palette();
    let panel = Style::default().fg(color(p.text)).bg(color(p.window));
    Self {
      editor: Style::default().fg(color(p.text)).bg(color(p.base)),
      panel,
      border: panel,
      border_focus: panel.fg(color(p.highlight)),
      selection: Style::default()
        .fg(color(p.highlight_text))
        .bg(color(p.highlight)),
      heading: panel.add_modifier(Modifier::BOLD),
      status: Style::default()
        .fg(color(p.button_text))
        .bg(color(p.button)),
      error: Style::default()
        .fg(Color::Red)
        .bg(color(p.button))
        .add_modifier(Modifier::BOLD),
      warning: Style::default().fg(Color::Yellow).bg(color(p.button)),
    }
  }
}
