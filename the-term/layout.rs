use ratatui::{
  layout::{
    Constraint,
    Direction,
    Layout,
  },
  prelude::Rect,
  widgets::{
    Block,
    Borders,
  },
};

/// Narrowest the history pane gets before the editor starts shrinking.
const MIN_HISTORY_WIDTH: u16 = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppLayout {
  pub history:       Rect,
  pub history_inner: Rect,
  pub editor:        Rect,
  pub editor_inner:  Rect,
  pub status:        Rect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptLayout {
  pub panel: Rect,
  pub inner: Rect,
}

/// History pane on the left (a quarter of the width), editor on the right,
/// status line along the bottom.
pub fn compute_layout(area: Rect) -> AppLayout {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(1), Constraint::Length(1)])
    .split(area);
  let (main, status) = (rows[0], rows[1]);

  let history_width = (main.width / 4)
    .max(MIN_HISTORY_WIDTH)
    .min(main.width / 2);
  let panes = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(history_width), Constraint::Min(1)])
    .split(main);

  let block = Block::default().borders(Borders::ALL);
  AppLayout {
    history: panes[0],
    history_inner: block.inner(panes[0]),
    editor: panes[1],
    editor_inner: block.inner(panes[1]),
    status,
  }
}

/// A centred box for prompts, or `None` if the screen is too small.
pub fn compute_prompt_layout(area: Rect, lines: u16) -> Option<PromptLayout> {
  if area.width < 10 || area.height < 4 {
    return None;
  }

  let width = area
    .width
    .saturating_mul(6)
    .saturating_div(10)
    .max(40)
    .min(area.width);
  let height = lines.saturating_add(2).min(area.height);
  let x = area.x + area.width.saturating_sub(width) / 2;
  let y = area.y + area.height.saturating_sub(height) / 2;
  let panel = Rect::new(x, y, width, height);

  Some(PromptLayout {
    panel,
    inner: Block::default().borders(Borders::ALL).inner(panel),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn panes_fill_the_screen() {
    let layout = compute_layout(Rect::new(0, 0, 120, 40));
    assert_eq!(layout.status, Rect::new(0, 39, 120, 1));
    assert_eq!(layout.history, Rect::new(0, 0, 30, 39));
    assert_eq!(layout.editor, Rect::new(30, 0, 90, 39));
    assert_eq!(layout.editor_inner, Rect::new(31, 1, 88, 37));
  }

  #[test]
  fn history_pane_keeps_minimum_width() {
    let layout = compute_layout(Rect::new(0, 0, 60, 20));
    assert_eq!(layout.history.width, 24);
    assert_eq!(layout.editor.width, 36);
  }

  #[test]
  fn prompt_is_centred() {
    let prompt = compute_prompt_layout(Rect::new(0, 0, 100, 30), 3).unwrap();
    assert_eq!(prompt.panel, Rect::new(20, 12, 60, 5));
    assert_eq!(prompt.inner, Rect::new(21, 13, 58, 3));
  }

  #[test]
  fn tiny_screens_get_no_prompt() {
    assert!(compute_prompt_layout(Rect::new(0, 0, 8, 3), 1).is_none());
  }
}
