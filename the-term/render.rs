//! Rendering - draws the session into a ratatui frame.

use ratatui::{
  Frame,
  layout::Position as CellPosition,
  prelude::Rect,
  text::{
    Line,
    Span,
  },
  widgets::{
    Block,
    Borders,
    Clear,
    List,
    ListItem,
    Paragraph,
  },
};
use the_quill_lib::{
  messages::MessageLevel,
  outline::OutlineRow,
  position::{
    TAB_WIDTH,
    char_width,
  },
};

use crate::{
  ctx::{
    Ctx,
    Focus,
    Prompt,
  },
  layout::{
    compute_layout,
    compute_prompt_layout,
  },
  theme::UiStyles,
};

/// Draw the whole screen.
pub fn render(frame: &mut Frame<'_>, ctx: &mut Ctx) {
  let styles = UiStyles::from_theme(ctx.session.theme());
  let layout = compute_layout(frame.area());

  ctx.viewport = (layout.editor_inner.width, layout.editor_inner.height);
  ctx.ensure_cursor_visible();

  render_history(frame, ctx, &styles, layout.history);
  render_editor(frame, ctx, &styles, layout.editor, layout.editor_inner);
  render_status(frame, ctx, &styles, layout.status);

  if ctx.prompt.is_some() {
    render_prompt(frame, ctx, &styles);
  }
}

fn pane_block(title: String, focused: bool, styles: &UiStyles) -> Block<'static> {
  Block::default()
    .borders(Borders::ALL)
    .title(title)
    .style(styles.panel)
    .border_style(if focused {
      styles.border_focus
    } else {
      styles.border
    })
}

fn render_history(frame: &mut Frame<'_>, ctx: &mut Ctx, styles: &UiStyles, area: Rect) {
  let focused = ctx.focus == Focus::History && ctx.prompt.is_none();
  let block = pane_block("Edit History".to_string(), focused, styles);

  let items: Vec<ListItem> = ctx
    .session
    .outline()
    .rows()
    .map(|row| {
      let label = ctx.outline_label(row);
      match row {
        OutlineRow::Paragraph(_) => ListItem::new(label).style(styles.heading),
        OutlineRow::Version(_) => ListItem::new(label),
      }
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .style(styles.panel)
    .highlight_style(if focused {
      styles.selection
    } else {
      styles.panel
    });
  frame.render_stateful_widget(list, area, &mut ctx.outline_state);
}

fn render_editor(
  frame: &mut Frame<'_>,
  ctx: &Ctx,
  styles: &UiStyles,
  area: Rect,
  inner: Rect,
) {
  let focused = ctx.focus == Focus::Editor && ctx.prompt.is_none();
  let modified = if ctx.session.is_modified() { " [+]" } else { "" };
  let title = format!("{}{modified}", ctx.session.display_name());
  let block = pane_block(title, focused, styles).style(styles.editor);

  let text: Vec<Line> = ctx
    .session
    .document()
    .contents()
    .split('\n')
    .map(|line| Line::from(display_line(line)))
    .collect();
  let scroll = (
    u16::try_from(ctx.scroll.row).unwrap_or(u16::MAX),
    u16::try_from(ctx.scroll.col).unwrap_or(u16::MAX),
  );
  let paragraph = Paragraph::new(text)
    .block(block)
    .style(styles.editor)
    .scroll(scroll);
  frame.render_widget(paragraph, area);

  if focused {
    let cursor = ctx.session.document().visual_cursor_position(TAB_WIDTH);
    let row = cursor.row.saturating_sub(ctx.scroll.row);
    let col = cursor.col.saturating_sub(ctx.scroll.col);
    if let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col))
      && row < inner.height
      && col < inner.width
    {
      frame.set_cursor_position(CellPosition::new(inner.x + col, inner.y + row));
    }
  }
}

/// Expand tabs to the next stop and swap other control chars for a
/// replacement glyph, so every char lands in the cells the cursor math
/// expects.
fn display_line(line: &str) -> String {
  let mut out = String::with_capacity(line.len());
  let mut x = 0;
  for ch in line.chars() {
    let width = char_width(ch, x, TAB_WIDTH);
    match ch {
      '\t' => out.extend(std::iter::repeat_n(' ', width)),
      ch if ch.is_control() => out.push('\u{fffd}'),
      ch => out.push(ch),
    }
    x += width;
  }
  out
}

fn render_status(frame: &mut Frame<'_>, ctx: &Ctx, styles: &UiStyles, area: Rect) {
  let (text, style) = match ctx.messages.active() {
    Some(message) => {
      let style = match message.level {
        MessageLevel::Error => styles.error,
        MessageLevel::Warning => styles.warning,
        MessageLevel::Info => styles.status,
      };
      (message.text.clone(), style)
    },
    None => (key_hints(ctx), styles.status),
  };

  let history = ctx.session.history();
  let right = format!(
    " {} edited | {} paragraphs, {} versions | {} ",
    ctx.edited.len(),
    history.len(),
    history.version_count(),
    ctx.session.theme().name(),
  );
  let line = Line::from(vec![
    Span::styled(format!(" {text}"), style),
    Span::styled(right, styles.status),
  ]);
  frame.render_widget(Paragraph::new(line).style(styles.status), area);
}

fn key_hints(ctx: &Ctx) -> String {
  match ctx.focus {
    Focus::Editor => "^K commit  ^S save  ^O open  ^N new  ^T theme  Tab history  ^Q quit".into(),
    Focus::History => "Up/Down select  Enter revert  Tab editor  ^K commit  ^Q quit".into(),
  }
}

fn render_prompt(frame: &mut Frame<'_>, ctx: &Ctx, styles: &UiStyles) {
  let Some(prompt) = &ctx.prompt else {
    return;
  };
  let lines: Vec<Line> = match prompt {
    Prompt::Path { input, .. } => vec![Line::from("Path:"), Line::from(format!("> {input}"))],
    Prompt::Confirm { .. } => vec![
      Line::from("The document has unsaved changes."),
      Line::from("[s]ave  [d]iscard  [c]ancel"),
    ],
  };
  let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
  let Some(layout) = compute_prompt_layout(frame.area(), height) else {
    return;
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .title(prompt.title())
    .style(styles.panel)
    .border_style(styles.border_focus);
  frame.render_widget(Clear, layout.panel);
  frame.render_widget(Paragraph::new(lines).block(block), layout.panel);

  if let Prompt::Path { input, .. } = prompt {
    let col = u16::try_from(input.chars().count() + 2).unwrap_or(u16::MAX);
    if col < layout.inner.width && layout.inner.height >= 2 {
      frame.set_cursor_position(CellPosition::new(
        layout.inner.x + col,
        layout.inner.y + 1,
      ));
    }
  }
}

#[cfg(test)]
mod tests {
  use ratatui::{
    Terminal,
    backend::TestBackend,
    buffer::Buffer,
  };
  use the_quill_lib::session::{
    GuardedAction,
    Session,
  };

  use super::*;

  fn screen(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
      for x in 0..area.width {
        out.push_str(buffer[(x, y)].symbol());
      }
      out.push('\n');
    }
    out
  }

  fn draw(ctx: &mut Ctx) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
    terminal.draw(|frame| render(frame, ctx)).unwrap();
    screen(terminal.backend().buffer())
  }

  /// Draw on an 80x10 screen and return the cursor cell. The editor text
  /// starts at column 25 of row 1.
  fn draw_cursor(ctx: &mut Ctx) -> (Buffer, CellPosition) {
    let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
    terminal.draw(|frame| render(frame, ctx)).unwrap();
    let cursor = terminal.get_cursor_position().unwrap();
    (terminal.backend().buffer().clone(), cursor)
  }

  fn ctx_with(text: &str) -> Ctx {
    let mut ctx = Ctx::new(Session::default());
    ctx.session.document_mut().insert(text);
    ctx.sync_changes();
    ctx
  }

  #[test]
  fn shows_text_and_committed_history() {
    let mut ctx = ctx_with("Hello\n\nWorld");
    ctx.commit();
    ctx.session.document_mut().set_cursor(5);
    ctx.session.document_mut().insert(" there");
    ctx.commit();

    let out = draw(&mut ctx);
    assert!(out.contains("Edit History"));
    assert!(out.contains("Paragraph 1"));
    assert!(out.contains("Version 2: Hello there"));
    assert!(out.contains("Paragraph 2"));
    assert!(out.contains("Hello there"));
    assert!(out.contains("<untitled> [+]"));
  }

  #[test]
  fn long_versions_are_previewed() {
    let long = "abcdefghijklmnopqrstuvwxyz0123456789";
    let mut ctx = ctx_with(long);
    ctx.commit();
    ctx.focus = Focus::History;
    let out = draw(&mut ctx);
    // The pane is narrower than the label, so only the start is visible.
    assert!(out.contains("Version 1: abcdefghij"));
    let node = ctx.session.outline().version_at(1).unwrap();
    assert_eq!(node.label, "Version 1: abcdefghijklmnopqrstuvwxyz0123...");
  }

  #[test]
  fn status_line_shows_messages() {
    let mut ctx = ctx_with("a");
    ctx.commit();
    let out = draw(&mut ctx);
    assert!(out.contains("Committed 1 changed paragraph(s)"));
    assert!(out.contains("1 paragraphs, 1 versions | light"));
  }

  #[test]
  fn confirm_prompt_is_drawn() {
    let mut ctx = ctx_with("draft");
    ctx.guarded(GuardedAction::New);
    let out = draw(&mut ctx);
    assert!(out.contains("Save Changes?"));
    assert!(out.contains("[s]ave  [d]iscard  [c]ancel"));
  }

  #[test]
  fn editor_scrolls_with_cursor() {
    let text: String = (0..40).map(|i| format!("line {i}\n")).collect();
    let mut ctx = ctx_with(&text);
    let out = draw(&mut ctx);
    assert!(out.contains("line 39"));
    assert!(!out.contains("line 0 "));
    assert!(ctx.scroll.row > 0);
  }

  #[test]
  fn cursor_follows_ascii_text() {
    let mut ctx = ctx_with("abc");
    let (_, cursor) = draw_cursor(&mut ctx);
    assert_eq!(cursor, CellPosition::new(28, 1));
  }

  #[test]
  fn cursor_skips_past_wide_chars() {
    let mut ctx = ctx_with("\u{4f60}\u{597d}");
    let (_, cursor) = draw_cursor(&mut ctx);
    assert_eq!(cursor, CellPosition::new(29, 1));
  }

  #[test]
  fn tabs_are_expanded() {
    let mut ctx = ctx_with("a\tb");
    let (buffer, cursor) = draw_cursor(&mut ctx);
    assert_eq!(buffer[(25, 1)].symbol(), "a");
    for x in 26..29 {
      assert_eq!(buffer[(x, 1)].symbol(), " ");
    }
    assert_eq!(buffer[(29, 1)].symbol(), "b");
    assert_eq!(cursor, CellPosition::new(30, 1));
    let out = screen(&buffer);
    assert!(!out.contains('\t'));
  }

  #[test]
  fn display_line_replaces_control_chars() {
    assert_eq!(display_line("\tx"), "    x");
    assert_eq!(display_line("ab\tc"), "ab  c");
    assert_eq!(display_line("a\u{7}b"), "a\u{fffd}b");
  }
}
