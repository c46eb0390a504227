use ropey::RopeSlice;
use unicode_width::UnicodeWidthChar;

/// Columns between tab stops.
pub const TAB_WIDTH: usize = 4;

/// This is a single point in a text buffer.
/// 0-indexed as all things should be.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
  pub row: usize,
  pub col: usize,
}

impl Position {
  pub fn new(row: usize, col: usize) -> Self {
    Self { row, col }
  }

  pub const fn zero() -> Self {
    Self { row: 0, col: 0 }
  }

  pub const fn is_zero(&self) -> bool {
    self.row == 0 && self.col == 0
  }
}

impl From<(usize, usize)> for Position {
  fn from(value: (usize, usize)) -> Self {
    Position::new(value.0, value.1)
  }
}

/// Converts a character index into a `Position`, column in chars.
pub fn coords_at_pos(text: RopeSlice, pos: usize) -> Position {
  let pos = pos.min(text.len_chars());
  let line = text.char_to_line(pos);
  Position::new(line, pos - text.line_to_char(line))
}

/// Convert a `(row, column)` in chars to a character index.
///
/// If `row` exceeds the number of lines, the last line is used.
/// If `col` exceeds the length of the line, the end of the line (before its
/// line break) is used.
pub fn char_idx_at_coords(text: RopeSlice, coords: Position) -> usize {
  let line = coords.row.min(text.len_lines().saturating_sub(1));
  let line_start = text.line_to_char(line);
  line_start + coords.col.min(line_len(text, line))
}

/// Chars on `line`, excluding the line break.
pub fn line_len(text: RopeSlice, line: usize) -> usize {
  let slice = text.line(line);
  let len = slice.len_chars();
  if len > 0 && slice.char(len - 1) == '\n' {
    len - 1
  } else {
    len
  }
}

/// Cells from `visual_x` to the next tab stop.
#[inline]
pub fn tab_width_at(visual_x: usize, tab_width: usize) -> usize {
  tab_width - (visual_x % tab_width)
}

/// Cells `ch` occupies when drawn at `visual_x`.
///
/// Control chars other than tab are drawn as a one-cell replacement glyph.
pub fn char_width(ch: char, visual_x: usize, tab_width: usize) -> usize {
  match ch {
    '\t' => tab_width_at(visual_x, tab_width),
    ch if ch.is_control() => 1,
    ch => ch.width().unwrap_or(0),
  }
}

/// Like [`coords_at_pos`], but the column is in terminal cells: wide chars
/// take two and tabs extend to the next stop.
pub fn visual_coords_at_pos(text: RopeSlice, pos: usize, tab_width: usize) -> Position {
  let pos = pos.min(text.len_chars());
  let line = text.char_to_line(pos);
  let line_start = text.line_to_char(line);
  let col = text
    .slice(line_start..pos)
    .chars()
    .fold(0, |x, ch| x + char_width(ch, x, tab_width));
  Position::new(line, col)
}
