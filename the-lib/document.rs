//! Document state: text buffer, cursor and the live-edit change feed.
//!
//! Every mutation of the text re-splits it into paragraphs and compares the
//! result with the split taken after the previous mutation. Differences are
//! queued as [`ParagraphChange`]s for the presentation layer to drain with
//! [`Document::take_changes`]. The feed is an observation channel only; it
//! has no effect on [`History`](crate::history::History).
//!
//! # Example
//!
//! ```no_run
//! use the_quill_lib::document::Document;
//!
//! let mut doc = Document::from("Hello\n\nWorld");
//! doc.set_cursor(5);
//! doc.insert(" there");
//! let changes = doc.take_changes();
//! assert_eq!(changes[0].index, 0);
//! ```

use ropey::Rope;

use crate::{
  paragraph,
  position::{
    Position,
    char_idx_at_coords,
    coords_at_pos,
    line_len,
    visual_coords_at_pos,
  },
};

/// A paragraph whose text differs from the previous edit's split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphChange {
  pub index: usize,
  pub text:  String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DocumentFlags {
  pub modified: bool,
}

#[derive(Debug, Clone)]
pub struct Document {
  text:       Rope,
  /// Cursor as a char index into `text`.
  cursor:     usize,
  version:    u64,
  flags:      DocumentFlags,
  /// Split captured after the last mutation.
  paragraphs: Vec<String>,
  changes:    Vec<ParagraphChange>,
}

impl Default for Document {
  fn default() -> Self {
    Self::new(Rope::new())
  }
}

impl From<&str> for Document {
  fn from(text: &str) -> Self {
    Self::new(Rope::from(text))
  }
}

impl Document {
  /// Create a document. The initial text is the baseline for the change
  /// feed and produces no notifications.
  pub fn new(text: Rope) -> Self {
    let paragraphs = split_owned(&text.to_string());
    Self {
      text,
      cursor: 0,
      version: 0,
      flags: DocumentFlags::default(),
      paragraphs,
      changes: Vec::new(),
    }
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  pub fn contents(&self) -> String {
    self.text.to_string()
  }

  pub fn version(&self) -> u64 {
    self.version
  }

  pub fn flags(&self) -> DocumentFlags {
    self.flags
  }

  pub fn is_modified(&self) -> bool {
    self.flags.modified
  }

  /// Clear the modified flag after the text has been written out.
  pub fn mark_saved(&mut self) {
    self.flags.modified = false;
  }

  /// Paragraphs as of the last mutation.
  pub fn paragraphs(&self) -> &[String] {
    &self.paragraphs
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn set_cursor(&mut self, pos: usize) {
    self.cursor = pos.min(self.text.len_chars());
  }

  /// Row/column of the cursor, both in chars.
  pub fn cursor_position(&self) -> Position {
    coords_at_pos(self.text.slice(..), self.cursor)
  }

  /// Row of the cursor and its column in terminal cells.
  pub fn visual_cursor_position(&self, tab_width: usize) -> Position {
    visual_coords_at_pos(self.text.slice(..), self.cursor, tab_width)
  }

  /// Index of the paragraph holding the cursor.
  pub fn cursor_paragraph(&self) -> usize {
    let byte = self.text.char_to_byte(self.cursor);
    paragraph::paragraph_at(&self.contents(), byte)
  }

  /// Drain the change notifications queued since the last call.
  pub fn take_changes(&mut self) -> Vec<ParagraphChange> {
    std::mem::take(&mut self.changes)
  }

  /// Insert `text` at the cursor and move the cursor past it.
  pub fn insert(&mut self, text: &str) {
    if text.is_empty() {
      return;
    }
    self.text.insert(self.cursor, text);
    self.cursor += text.chars().count();
    self.edited();
  }

  pub fn insert_char(&mut self, ch: char) {
    self.text.insert_char(self.cursor, ch);
    self.cursor += 1;
    self.edited();
  }

  /// Delete the char before the cursor. Returns false at the start of text.
  pub fn delete_backward(&mut self) -> bool {
    if self.cursor == 0 {
      return false;
    }
    self.text.remove(self.cursor - 1..self.cursor);
    self.cursor -= 1;
    self.edited();
    true
  }

  /// Delete the char under the cursor. Returns false at the end of text.
  pub fn delete_forward(&mut self) -> bool {
    if self.cursor >= self.text.len_chars() {
      return false;
    }
    self.text.remove(self.cursor..self.cursor + 1);
    self.edited();
    true
  }

  /// Replace the whole text. The cursor is clamped to the new length.
  pub fn set_text(&mut self, text: &str) {
    self.text = Rope::from(text);
    self.cursor = self.cursor.min(self.text.len_chars());
    self.edited();
  }

  /// Empty the document and reset the modified flag.
  pub fn clear(&mut self) {
    self.text = Rope::new();
    self.cursor = 0;
    self.edited();
    self.flags.modified = false;
  }

  /// Replace paragraph `index` with `target`.
  ///
  /// Out-of-range indices leave the document untouched and return false.
  pub fn revert_paragraph(&mut self, index: usize, target: &str) -> bool {
    let current = self.contents();
    let Some(reverted) = paragraph::revert(&current, index, target) else {
      log::debug!(
        "revert of paragraph {index} ignored: document has {} paragraphs",
        self.paragraphs.len()
      );
      return false;
    };
    if reverted == current {
      return false;
    }
    self.set_text(&reverted);
    true
  }

  pub fn move_left(&mut self) {
    self.cursor = self.cursor.saturating_sub(1);
  }

  pub fn move_right(&mut self) {
    self.set_cursor(self.cursor + 1);
  }

  pub fn move_up(&mut self) {
    let pos = self.cursor_position();
    if pos.row == 0 {
      self.cursor = 0;
      return;
    }
    self.move_to(pos.row - 1, pos.col);
  }

  pub fn move_down(&mut self) {
    let pos = self.cursor_position();
    if pos.row + 1 >= self.text.len_lines() {
      self.cursor = self.text.len_chars();
      return;
    }
    self.move_to(pos.row + 1, pos.col);
  }

  pub fn move_line_start(&mut self) {
    let row = self.cursor_position().row;
    self.cursor = self.text.line_to_char(row);
  }

  pub fn move_line_end(&mut self) {
    let row = self.cursor_position().row;
    self.cursor = self.text.line_to_char(row) + line_len(self.text.slice(..), row);
  }

  fn move_to(&mut self, row: usize, col: usize) {
    self.cursor = char_idx_at_coords(self.text.slice(..), Position::new(row, col));
  }

  fn edited(&mut self) {
    self.version = self.version.saturating_add(1);
    self.flags.modified = true;

    let next = split_owned(&self.text.to_string());
    for (index, new) in next.iter().enumerate() {
      if self.paragraphs.get(index) != Some(new) {
        self.changes.push(ParagraphChange {
          index,
          text: new.clone(),
        });
      }
    }
    self.paragraphs = next;
  }
}

fn split_owned(text: &str) -> Vec<String> {
  paragraph::split(text).into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn change(index: usize, text: &str) -> ParagraphChange {
    ParagraphChange {
      index,
      text: text.to_string(),
    }
  }

  #[test]
  fn new_document_has_no_pending_changes() {
    let mut doc = Document::from("Hello\n\nWorld");
    assert!(doc.take_changes().is_empty());
    assert!(!doc.is_modified());
    assert_eq!(doc.paragraphs(), ["Hello", "World"]);
  }

  #[test]
  fn typing_reports_the_edited_paragraph() {
    let mut doc = Document::from("Hello\n\nWorld");
    doc.set_cursor(5);
    doc.insert(" there");
    assert_eq!(doc.take_changes(), vec![change(0, "Hello there")]);
    assert!(doc.is_modified());
    assert_eq!(doc.contents(), "Hello there\n\nWorld");
  }

  #[test]
  fn changes_compare_against_previous_edit() {
    let mut doc = Document::from("ab");
    doc.set_cursor(2);
    doc.insert_char('c');
    doc.insert_char('d');
    assert_eq!(doc.take_changes(), vec![change(0, "abc"), change(0, "abcd")]);
    assert!(doc.take_changes().is_empty());
  }

  #[test]
  fn appended_paragraphs_are_reported() {
    let mut doc = Document::from("Hello");
    doc.set_cursor(5);
    doc.insert("\n\nNew");
    assert_eq!(doc.take_changes(), vec![change(1, "New")]);
  }

  #[test]
  fn shrinking_reports_only_surviving_indices() {
    let mut doc = Document::from("a\n\nb");
    doc.set_text("ab");
    assert_eq!(doc.take_changes(), vec![change(0, "ab")]);
    assert_eq!(doc.paragraphs(), ["ab"]);
  }

  #[test]
  fn deleting_at_the_edges_is_a_noop() {
    let mut doc = Document::from("x");
    assert!(!doc.delete_backward());
    doc.set_cursor(1);
    assert!(!doc.delete_forward());
    assert!(doc.take_changes().is_empty());
    assert!(doc.delete_backward());
    assert_eq!(doc.contents(), "");
  }

  #[test]
  fn revert_rewrites_one_paragraph() {
    let mut doc = Document::from("Hello there\n\nWorld");
    assert!(!doc.is_modified());
    assert!(doc.revert_paragraph(0, "Hello"));
    assert_eq!(doc.contents(), "Hello\n\nWorld");
    assert_eq!(doc.take_changes(), vec![change(0, "Hello")]);
    // A revert is unsaved work like any other edit.
    assert!(doc.is_modified());
  }

  #[test]
  fn revert_out_of_bounds_leaves_text() {
    let mut doc = Document::from("Hello\n\nWorld");
    assert!(!doc.revert_paragraph(5, "x"));
    assert_eq!(doc.contents(), "Hello\n\nWorld");
    assert!(!doc.is_modified());
    assert!(doc.take_changes().is_empty());
  }

  #[test]
  fn revert_to_identical_text_is_not_an_edit() {
    let mut doc = Document::from("Hello\n\nWorld");
    assert!(!doc.revert_paragraph(1, "World"));
    assert!(!doc.is_modified());
  }

  #[test]
  fn clear_resets_modified() {
    let mut doc = Document::from("a");
    doc.insert("b");
    doc.clear();
    assert_eq!(doc.contents(), "");
    assert!(!doc.is_modified());
    assert_eq!(doc.paragraphs(), [""]);
  }

  #[test]
  fn vertical_movement_clamps_column() {
    let mut doc = Document::from("long line\nab\nlonger line");
    doc.set_cursor(7);
    doc.move_down();
    assert_eq!(doc.cursor_position(), Position::new(1, 2));
    doc.move_down();
    assert_eq!(doc.cursor_position(), Position::new(2, 2));
    doc.move_line_end();
    assert_eq!(doc.cursor_position(), Position::new(2, 11));
    doc.move_down();
    assert_eq!(doc.cursor(), doc.text().len_chars());
    doc.move_line_start();
    doc.move_up();
    doc.move_up();
    assert_eq!(doc.cursor_position(), Position::new(0, 0));
    doc.move_up();
    assert_eq!(doc.cursor(), 0);
  }

  #[test]
  fn cursor_paragraph_follows_cursor() {
    let mut doc = Document::from("one\n\ntwo\n\nthree");
    assert_eq!(doc.cursor_paragraph(), 0);
    doc.set_cursor(6);
    assert_eq!(doc.cursor_paragraph(), 1);
    doc.set_cursor(100);
    assert_eq!(doc.cursor_paragraph(), 2);
  }

  #[test]
  fn multibyte_text_keeps_char_cursor() {
    let mut doc = Document::from("h\u{e9}llo");
    doc.set_cursor(2);
    doc.insert("\u{fc}");
    assert_eq!(doc.contents(), "h\u{e9}\u{fc}llo");
    assert_eq!(doc.cursor(), 3);
    assert_eq!(doc.cursor_paragraph(), 0);
  }

  #[test]
  fn visual_cursor_counts_cells() {
    let mut doc = Document::from("\u{4f60}\u{597d}\na\tb");
    doc.set_cursor(2);
    assert_eq!(doc.cursor_position(), Position::new(0, 2));
    assert_eq!(doc.visual_cursor_position(4), Position::new(0, 4));
    doc.set_cursor(6);
    assert_eq!(doc.cursor_position(), Position::new(1, 3));
    assert_eq!(doc.visual_cursor_position(4), Position::new(1, 5));
  }
}
