//! History outline: the paragraph -> version tree shown beside the editor.
//!
//! The outline is a snapshot built on commit. It lists the paragraphs that
//! were non-blank in that commit, each with every recorded version and a
//! short preview of its text.

use crate::history::History;

/// Preview length, in chars, used when no other width is configured.
pub const DEFAULT_PREVIEW_WIDTH: usize = 30;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNode {
  /// Paragraph index this version belongs to.
  pub paragraph: usize,
  /// 0-based position in the paragraph's history.
  pub version:   usize,
  pub label:     String,
  /// Full text, carried by a revert request.
  pub text:      String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphNode {
  pub index:    usize,
  pub label:    String,
  pub versions: Vec<VersionNode>,
}

/// A single line of the flattened outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineRow<'a> {
  Paragraph(&'a ParagraphNode),
  Version(&'a VersionNode),
}

impl OutlineRow<'_> {
  pub fn label(&self) -> &str {
    match self {
      Self::Paragraph(node) => &node.label,
      Self::Version(node) => &node.label,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
  nodes: Vec<ParagraphNode>,
}

impl Outline {
  /// Build the outline for `paragraphs` from `history`.
  ///
  /// Indices with no recorded versions are skipped.
  pub fn build(history: &History, paragraphs: &[usize], preview_width: usize) -> Self {
    let nodes = paragraphs
      .iter()
      .filter_map(|&index| {
        let versions = history.versions(index)?;
        let versions = versions
          .iter()
          .enumerate()
          .map(|(version, text)| VersionNode {
            paragraph: index,
            version,
            label: format!("Version {}: {}", version + 1, preview(text, preview_width)),
            text: text.clone(),
          })
          .collect();
        Some(ParagraphNode {
          index,
          label: format!("Paragraph {}", index + 1),
          versions,
        })
      })
      .collect();
    Self { nodes }
  }

  pub fn nodes(&self) -> &[ParagraphNode] {
    &self.nodes
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Depth-first rows: each paragraph followed by its versions.
  pub fn rows(&self) -> impl Iterator<Item = OutlineRow<'_>> {
    self.nodes.iter().flat_map(|node| {
      std::iter::once(OutlineRow::Paragraph(node))
        .chain(node.versions.iter().map(OutlineRow::Version))
    })
  }

  pub fn row_count(&self) -> usize {
    self.nodes.iter().map(|node| 1 + node.versions.len()).sum()
  }

  pub fn row(&self, idx: usize) -> Option<OutlineRow<'_>> {
    self.rows().nth(idx)
  }

  /// The version under row `idx`, if that row is a version.
  pub fn version_at(&self, idx: usize) -> Option<&VersionNode> {
    match self.row(idx)? {
      OutlineRow::Version(node) => Some(node),
      OutlineRow::Paragraph(_) => None,
    }
  }
}

/// First `width` chars of `text`, with an ellipsis when something was cut.
pub fn preview(text: &str, width: usize) -> String {
  match text.char_indices().nth(width) {
    Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
    None => text.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn labels(outline: &Outline) -> Vec<String> {
    outline.rows().map(|row| row.label().to_string()).collect()
  }

  #[test]
  fn preview_truncates_long_text() {
    assert_eq!(preview("short", 30), "short");
    let exact = "a".repeat(30);
    assert_eq!(preview(&exact, 30), exact);
    let long = "b".repeat(31);
    assert_eq!(preview(&long, 30), format!("{}...", "b".repeat(30)));
  }

  #[test]
  fn preview_counts_chars_not_bytes() {
    assert_eq!(preview("\u{e9}\u{e9}\u{e9}", 2), "\u{e9}\u{e9}...");
  }

  #[test]
  fn builds_paragraph_and_version_rows() {
    let mut history = History::new();
    history.commit("Hello\n\nWorld");
    let report = history.commit("Hello there\n\nWorld");
    let outline = Outline::build(&history, &report.committed, DEFAULT_PREVIEW_WIDTH);

    assert_eq!(labels(&outline), vec![
      "Paragraph 1",
      "Version 1: Hello",
      "Version 2: Hello there",
      "Paragraph 2",
      "Version 1: World",
    ]);
    assert_eq!(outline.row_count(), 5);
  }

  #[test]
  fn version_rows_carry_revert_payload() {
    let mut history = History::new();
    history.commit("Hello\n\nWorld");
    let report = history.commit("Hello there\n\nWorld");
    let outline = Outline::build(&history, &report.committed, DEFAULT_PREVIEW_WIDTH);

    assert!(outline.version_at(0).is_none());
    let node = outline.version_at(1).unwrap();
    assert_eq!((node.paragraph, node.version, node.text.as_str()), (0, 0, "Hello"));
    assert_eq!(outline.version_at(4).unwrap().paragraph, 1);
    assert!(outline.version_at(5).is_none());
  }

  #[test]
  fn only_committed_paragraphs_are_listed() {
    let mut history = History::new();
    history.commit("a\n\nb\n\nc");
    let report = history.commit("a\n\n  \n\nc");
    let outline = Outline::build(&history, &report.committed, DEFAULT_PREVIEW_WIDTH);
    let indices: Vec<_> = outline.nodes().iter().map(|node| node.index).collect();
    assert_eq!(indices, vec![0, 2]);
  }

  #[test]
  fn empty_history_builds_empty_outline() {
    let outline = Outline::build(&History::new(), &[0, 1], DEFAULT_PREVIEW_WIDTH);
    assert!(outline.is_empty());
    assert_eq!(outline.row_count(), 0);
  }
}
