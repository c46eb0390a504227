//! Per-paragraph version history.
//!
//! The history maps a paragraph index to every version of that paragraph
//! recorded by an explicit commit, oldest first. Editing the document never
//! touches it; only [`History::commit`] grows it and only [`History::clear`]
//! shrinks it.
//!
//! Indices are positional. Inserting a paragraph in the middle of the
//! document shifts the content under every later index, and the next commit
//! appends that shifted content to the old index's versions.

use std::collections::BTreeMap;

use crate::paragraph;

/// Versions recorded for one paragraph index. Never empty, never holds two
/// equal adjacent entries.
pub type Versions = Vec<String>;

/// Outcome of a single [`History::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
  /// Indices that gained a version, ascending.
  pub grown:     Vec<usize>,
  /// Indices whose paragraph was non-blank in the committed text, ascending.
  pub committed: Vec<usize>,
}

impl CommitReport {
  /// True when the commit recorded nothing new.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.grown.is_empty()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
  paragraphs: BTreeMap<usize, Versions>,
}

impl History {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the paragraphs of `text` that differ from their last version.
  ///
  /// Blank paragraphs keep their index but are skipped. Committing the same
  /// text twice is a no-op the second time.
  pub fn commit(&mut self, text: &str) -> CommitReport {
    let mut report = CommitReport::default();
    for (index, paragraph) in paragraph::split(text).into_iter().enumerate() {
      if paragraph::is_blank(paragraph) {
        continue;
      }
      report.committed.push(index);

      let versions = self.paragraphs.entry(index).or_default();
      if versions.last().map(String::as_str) != Some(paragraph) {
        versions.push(paragraph.to_owned());
        report.grown.push(index);
      }
    }

    if !report.is_empty() {
      log::debug!("commit recorded paragraphs {:?}", report.grown);
    }
    report
  }

  /// Versions recorded for `index`, oldest first.
  pub fn versions(&self, index: usize) -> Option<&[String]> {
    self.paragraphs.get(&index).map(Vec::as_slice)
  }

  /// Most recent version recorded for `index`.
  pub fn latest(&self, index: usize) -> Option<&str> {
    self
      .paragraphs
      .get(&index)
      .and_then(|versions| versions.last())
      .map(String::as_str)
  }

  /// All recorded indices with their versions, ascending by index.
  pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
    self
      .paragraphs
      .iter()
      .map(|(index, versions)| (*index, versions.as_slice()))
  }

  /// Number of paragraph indices with at least one version.
  #[inline]
  pub fn len(&self) -> usize {
    self.paragraphs.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.paragraphs.is_empty()
  }

  /// Total number of versions across all indices.
  pub fn version_count(&self) -> usize {
    self.paragraphs.values().map(Vec::len).sum()
  }

  pub fn clear(&mut self) {
    self.paragraphs.clear();
  }
}
