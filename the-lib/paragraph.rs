//! Paragraph splitting and rejoining.
//!
//! A paragraph is the text between two blank-line delimiters (`"\n\n"`).
//! Paragraphs are addressed by their ordinal position in the current split,
//! so an insertion or deletion shifts every index after it.

/// Separator between two paragraphs.
pub const DELIMITER: &str = "\n\n";

/// Split `text` into paragraphs.
///
/// Always yields at least one element: the empty string splits into `[""]`.
/// Empty and whitespace-only paragraphs keep their slot.
pub fn split(text: &str) -> Vec<&str> {
  text.split(DELIMITER).collect()
}

/// Rejoin paragraphs with [`DELIMITER`]. `join(&split(t)) == t` for any `t`.
pub fn join<S: AsRef<str>>(paragraphs: &[S]) -> String {
  let mut out = String::new();
  for (i, paragraph) in paragraphs.iter().enumerate() {
    if i > 0 {
      out.push_str(DELIMITER);
    }
    out.push_str(paragraph.as_ref());
  }
  out
}

/// Whether a paragraph carries no content worth recording.
#[inline]
pub fn is_blank(paragraph: &str) -> bool {
  paragraph.trim().is_empty()
}

/// Replace the paragraph at `index` in `text` with `target` and rejoin.
///
/// Returns `None` when `index` is past the last paragraph; the caller keeps
/// its text untouched in that case.
pub fn revert(text: &str, index: usize, target: &str) -> Option<String> {
  let mut paragraphs = split(text);
  let slot = paragraphs.get_mut(index)?;
  *slot = target;
  Some(join(&paragraphs))
}

/// Index of the paragraph containing byte offset `byte_idx`.
///
/// Offsets inside a delimiter belong to the paragraph before it. Offsets past
/// the end clamp to the last paragraph.
pub fn paragraph_at(text: &str, byte_idx: usize) -> usize {
  let end = byte_idx.min(text.len());
  let mut index = 0;
  let mut search = 0;
  while let Some(found) = text[search..].find(DELIMITER) {
    let delim_start = search + found;
    if end <= delim_start + 1 {
      break;
    }
    index += 1;
    search = delim_start + DELIMITER.len();
  }
  index
}
