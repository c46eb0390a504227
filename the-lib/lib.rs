//! Paragraph-versioning core for the-quill.
//!
//! Text is split into paragraphs on blank lines. An explicit commit records
//! every paragraph that changed since its last recorded version, and any
//! recorded version can be written back into the document.

pub mod document;
pub mod history;
pub mod messages;
pub mod outline;
pub mod paragraph;
pub mod position;
pub mod session;
pub mod theme;
