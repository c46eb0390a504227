//! Editing session: the document, its paragraph history and the outline
//! shown for it, plus the file and theme the session is bound to.
//!
//! This is the seam between the core and whatever presents it. Every
//! operation is synchronous: a commit hands back the rebuilt outline, a
//! revert request hands back whether the document text changed.

use std::{
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use thiserror::Error;

use crate::{
  document::Document,
  history::{
    CommitReport,
    History,
  },
  outline::{
    DEFAULT_PREVIEW_WIDTH,
    Outline,
  },
  theme::{
    Theme,
    Themes,
  },
};

#[derive(Debug, Error)]
pub enum SessionError {
  #[error("no file name; save with a path first")]
  NoPath,
  #[error("failed to read '{}': {source}", .path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to write '{}': {source}", .path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// An action that would discard unsaved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedAction {
  New,
  Open(PathBuf),
  Quit,
}

/// Answer to "save changes first?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
  Save,
  Discard,
  Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// The action ran.
  Done,
  /// The action ran and the session should end.
  Quit,
  /// The document has unsaved changes; ask the user and call
  /// [`Session::confirm`].
  NeedsConfirmation,
  Cancelled,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
  pub preview_width: usize,
  pub themes:        Themes,
  /// Name of the initial theme; unknown names fall back to light.
  pub theme:         String,
}

impl Default for SessionOptions {
  fn default() -> Self {
    Self {
      preview_width: DEFAULT_PREVIEW_WIDTH,
      themes:        Themes::default(),
      theme:         Themes::LIGHT.to_string(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Session {
  document:      Document,
  history:       History,
  outline:       Outline,
  path:          Option<PathBuf>,
  themes:        Themes,
  theme:         Theme,
  preview_width: usize,
}

impl Default for Session {
  fn default() -> Self {
    Self::new(SessionOptions::default())
  }
}

impl Session {
  pub fn new(options: SessionOptions) -> Self {
    let theme = match options.themes.get(&options.theme) {
      Some(theme) => theme.clone(),
      None => {
        log::warn!("unknown theme '{}', using light", options.theme);
        Theme::light()
      },
    };
    Self {
      document: Document::default(),
      history: History::new(),
      outline: Outline::default(),
      path: None,
      themes: options.themes,
      theme,
      preview_width: options.preview_width,
    }
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  pub fn document_mut(&mut self) -> &mut Document {
    &mut self.document
  }

  pub fn history(&self) -> &History {
    &self.history
  }

  pub fn outline(&self) -> &Outline {
    &self.outline
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  pub fn display_name(&self) -> String {
    match &self.path {
      Some(path) => path.display().to_string(),
      None => "<untitled>".to_string(),
    }
  }

  pub fn is_modified(&self) -> bool {
    self.document.is_modified()
  }

  pub fn theme(&self) -> &Theme {
    &self.theme
  }

  pub fn themes(&self) -> &Themes {
    &self.themes
  }

  /// Switch to the theme called `name`. Unknown names are ignored.
  pub fn set_theme(&mut self, name: &str) -> bool {
    let Some(theme) = self.themes.get(name) else {
      log::debug!("ignoring unknown theme '{name}'");
      return false;
    };
    self.theme = theme.clone();
    log::info!("theme set to {name}");
    true
  }

  /// Flip between the light and dark built-ins.
  pub fn toggle_theme(&mut self) {
    let next = if self.theme.is_dark() {
      Themes::LIGHT
    } else {
      Themes::DARK
    };
    self.set_theme(next);
  }

  /// Record changed paragraphs and rebuild the outline from this commit.
  pub fn commit(&mut self) -> CommitReport {
    let report = self.history.commit(&self.document.contents());
    self.outline = Outline::build(&self.history, &report.committed, self.preview_width);
    log::info!(
      "committed {} paragraph(s), {} changed",
      report.committed.len(),
      report.grown.len()
    );
    report
  }

  /// Replace paragraph `index` with `text`. History is left alone.
  pub fn revert(&mut self, index: usize, text: &str) -> bool {
    let reverted = self.document.revert_paragraph(index, text);
    if reverted {
      log::info!("reverted paragraph {}", index + 1);
    }
    reverted
  }

  /// Start over: empty text, no history, no file.
  pub fn new_file(&mut self) {
    self.document.clear();
    self.history.clear();
    self.outline = Outline::default();
    self.path = None;
    log::info!("new file");
  }

  /// Load `path` into the document. History is kept.
  pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<()> {
    let path = path.into();
    let text = fs::read_to_string(&path).map_err(|source| SessionError::Read {
      path: path.clone(),
      source,
    })?;
    self.document.set_text(&text);
    self.document.set_cursor(0);
    self.document.mark_saved();
    log::info!("opened {}", path.display());
    self.path = Some(path);
    Ok(())
  }

  /// Bind the session to `path` without touching the disk, for a file that
  /// does not exist yet.
  pub fn set_path(&mut self, path: impl Into<PathBuf>) {
    self.path = Some(path.into());
  }

  /// Write the document to its current path.
  pub fn save(&mut self) -> Result<()> {
    let path = self.path.clone().ok_or(SessionError::NoPath)?;
    self.write(&path)
  }

  /// Write the document to `path` and bind the session to it.
  pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<()> {
    let path = path.into();
    self.write(&path)?;
    self.path = Some(path);
    Ok(())
  }

  fn write(&mut self, path: &Path) -> Result<()> {
    fs::write(path, self.document.contents()).map_err(|source| SessionError::Write {
      path: path.to_path_buf(),
      source,
    })?;
    self.document.mark_saved();
    log::info!("saved {}", path.display());
    Ok(())
  }

  /// Run `action`, unless it would drop unsaved text.
  pub fn perform(&mut self, action: GuardedAction) -> Result<Outcome> {
    if self.is_modified() {
      return Ok(Outcome::NeedsConfirmation);
    }
    self.run(action)
  }

  /// Run `action` after the user answered the save prompt.
  ///
  /// `Save` without a bound path fails with [`SessionError::NoPath`] and
  /// leaves everything as it was.
  pub fn confirm(&mut self, action: GuardedAction, choice: SaveChoice) -> Result<Outcome> {
    match choice {
      SaveChoice::Cancel => Ok(Outcome::Cancelled),
      SaveChoice::Save => {
        self.save()?;
        self.run(action)
      },
      SaveChoice::Discard => self.run(action),
    }
  }

  fn run(&mut self, action: GuardedAction) -> Result<Outcome> {
    match action {
      GuardedAction::New => {
        self.new_file();
        Ok(Outcome::Done)
      },
      GuardedAction::Open(path) => {
        self.open(path)?;
        Ok(Outcome::Done)
      },
      GuardedAction::Quit => Ok(Outcome::Quit),
    }
  }
}
