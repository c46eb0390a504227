//! Application context (state).

use std::{
  collections::BTreeSet,
  path::PathBuf,
};

use ratatui::widgets::ListState;
use the_quill_lib::{
  messages::MessageCenter,
  outline::OutlineRow,
  position::{
    Position,
    TAB_WIDTH,
  },
  session::{
    GuardedAction,
    Outcome,
    SaveChoice,
    Session,
    SessionError,
  },
};

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
  #[default]
  Editor,
  History,
}

/// What a path typed into the prompt is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPurpose {
  Open,
  /// Save under a new name, then run the pending action if any.
  SaveAs { then: Option<GuardedAction> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
  Path { purpose: PathPurpose, input: String },
  /// "Save changes first?" for an action that would drop the text.
  Confirm { action: GuardedAction },
}

impl Prompt {
  pub fn title(&self) -> &'static str {
    match self {
      Self::Path {
        purpose: PathPurpose::Open,
        ..
      } => "Open File",
      Self::Path { .. } => "Save File",
      Self::Confirm { .. } => "Save Changes?",
    }
  }
}

pub struct Ctx {
  pub session:       Session,
  pub messages:      MessageCenter,
  pub focus:         Focus,
  pub outline_state: ListState,
  pub prompt:        Option<Prompt>,
  /// Paragraphs edited since the last commit, fed by the document's change
  /// notifications.
  pub edited:        BTreeSet<usize>,
  /// First visible row/column of the editor.
  pub scroll:        Position,
  /// Editor text area, in cells. Updated on every render.
  pub viewport:      (u16, u16),
  pub should_quit:   bool,
  pub needs_render:  bool,
}

impl Ctx {
  pub fn new(session: Session) -> Self {
    Self {
      session,
      messages: MessageCenter::default(),
      focus: Focus::default(),
      outline_state: ListState::default(),
      prompt: None,
      edited: BTreeSet::new(),
      scroll: Position::zero(),
      viewport: (80, 24),
      should_quit: false,
      needs_render: true,
    }
  }

  /// Load the file named on the command line. A missing file becomes the
  /// save target of an empty document.
  pub fn open_initial(&mut self, path: PathBuf) {
    if !path.exists() {
      self
        .messages
        .info(Some("open".into()), format!("[new] {}", path.display()));
      self.session.set_path(path);
      return;
    }
    match self.session.open(&path) {
      Ok(()) => self.after_text_replaced(),
      Err(err) => {
        self.messages.error(Some("open".into()), err.to_string());
      },
    }
  }

  /// Pull queued paragraph change notifications from the document.
  pub fn sync_changes(&mut self) {
    let changes = self.session.document_mut().take_changes();
    if changes.is_empty() {
      return;
    }
    for change in changes {
      log::trace!("paragraph {} changed", change.index);
      self.edited.insert(change.index);
    }
    self.needs_render = true;
  }

  pub fn commit(&mut self) {
    self.sync_changes();
    let report = self.session.commit();
    self.edited.clear();
    self.clamp_outline_selection();
    let text = if report.is_empty() {
      "Nothing new to commit".to_string()
    } else {
      format!("Committed {} changed paragraph(s)", report.grown.len())
    };
    self.messages.info(Some("commit".into()), text);
    self.needs_render = true;
  }

  /// Revert to the version under the outline selection.
  pub fn revert_selected(&mut self) {
    let Some(selected) = self.outline_state.selected() else {
      return;
    };
    let Some(node) = self.session.outline().version_at(selected) else {
      self
        .messages
        .warning(Some("revert".into()), "Select a version to revert to");
      return;
    };
    let (index, version, text) = (node.paragraph, node.version, node.text.clone());

    if self.session.revert(index, &text) {
      self.sync_changes();
      self.messages.info(
        Some("revert".into()),
        format!("Paragraph {} reverted to version {}", index + 1, version + 1),
      );
    } else {
      self.messages.info(
        Some("revert".into()),
        format!("Paragraph {} unchanged", index + 1),
      );
    }
    self.needs_render = true;
  }

  pub fn save(&mut self) {
    match self.session.save() {
      Ok(()) => self.report_saved(),
      Err(SessionError::NoPath) => {
        self.prompt = Some(Prompt::Path {
          purpose: PathPurpose::SaveAs { then: None },
          input:   String::new(),
        });
      },
      Err(err) => {
        self.messages.error(Some("save".into()), err.to_string());
      },
    }
    self.needs_render = true;
  }

  pub fn request_open(&mut self) {
    self.prompt = Some(Prompt::Path {
      purpose: PathPurpose::Open,
      input:   String::new(),
    });
    self.needs_render = true;
  }

  /// Run `action`, asking about unsaved changes first when needed.
  pub fn guarded(&mut self, action: GuardedAction) {
    let result = self.session.perform(action.clone());
    self.finish(action, result);
  }

  /// Answer the open "save changes?" prompt.
  pub fn answer_confirm(&mut self, choice: SaveChoice) {
    let Some(Prompt::Confirm { action }) = self.prompt.take() else {
      return;
    };
    match self.session.confirm(action.clone(), choice) {
      Err(SessionError::NoPath) => {
        self.prompt = Some(Prompt::Path {
          purpose: PathPurpose::SaveAs { then: Some(action) },
          input:   String::new(),
        });
      },
      result => {
        if choice == SaveChoice::Save && result.is_ok() {
          self.report_saved();
        }
        self.finish(action, result);
      },
    }
    self.needs_render = true;
  }

  /// Accept the path typed into the open prompt.
  pub fn submit_path(&mut self) {
    let Some(Prompt::Path { purpose, input }) = self.prompt.take() else {
      return;
    };
    let input = input.trim();
    if input.is_empty() {
      self.needs_render = true;
      return;
    }
    let path = the_quill_loader::expand_tilde(std::path::Path::new(input));

    match purpose {
      PathPurpose::Open => self.guarded(GuardedAction::Open(path)),
      PathPurpose::SaveAs { then } => match self.session.save_as(path) {
        Ok(()) => {
          self.report_saved();
          if let Some(action) = then {
            self.guarded(action);
          }
        },
        Err(err) => {
          self.messages.error(Some("save".into()), err.to_string());
        },
      },
    }
    self.needs_render = true;
  }

  pub fn cancel_prompt(&mut self) {
    if self.prompt.take().is_some() {
      log::debug!("prompt cancelled");
    }
    self.needs_render = true;
  }

  pub fn toggle_theme(&mut self) {
    self.session.toggle_theme();
    let name = self.session.theme().name().to_string();
    self.messages.info(Some("theme".into()), format!("Theme: {name}"));
    self.needs_render = true;
  }

  pub fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      Focus::Editor => Focus::History,
      Focus::History => Focus::Editor,
    };
    if self.focus == Focus::History && self.outline_state.selected().is_none() {
      self.clamp_outline_selection();
    }
    self.needs_render = true;
  }

  pub fn select_next(&mut self) {
    let count = self.session.outline().row_count();
    if count == 0 {
      return;
    }
    let next = match self.outline_state.selected() {
      Some(idx) => (idx + 1).min(count - 1),
      None => 0,
    };
    self.outline_state.select(Some(next));
    self.needs_render = true;
  }

  pub fn select_prev(&mut self) {
    if self.session.outline().row_count() == 0 {
      return;
    }
    let prev = self
      .outline_state
      .selected()
      .map_or(0, |idx| idx.saturating_sub(1));
    self.outline_state.select(Some(prev));
    self.needs_render = true;
  }

  /// Label shown for an outline row, marking paragraphs edited since the
  /// last commit.
  pub fn outline_label(&self, row: OutlineRow<'_>) -> String {
    match row {
      OutlineRow::Paragraph(node) if self.edited.contains(&node.index) => {
        format!("{} *", node.label)
      },
      OutlineRow::Paragraph(node) => node.label.clone(),
      OutlineRow::Version(node) => format!("  {}", node.label),
    }
  }

  /// Scroll the editor so the cursor stays inside the viewport. Columns are
  /// terminal cells.
  pub fn ensure_cursor_visible(&mut self) {
    let cursor = self.session.document().visual_cursor_position(TAB_WIDTH);
    let (width, height) = (
      usize::from(self.viewport.0.max(1)),
      usize::from(self.viewport.1.max(1)),
    );

    if cursor.row < self.scroll.row {
      self.scroll.row = cursor.row;
    } else if cursor.row >= self.scroll.row + height {
      self.scroll.row = cursor.row + 1 - height;
    }

    if cursor.col < self.scroll.col {
      self.scroll.col = cursor.col;
    } else if cursor.col >= self.scroll.col + width {
      self.scroll.col = cursor.col + 1 - width;
    }
  }

  fn finish(&mut self, action: GuardedAction, result: Result<Outcome, SessionError>) {
    match result {
      Ok(Outcome::NeedsConfirmation) => {
        self.prompt = Some(Prompt::Confirm { action });
      },
      Ok(Outcome::Done) => {
        self.after_text_replaced();
        if let GuardedAction::Open(path) = action {
          self
            .messages
            .info(Some("open".into()), format!("Opened {}", path.display()));
        }
      },
      Ok(Outcome::Quit) => self.should_quit = true,
      Ok(Outcome::Cancelled) => {},
      Err(err) => {
        self.messages.error(None, err.to_string());
      },
    }
    self.needs_render = true;
  }

  /// Reset view state after the whole text was swapped out.
  fn after_text_replaced(&mut self) {
    self.sync_changes();
    self.edited.clear();
    self.scroll = Position::zero();
    self.clamp_outline_selection();
  }

  fn clamp_outline_selection(&mut self) {
    let count = self.session.outline().row_count();
    let selected = match (count, self.outline_state.selected()) {
      (0, _) => None,
      (_, Some(idx)) => Some(idx.min(count - 1)),
      (_, None) => Some(0),
    };
    self.outline_state.select(selected);
  }

  fn report_saved(&mut self) {
    let name = self.session.display_name();
    self.messages.info(Some("save".into()), format!("Saved {name}"));
  }
}
