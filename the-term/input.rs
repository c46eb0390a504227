//! Input handling - maps key events to context actions.

use crossterm::event::{
  KeyCode,
  KeyEvent,
  KeyModifiers,
};
use the_quill_lib::session::{
  GuardedAction,
  SaveChoice,
};

use crate::ctx::{
  Ctx,
  Focus,
  Prompt,
};

/// Bindings that work regardless of focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
  Commit,
  Save,
  Open,
  New,
  Quit,
  ToggleTheme,
  ToggleFocus,
}

fn global_command(event: &KeyEvent) -> Option<Command> {
  if event.modifiers.contains(KeyModifiers::CONTROL) {
    let KeyCode::Char(c) = event.code else {
      return None;
    };
    return match c.to_ascii_lowercase() {
      'k' => Some(Command::Commit),
      's' => Some(Command::Save),
      'o' => Some(Command::Open),
      'n' => Some(Command::New),
      'q' => Some(Command::Quit),
      't' => Some(Command::ToggleTheme),
      _ => None,
    };
  }
  match event.code {
    KeyCode::Tab | KeyCode::BackTab => Some(Command::ToggleFocus),
    _ => None,
  }
}

pub fn handle_key(ctx: &mut Ctx, event: KeyEvent) {
  if ctx.prompt.is_some() {
    handle_prompt_key(ctx, event);
    return;
  }

  if let Some(command) = global_command(&event) {
    log::debug!("command {command:?}");
    run(ctx, command);
    return;
  }

  match ctx.focus {
    Focus::Editor => handle_editor_key(ctx, event),
    Focus::History => handle_history_key(ctx, event),
  }
}

fn run(ctx: &mut Ctx, command: Command) {
  match command {
    Command::Commit => ctx.commit(),
    Command::Save => ctx.save(),
    Command::Open => ctx.request_open(),
    Command::New => ctx.guarded(GuardedAction::New),
    Command::Quit => ctx.guarded(GuardedAction::Quit),
    Command::ToggleTheme => ctx.toggle_theme(),
    Command::ToggleFocus => ctx.toggle_focus(),
  }
}

fn handle_editor_key(ctx: &mut Ctx, event: KeyEvent) {
  if event
    .modifiers
    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
  {
    return;
  }

  let doc = ctx.session.document_mut();
  match event.code {
    KeyCode::Char(c) => doc.insert_char(c),
    KeyCode::Enter => doc.insert_char('\n'),
    KeyCode::Backspace => {
      doc.delete_backward();
    },
    KeyCode::Delete => {
      doc.delete_forward();
    },
    KeyCode::Left => doc.move_left(),
    KeyCode::Right => doc.move_right(),
    KeyCode::Up => doc.move_up(),
    KeyCode::Down => doc.move_down(),
    KeyCode::Home => doc.move_line_start(),
    KeyCode::End => doc.move_line_end(),
    KeyCode::Esc => {
      ctx.messages.dismiss_active();
    },
    _ => return,
  }

  ctx.sync_changes();
  ctx.needs_render = true;
}

fn handle_history_key(ctx: &mut Ctx, event: KeyEvent) {
  match event.code {
    KeyCode::Down | KeyCode::Char('j') => ctx.select_next(),
    KeyCode::Up | KeyCode::Char('k') => ctx.select_prev(),
    KeyCode::Enter | KeyCode::Char('r') => ctx.revert_selected(),
    KeyCode::Esc => {
      ctx.focus = Focus::Editor;
      ctx.needs_render = true;
    },
    _ => {},
  }
}

fn handle_prompt_key(ctx: &mut Ctx, event: KeyEvent) {
  match ctx.prompt.as_mut() {
    Some(Prompt::Path { input, .. }) => match event.code {
      KeyCode::Enter => ctx.submit_path(),
      KeyCode::Esc => ctx.cancel_prompt(),
      KeyCode::Backspace => {
        input.pop();
        ctx.needs_render = true;
      },
      KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
        input.push(c);
        ctx.needs_render = true;
      },
      _ => {},
    },
    Some(Prompt::Confirm { .. }) => {
      let choice = match event.code {
        KeyCode::Char('s' | 'S' | 'y' | 'Y') => SaveChoice::Save,
        KeyCode::Char('d' | 'D' | 'n' | 'N') => SaveChoice::Discard,
        KeyCode::Char('c' | 'C') | KeyCode::Esc => SaveChoice::Cancel,
        _ => return,
      };
      ctx.answer_confirm(choice);
    },
    None => {},
  }
}
