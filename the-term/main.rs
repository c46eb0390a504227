//! Terminal client for the-quill: a plain-text editor that keeps a version
//! history for every paragraph.

mod ctx;
mod input;
mod layout;
mod logging;
mod render;
mod terminal;
mod theme;

use std::{
  path::PathBuf,
  time::Duration,
};

use clap::Parser;
use crossterm::event::{
  self,
  Event,
  KeyEventKind,
};
use eyre::Result;
use the_quill_lib::session::{
  Session,
  SessionOptions,
};
use the_quill_loader::config::Config;

use crate::ctx::Ctx;

#[derive(Debug, Parser)]
#[command(name = "the-quill")]
#[command(about = "Plain-text editor with per-paragraph edit history")]
struct Cli {
  /// File to open; created on first save if it does not exist
  file: Option<PathBuf>,

  /// Read config from this file instead of the default location
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Write the log here instead of the cache directory
  #[arg(long, value_name = "FILE")]
  log: Option<PathBuf>,

  /// Increase logging verbosity (-v info, -vv debug)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Theme to start with, overriding the config
  #[arg(long, value_name = "NAME")]
  theme: Option<String>,
}

fn session_options(cli: &Cli) -> SessionOptions {
  let config = Config::load_default()
    .and_then(|config| config.session_options())
    .unwrap_or_else(|err| {
      eprintln!("Bad config: {err}");
      eprintln!("Using default configuration");
      log::warn!("config error, using defaults: {err}");
      SessionOptions::default()
    });

  match &cli.theme {
    Some(theme) => SessionOptions {
      theme: theme.clone(),
      ..config
    },
    None => config,
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  the_quill_loader::initialize_config_file(cli.config.clone());
  the_quill_loader::initialize_log_file(cli.log.clone());
  logging::setup_logging(&the_quill_loader::log_file(), cli.verbose)?;
  log::info!("starting the-quill");

  let mut ctx = Ctx::new(Session::new(session_options(&cli)));
  if let Some(path) = cli.file {
    ctx.open_initial(path);
  }

  let mut terminal = terminal::Terminal::new()?;
  terminal.enter_raw_mode()?;

  while !ctx.should_quit {
    if ctx.needs_render {
      terminal.draw(|frame| render::render(frame, &mut ctx))?;
      ctx.needs_render = false;
    }

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key(&mut ctx, key);
        },
        Event::Resize(..) => ctx.needs_render = true,
        _ => {},
      }
    }
  }

  terminal.leave_raw_mode()?;
  log::info!("exiting");
  Ok(())
}
