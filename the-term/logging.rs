use std::path::Path;

use eyre::Result;
use log::LevelFilter;

/// Verbosity flag count to a level filter. Warnings are always kept.
pub fn level_for(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    _ => LevelFilter::Debug,
  }
}

/// Route `log` records into `path`. The terminal owns stdout, so nothing is
/// echoed there.
pub fn setup_logging(path: &Path, verbosity: u8) -> Result<()> {
  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level_for(verbosity))
    .chain(fern::log_file(path)?)
    .apply()?;

  Ok(())
}
