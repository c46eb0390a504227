//! `config.toml` loading.
//!
//! The user config (in [`config_dir`](crate::config_dir)) is read first and
//! the workspace config (`.the-quill/config.toml`) is merged on top of it.
//! A missing file contributes nothing.

use std::{
  io,
  path::{
    Path,
    PathBuf,
  },
};

use serde::Deserialize;
use the_quill_lib::{
  outline::DEFAULT_PREVIEW_WIDTH,
  session::SessionOptions,
  theme::{
    PaletteOverrides,
    ThemeError,
    Themes,
  },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
  #[error("invalid config: {0}")]
  Invalid(#[from] toml::de::Error),
  #[error("preview-width must be at least 1")]
  PreviewWidth,
  #[error("custom-theme: {0}")]
  Theme(#[from] ThemeError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
  /// Theme active at startup.
  pub theme:         String,
  /// Chars of a version shown in the history outline.
  pub preview_width: usize,
  pub custom_theme:  Option<PaletteOverrides>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      theme:         Themes::LIGHT.to_string(),
      preview_width: DEFAULT_PREVIEW_WIDTH,
      custom_theme:  None,
    }
  }
}

impl Config {
  /// Load the user config merged with the current workspace's config.
  pub fn load_default() -> Result<Self> {
    Self::load(&crate::config_file(), Some(&crate::workspace_config_file()))
  }

  /// Load `user_file`, then merge `workspace_file` over it.
  pub fn load(user_file: &Path, workspace_file: Option<&Path>) -> Result<Self> {
    let merged = [Some(user_file), workspace_file]
      .into_iter()
      .flatten()
      .filter_map(|path| read_toml(path).transpose())
      .collect::<Result<Vec<_>>>()?
      .into_iter()
      .fold(None, |acc, value| {
        Some(match acc {
          Some(acc) => crate::merge_toml_values(acc, value, 3),
          None => value,
        })
      });

    match merged {
      Some(value) => Self::from_value(value),
      None => Ok(Self::default()),
    }
  }

  pub fn from_value(value: toml::Value) -> Result<Self> {
    let config: Self = value.try_into()?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.preview_width == 0 {
      return Err(ConfigError::PreviewWidth);
    }
    Ok(())
  }

  /// Session settings described by this config.
  ///
  /// The custom theme inherits from the configured startup theme unless it
  /// names its own base; when the startup theme is itself `custom` (or not a
  /// built-in) it inherits from light.
  pub fn session_options(&self) -> Result<SessionOptions> {
    let mut themes = Themes::default();
    if let Some(overrides) = &self.custom_theme {
      let base = if themes.get(&self.theme).is_some() {
        self.theme.as_str()
      } else {
        Themes::LIGHT
      };
      themes.set_custom(overrides, base)?;
    }

    Ok(SessionOptions {
      preview_width: self.preview_width,
      themes,
      theme: self.theme.clone(),
    })
  }
}

fn read_toml(path: &Path) -> Result<Option<toml::Value>> {
  let contents = match std::fs::read_to_string(path) {
    Ok(contents) => contents,
    Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => {
      return Err(ConfigError::Read {
        path: path.to_path_buf(),
        source,
      });
    },
  };
  log::debug!("loading config from {}", path.display());
  toml::from_str(&contents)
    .map(Some)
    .map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
}
