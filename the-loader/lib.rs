pub mod config;

use std::{
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Name of the per-workspace config directory.
pub const WORKSPACE_DIR: &str = ".the-quill";

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  ensure_parent_dir(&config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("THE_QUILL_CONFIG_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.config_dir().join("the-quill"),
    Err(err) => {
      log::warn!("unable to find the config directory: {err}");
      PathBuf::from(".the-quill")
    },
  }
}

pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("THE_QUILL_CACHE_DIR") {
    return expand_tilde(Path::new(&dir));
  }
  match choose_base_strategy() {
    Ok(strategy) => strategy.cache_dir().join("the-quill"),
    Err(err) => {
      log::warn!("unable to find the cache directory: {err}");
      std::env::temp_dir().join("the-quill")
    },
  }
}

pub fn config_file() -> PathBuf {
  CONFIG_FILE
    .get_or_init(|| {
      let path = default_config_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn workspace_config_file() -> PathBuf {
  find_workspace().0.join(WORKSPACE_DIR).join("config.toml")
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("the-quill.log")
}

/// Merge two TOML documents, merging values from `right` onto `left`
///
/// `merge_depth` sets the nesting depth up to which values are merged instead
/// of overridden.
///
/// When a table exists in both `left` and `right`, the merged table consists of
/// all keys in `left`'s table unioned with all keys in `right` with the values
/// of `right` being merged recursively onto values of `left`.
///
/// `crate::merge_toml_values(a, b, 3)` combines, for example:
///
/// b:
/// ```toml
/// theme = "dark"
/// [custom-theme]
/// highlight = "#FF8800"
/// ```
/// a:
/// ```toml
/// [custom-theme]
/// inherits = "light"
/// ```
///
/// into:
/// ```toml
/// theme = "dark"
/// [custom-theme]
/// inherits = "light"
/// highlight = "#FF8800"
/// ```
pub fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) => {
      if merge_depth > 0 {
        for (rname, rvalue) in right_map {
          match left_map.remove(&rname) {
            Some(lvalue) => {
              let merged_value = merge_toml_values(lvalue, rvalue, merge_depth - 1);
              left_map.insert(rname, merged_value);
            },
            None => {
              left_map.insert(rname, rvalue);
            },
          }
        }
        Value::Table(left_map)
      } else {
        Value::Table(right_map)
      }
    },
    // Catch everything else we didn't handle, and use the right value
    (_, value) => value,
  }
}

/// Finds the current workspace folder.
///
/// This function starts searching the FS upward from the CWD
/// and returns the first directory that contains either `.git`, `.jj`
/// or `.the-quill`. If no workspace was found returns (CWD, true).
/// Otherwise (workspace, false) is returned
pub fn find_workspace() -> (PathBuf, bool) {
  match std::env::current_dir() {
    Ok(current_dir) => find_workspace_in(current_dir),
    Err(_) => (PathBuf::new(), true),
  }
}

pub fn find_workspace_in(dir: impl AsRef<Path>) -> (PathBuf, bool) {
  let dir = dir.as_ref();
  for ancestor in dir.ancestors() {
    if ancestor.join(".git").exists()
      || ancestor.join(".jj").exists()
      || ancestor.join(WORKSPACE_DIR).exists()
    {
      return (ancestor.to_owned(), false);
    }
  }

  (dir.to_owned(), true)
}

/// Replace a leading `~` with the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  if let Ok(rest) = path.strip_prefix("~")
    && let Ok(home) = etcetera::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
  {
    std::fs::create_dir_all(parent).ok();
  }
}

#[cfg(test)]
mod merge_toml_tests {
  use toml::Value;

  use super::merge_toml_values;

  #[test]
  fn workspace_config_merges_onto_user_config() {
    const USER: &str = r##"
        theme = "dark"
        preview-width = 40
        [custom-theme]
        inherits = "dark"
        highlight = "#FF8800"
        "##;
    const WORKSPACE: &str = r##"
        theme = "custom"
        [custom-theme]
        text = "#EEEEEE"
        "##;

    let user: Value = toml::from_str(USER).unwrap();
    let workspace: Value = toml::from_str(WORKSPACE).unwrap();
    let merged = merge_toml_values(user, workspace, 3);

    assert_eq!(merged.get("theme").unwrap().as_str().unwrap(), "custom");
    assert_eq!(merged.get("preview-width").unwrap().as_integer().unwrap(), 40);
    let custom = merged.get("custom-theme").unwrap();
    // Keys from both sides survive inside merged tables.
    assert_eq!(custom.get("inherits").unwrap().as_str().unwrap(), "dark");
    assert_eq!(custom.get("highlight").unwrap().as_str().unwrap(), "#FF8800");
    assert_eq!(custom.get("text").unwrap().as_str().unwrap(), "#EEEEEE");
  }

  #[test]
  fn zero_depth_replaces_tables() {
    let left: Value = toml::from_str("a = 1\nb = 2").unwrap();
    let right: Value = toml::from_str("b = 3").unwrap();
    let merged = merge_toml_values(left, right, 0);
    assert!(merged.get("a").is_none());
    assert_eq!(merged.get("b").unwrap().as_integer().unwrap(), 3);
  }
}

#[cfg(test)]
mod workspace_tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn finds_marker_in_ancestor() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join(WORKSPACE_DIR)).unwrap();
    let nested = root.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let (found, fallback) = find_workspace_in(&nested);
    assert_eq!(found, root.path());
    assert!(!fallback);
  }

  #[test]
  fn plain_paths_are_not_expanded() {
    let path = Path::new("/etc/the-quill");
    assert_eq!(expand_tilde(path), path);
  }
}
