//! Config directory resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name looked up inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Directory under `~/.config` used when `--dir` is not given.
const APP_DIR: &str = "nhkpg";

/// Resolves the config file path.
///
/// `--dir` wins and is used as given (relative paths stay relative to the
/// working directory). Otherwise `~/.config/nhkpg/config.toml`.
///
/// # Errors
///
/// Returns an error if `HOME` is not set and no `dir` was given.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.join(CONFIG_FILE)),
        None => {
            let home = std::env::var_os("HOME").context("HOME environment variable is not set")?;
            Ok(default_config_path(Path::new(&home)))
        }
    }
}

/// `{home}/.config/nhkpg/config.toml`.
fn default_config_path(home: &Path) -> PathBuf {
    home.join(".config").join(APP_DIR).join(CONFIG_FILE)
}
