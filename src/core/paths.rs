// src/core/paths.rs

use crate::constants::{APP_DIR, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors resolving the config directory or a configured path.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The application directory could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// The directory that was being created.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// `~` or a `$VAR` in a configured path could not be expanded.
    #[error("Failed to expand path '{template}': {message}")]
    Expansion {
        /// The path as configured.
        template: String,
        /// What went wrong.
        message: String,
    },
}

/// Returns the application configuration directory (`~/.config/discrun`),
/// creating it if needed. The result is computed once and cached.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = CONFIG_DIR.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR);

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path of the default settings file.
pub fn get_config_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Expands `~` and environment variables in a configured tool path.
/// Existing paths are canonicalized without the Windows `\\?\` prefix.
pub fn expand_tool_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        message: e.to_string(),
    })?;

    let path = PathBuf::from(expanded.into_owned());
    if path.exists() {
        Ok(dunce::canonicalize(&path).unwrap_or(path))
    } else {
        Ok(path)
    }
}

/// Splits an output filename into its directory and its stem.
/// `ISO/game/track.bin` becomes (`ISO/game`, `track`).
pub fn split_output_path(filename: &str) -> (Option<PathBuf>, Option<String>) {
    let path = Path::new(filename);
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty());
    (directory, stem)
}

/// Appends an extension to a base path without replacing an existing one.
/// `dump/game.1` plus `log` is `dump/game.1.log`.
pub fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut raw = base.as_os_str().to_owned();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}
