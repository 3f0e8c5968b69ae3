// src/core/options.rs

//! User settings consumed when building default invocations.
//!
//! The settings file is a flat TOML table keyed by the same names the desktop
//! frontends use (`RedumperPath`, `PreferredDumpSpeedCD`, ...). Every key is
//! optional; a missing key or a value of the wrong shape falls back to the
//! default with a warning, so a partially broken file still loads.

use crate::{
    core::paths::{self, PathError},
    models::{MediaType, Program},
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::{Table, Value};

/// Failures that stop the settings file from loading at all.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Could not read settings file '{path}': {source}")]
    Read {
        /// The settings file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not TOML.
    #[error("Settings file '{path}' is not valid TOML: {source}")]
    Parse {
        /// The settings file.
        path: String,
        /// The TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// The default settings path could not be worked out.
    #[error(transparent)]
    Path(#[from] PathError),
}

#[cfg(windows)]
const DEFAULT_REDUMPER_PATH: &str = "Programs\\Redumper\\redumper.exe";
#[cfg(not(windows))]
const DEFAULT_REDUMPER_PATH: &str = "Programs/Redumper/redumper";

const KNOWN_KEYS: [&str; 12] = [
    "RedumperPath",
    "InternalProgram",
    "DefaultOutputPath",
    "PreferredDumpSpeedCD",
    "PreferredDumpSpeedDVD",
    "PreferredDumpSpeedHDDVD",
    "PreferredDumpSpeedBD",
    "RedumperEnableDebug",
    "RedumperEnableVerbose",
    "RedumperRereadCount",
    "ToolsInSeparateWindow",
    "IncludeArtifacts",
];

/// Every setting, with its default filled in when the file leaves it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// `RedumperPath`: the Redumper executable, `~` and `$VAR` allowed.
    pub redumper_path: String,
    /// `InternalProgram`: the program used when none is named.
    pub internal_program: Program,
    /// `DefaultOutputPath`: where generated output filenames go.
    pub default_output_path: String,
    /// `PreferredDumpSpeedCD`
    pub preferred_dump_speed_cd: i32,
    /// `PreferredDumpSpeedDVD`
    pub preferred_dump_speed_dvd: i32,
    /// `PreferredDumpSpeedHDDVD`
    pub preferred_dump_speed_hddvd: i32,
    /// `PreferredDumpSpeedBD`
    pub preferred_dump_speed_bd: i32,
    /// `RedumperEnableDebug`: adds `--debug` to defaults.
    pub redumper_enable_debug: bool,
    /// `RedumperEnableVerbose`: adds `--verbose` to defaults.
    pub redumper_enable_verbose: bool,
    /// `RedumperRereadCount`: the default `--retries`.
    pub redumper_reread_count: i32,
    /// `ToolsInSeparateWindow`: whether `run` gives the tool the terminal.
    pub tools_in_separate_window: bool,
    /// `IncludeArtifacts`: whether log files go into the submission info.
    pub include_artifacts: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            redumper_path: DEFAULT_REDUMPER_PATH.to_string(),
            internal_program: Program::Redumper,
            default_output_path: "ISO".to_string(),
            preferred_dump_speed_cd: 24,
            preferred_dump_speed_dvd: 16,
            preferred_dump_speed_hddvd: 8,
            preferred_dump_speed_bd: 8,
            redumper_enable_debug: false,
            redumper_enable_verbose: false,
            redumper_reread_count: 20,
            tools_in_separate_window: true,
            include_artifacts: false,
        }
    }
}

impl Options {
    /// Loads the settings file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No settings file at '{}', using defaults.", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let table: Table = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;

        log::debug!("Loaded settings from '{}'", path.display());
        Ok(Self::from_table(&table))
    }

    /// Loads the settings file from the application config directory.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::get_config_path()?;
        Self::load(&path)
    }

    /// Builds options from a flat string dictionary, as stored by the frontends.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let table: Table = settings
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        Self::from_table(&table)
    }

    /// Builds options from a parsed TOML table, falling back per key.
    pub fn from_table(table: &Table) -> Self {
        for key in table.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
            log::debug!("Ignoring unknown setting '{}'", key);
        }

        let defaults = Self::default();
        let internal_program = match table.get("InternalProgram") {
            None => defaults.internal_program,
            Some(value) => match value.as_str().and_then(Program::from_setting) {
                Some(program) => program,
                None => fallback("InternalProgram", value, defaults.internal_program),
            },
        };

        Self {
            redumper_path: read_string(table, "RedumperPath", defaults.redumper_path),
            internal_program,
            default_output_path: read_string(
                table,
                "DefaultOutputPath",
                defaults.default_output_path,
            ),
            preferred_dump_speed_cd: read_i32(
                table,
                "PreferredDumpSpeedCD",
                defaults.preferred_dump_speed_cd,
            ),
            preferred_dump_speed_dvd: read_i32(
                table,
                "PreferredDumpSpeedDVD",
                defaults.preferred_dump_speed_dvd,
            ),
            preferred_dump_speed_hddvd: read_i32(
                table,
                "PreferredDumpSpeedHDDVD",
                defaults.preferred_dump_speed_hddvd,
            ),
            preferred_dump_speed_bd: read_i32(
                table,
                "PreferredDumpSpeedBD",
                defaults.preferred_dump_speed_bd,
            ),
            redumper_enable_debug: read_bool(
                table,
                "RedumperEnableDebug",
                defaults.redumper_enable_debug,
            ),
            redumper_enable_verbose: read_bool(
                table,
                "RedumperEnableVerbose",
                defaults.redumper_enable_verbose,
            ),
            redumper_reread_count: read_i32(
                table,
                "RedumperRereadCount",
                defaults.redumper_reread_count,
            ),
            tools_in_separate_window: read_bool(
                table,
                "ToolsInSeparateWindow",
                defaults.tools_in_separate_window,
            ),
            include_artifacts: read_bool(table, "IncludeArtifacts", defaults.include_artifacts),
        }
    }

    /// The preferred read speed for a media type, if one applies.
    pub fn preferred_speed(&self, media_type: Option<MediaType>) -> Option<i32> {
        match media_type? {
            MediaType::CdRom | MediaType::GdRom => Some(self.preferred_dump_speed_cd),
            MediaType::Dvd
            | MediaType::NintendoGameCubeGameDisc
            | MediaType::NintendoWiiOpticalDisc => Some(self.preferred_dump_speed_dvd),
            MediaType::HdDvd => Some(self.preferred_dump_speed_hddvd),
            MediaType::BluRay => Some(self.preferred_dump_speed_bd),
            _ => None,
        }
    }

    /// The configured executable of a program, expanded. `None` for programs
    /// this application has no path setting for.
    pub fn tool_path(&self, program: Program) -> Option<Result<PathBuf, PathError>> {
        match program {
            Program::Redumper => Some(paths::expand_tool_path(&self.redumper_path)),
            _ => None,
        }
    }
}

fn fallback<T: std::fmt::Debug>(key: &str, value: &Value, default: T) -> T {
    log::warn!(
        "Setting '{}' has an unusable value {}; using default {:?}.",
        key,
        value,
        default
    );
    default
}

fn read_string(table: &Table, key: &str, default: String) -> String {
    match table.get(key) {
        None => default,
        Some(Value::String(s)) => s.clone(),
        Some(other) => fallback(key, other, default),
    }
}

fn read_i32(table: &Table, key: &str, default: i32) -> i32 {
    let Some(raw) = table.get(key) else {
        return default;
    };
    let parsed = match raw {
        Value::Integer(i) => i32::try_from(*i).ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| fallback(key, raw, default))
}

fn read_bool(table: &Table, key: &str, default: bool) -> bool {
    let Some(raw) = table.get(key) else {
        return default;
    };
    let parsed = match raw {
        Value::Boolean(b) => Some(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    };
    parsed.unwrap_or_else(|| fallback(key, raw, default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.internal_program, Program::Redumper);
        assert_eq!(options.default_output_path, "ISO");
        assert_eq!(options.preferred_dump_speed_cd, 24);
        assert_eq!(options.preferred_dump_speed_dvd, 16);
        assert_eq!(options.redumper_reread_count, 20);
        assert!(options.tools_in_separate_window);
        assert!(!options.include_artifacts);
    }

    #[test]
    fn test_load_typed_toml() {
        // --- Setup ---
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
RedumperPath = "/opt/redumper/redumper"
PreferredDumpSpeedCD = 8
RedumperEnableDebug = true
RedumperRereadCount = 5
InternalProgram = "redumper"
"#
        )
        .unwrap();

        // --- Execute ---
        let options = Options::load(file.path()).unwrap();

        // --- Assert ---
        assert_eq!(options.redumper_path, "/opt/redumper/redumper");
        assert_eq!(options.preferred_dump_speed_cd, 8);
        assert!(options.redumper_enable_debug);
        assert_eq!(options.redumper_reread_count, 5);
        assert_eq!(options.internal_program, Program::Redumper);
        assert_eq!(options.preferred_dump_speed_dvd, 16);
    }

    #[test]
    fn test_string_values_are_accepted() {
        let settings = HashMap::from([
            ("PreferredDumpSpeedDVD".to_string(), "4".to_string()),
            ("RedumperEnableVerbose".to_string(), "True".to_string()),
            ("InternalProgram".to_string(), "DiscImageCreator".to_string()),
        ]);
        let options = Options::from_settings(&settings);
        assert_eq!(options.preferred_dump_speed_dvd, 4);
        assert!(options.redumper_enable_verbose);
        assert_eq!(options.internal_program, Program::DiscImageCreator);
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let settings = HashMap::from([
            ("PreferredDumpSpeedCD".to_string(), "fast".to_string()),
            ("RedumperEnableDebug".to_string(), "maybe".to_string()),
            ("InternalProgram".to_string(), "Nonexistent".to_string()),
        ]);
        let options = Options::from_settings(&settings);
        assert_eq!(options, Options::default());

        let table: Table = toml::from_str("RedumperRereadCount = 99999999999\nRedumperPath = 3").unwrap();
        let options = Options::from_table(&table);
        assert_eq!(options.redumper_reread_count, 20);
        assert_eq!(options.redumper_path, DEFAULT_REDUMPER_PATH);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let options = Options::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is = = not toml").unwrap();
        assert!(matches!(
            Options::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_preferred_speed_per_media() {
        let options = Options::default();
        assert_eq!(options.preferred_speed(Some(MediaType::CdRom)), Some(24));
        assert_eq!(options.preferred_speed(Some(MediaType::GdRom)), Some(24));
        assert_eq!(options.preferred_speed(Some(MediaType::Dvd)), Some(16));
        assert_eq!(options.preferred_speed(Some(MediaType::HdDvd)), Some(8));
        assert_eq!(options.preferred_speed(Some(MediaType::BluRay)), Some(8));
        assert_eq!(options.preferred_speed(Some(MediaType::FloppyDisk)), None);
        assert_eq!(options.preferred_speed(None), None);
    }
}
