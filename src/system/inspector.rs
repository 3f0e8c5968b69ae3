// src/system/inspector.rs

//! Reads identifying facts off a mounted disc.
//!
//! Profiles call these through the [`DiscInspector`] trait during
//! submission-info enrichment; every call may fail on its own without
//! affecting the others.

use crate::models::{Drive, Region};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

lazy_static! {
    /// `BOOT = cdrom:\SLUS_007.11;1` (PS1) or `BOOT2 = cdrom0:\SLUS_203.12;1` (PS2).
    static ref BOOT_LINE_RE: Regex =
        Regex::new(r"(?im)^\s*BOOT2?\s*=\s*cdrom0?:\\*(?P<path>[^;\r\n]+)").expect("static regex");
    static ref VER_LINE_RE: Regex =
        Regex::new(r"(?im)^\s*VER\s*=\s*(?P<version>\S+)").expect("static regex");
}

/// Offset of the version string inside a PS4 `param.sfo`.
const PS4_VERSION_OFFSET: usize = 0x9A4;
const PS4_VERSION_LENGTH: usize = 5;

/// Why a value could not be read off the disc.
#[derive(Error, Debug)]
pub enum InspectError {
    /// The drive's filesystem is not mounted anywhere known.
    #[error("Drive '{0}' has no readable mount point.")]
    NoMountPoint(String),
    /// A file on the disc could not be read.
    #[error("Could not read '{path}': {source}")]
    Io {
        /// The file on the disc.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but the value is not in it.
    #[error("'{path}' does not contain {what}.")]
    Missing {
        /// The file on the disc.
        path: String,
        /// What was looked for.
        what: &'static str,
    },
}

/// Serial, region and build date of a PlayStation boot executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutableInfo {
    /// Serial derived from the executable name, e.g. `SLUS-00001`.
    pub serial: Option<String>,
    /// Region implied by the serial prefix.
    pub region: Option<Region>,
    /// Modification date of the executable, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Reads identifying data off a mounted disc.
pub trait DiscInspector {
    /// PS1/PS2 boot executable named in `SYSTEM.CNF`.
    fn playstation_executable_info(&self, drive: &Drive) -> Result<ExecutableInfo, InspectError>;
    /// `VER` entry of a PS2 `SYSTEM.CNF`.
    fn playstation2_version(&self, drive: &Drive) -> Result<String, InspectError>;
    /// Version from a PS4 `param.sfo`.
    fn playstation4_version(&self, drive: &Drive) -> Result<String, InspectError>;
    /// Version from a PS5 `param.json`.
    fn playstation5_version(&self, drive: &Drive) -> Result<String, InspectError>;
}

/// Inspects the disc through the drive's mounted filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDiscInspector;

impl DiscInspector for FsDiscInspector {
    fn playstation_executable_info(&self, drive: &Drive) -> Result<ExecutableInfo, InspectError> {
        let root = mount_point(drive)?;
        let cnf_path = root.join("SYSTEM.CNF");
        let cnf = read_text(&cnf_path)?;

        let boot = BOOT_LINE_RE
            .captures(&cnf)
            .and_then(|caps| caps.name("path"))
            .map(|m| m.as_str().trim().replace('\\', "/"))
            .ok_or_else(|| InspectError::Missing {
                path: cnf_path.display().to_string(),
                what: "a BOOT entry",
            })?;

        let executable = boot.rsplit('/').next().unwrap_or(boot.as_str()).to_string();
        let serial = serial_from_executable(&executable);
        let region = serial.as_deref().and_then(region_from_serial);
        let date = fs::metadata(root.join(&boot))
            .and_then(|meta| meta.modified())
            .map(|modified| DateTime::<Utc>::from(modified).format("%Y-%m-%d").to_string())
            .map_err(|e| log::debug!("No date for boot executable '{}': {}", boot, e))
            .ok();

        Ok(ExecutableInfo {
            serial,
            region,
            date,
        })
    }

    fn playstation2_version(&self, drive: &Drive) -> Result<String, InspectError> {
        let cnf_path = mount_point(drive)?.join("SYSTEM.CNF");
        let cnf = read_text(&cnf_path)?;
        VER_LINE_RE
            .captures(&cnf)
            .and_then(|caps| caps.name("version"))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| InspectError::Missing {
                path: cnf_path.display().to_string(),
                what: "a VER entry",
            })
    }

    fn playstation4_version(&self, drive: &Drive) -> Result<String, InspectError> {
        let sfo_path = mount_point(drive)?.join("bd").join("param.sfo");
        let bytes = fs::read(&sfo_path).map_err(|e| InspectError::Io {
            path: sfo_path.display().to_string(),
            source: e,
        })?;
        bytes
            .get(PS4_VERSION_OFFSET..PS4_VERSION_OFFSET + PS4_VERSION_LENGTH)
            .map(|raw| String::from_utf8_lossy(raw).into_owned())
            .ok_or_else(|| InspectError::Missing {
                path: sfo_path.display().to_string(),
                what: "a version field",
            })
    }

    fn playstation5_version(&self, drive: &Drive) -> Result<String, InspectError> {
        let json_path = mount_point(drive)?.join("bd").join("param.json");
        let content = read_text(&json_path)?;
        let missing = || InspectError::Missing {
            path: json_path.display().to_string(),
            what: "a masterVersion field",
        };
        let json: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            log::debug!("'{}' is not valid JSON: {}", json_path.display(), e);
            missing()
        })?;
        json.get("masterVersion")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(missing)
    }
}

fn mount_point(drive: &Drive) -> Result<&Path, InspectError> {
    drive
        .mount_point
        .as_deref()
        .ok_or_else(|| InspectError::NoMountPoint(drive.name.clone()))
}

fn read_text(path: &Path) -> Result<String, InspectError> {
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| InspectError::Io {
            path: path.display().to_string(),
            source: e,
        })
}

/// `SLUS_007.11` becomes `SLUS-00711`.
fn serial_from_executable(executable: &str) -> Option<String> {
    let (prefix, number) = executable.split_once(['_', '-'])?;
    let number: String = number.chars().filter(char::is_ascii_alphanumeric).collect();
    if prefix.is_empty() || number.is_empty() {
        return None;
    }
    Some(format!("{}-{}", prefix.to_ascii_uppercase(), number))
}

/// The third letter of a Sony serial prefix encodes the release territory.
fn region_from_serial(serial: &str) -> Option<Region> {
    match serial.chars().nth(2)? {
        'U' => Some(Region::Usa),
        'E' => Some(Region::Europe),
        'P' | 'M' => Some(Region::Japan),
        'K' => Some(Region::Korea),
        'A' | 'C' => Some(Region::Asia),
        _ => None,
    }
}
