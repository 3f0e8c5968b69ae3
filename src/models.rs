// src/models.rs

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// --- TARGET CONTEXT ---
// What an invocation is being built for. These mirror the identifiers used by
// the redump.org database, limited to what the profiles actually dispatch on.

/// A disc-based system that can be dumped.
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedumpSystem {
    /// IBM PC compatible
    #[value(name = "pc")]
    IbmPcCompatible,
    /// Konami Python 2
    #[value(name = "python2")]
    KonamiPython2,
    /// Microsoft Xbox
    #[value(name = "xbox")]
    MicrosoftXbox,
    /// Nintendo GameCube
    #[value(name = "gc")]
    NintendoGameCube,
    /// Nintendo Wii
    #[value(name = "wii")]
    NintendoWii,
    /// Sega Dreamcast
    #[value(name = "dc")]
    SegaDreamcast,
    /// Sega Saturn
    #[value(name = "saturn")]
    SegaSaturn,
    /// Sony PlayStation
    #[value(name = "ps1")]
    SonyPlayStation,
    /// Sony PlayStation 2
    #[value(name = "ps2")]
    SonyPlayStation2,
    /// Sony PlayStation 3
    #[value(name = "ps3")]
    SonyPlayStation3,
    /// Sony PlayStation 4
    #[value(name = "ps4")]
    SonyPlayStation4,
    /// Sony PlayStation 5
    #[value(name = "ps5")]
    SonyPlayStation5,
    /// Audio CD
    #[value(name = "audio")]
    AudioCd,
}

impl RedumpSystem {
    /// The full name, as shown to users.
    pub fn long_name(self) -> &'static str {
        match self {
            Self::IbmPcCompatible => "IBM PC compatible",
            Self::KonamiPython2 => "Konami Python 2",
            Self::MicrosoftXbox => "Microsoft Xbox",
            Self::NintendoGameCube => "Nintendo GameCube",
            Self::NintendoWii => "Nintendo Wii",
            Self::SegaDreamcast => "Sega Dreamcast",
            Self::SegaSaturn => "Sega Saturn",
            Self::SonyPlayStation => "Sony PlayStation",
            Self::SonyPlayStation2 => "Sony PlayStation 2",
            Self::SonyPlayStation3 => "Sony PlayStation 3",
            Self::SonyPlayStation4 => "Sony PlayStation 4",
            Self::SonyPlayStation5 => "Sony PlayStation 5",
            Self::AudioCd => "Audio CD",
        }
    }
}

impl fmt::Display for RedumpSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// Physical media type of the disc in the drive.
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// CD-ROM
    #[value(name = "cd")]
    CdRom,
    /// DVD-ROM
    #[value(name = "dvd")]
    Dvd,
    /// GD-ROM
    #[value(name = "gd")]
    GdRom,
    /// HD-DVD-ROM
    #[value(name = "hddvd")]
    HdDvd,
    /// BD-ROM
    #[value(name = "bd")]
    BluRay,
    /// Floppy Disk
    #[value(name = "floppy")]
    FloppyDisk,
    /// Hard Disk
    #[value(name = "hdd")]
    HardDisk,
    /// CompactFlash
    #[value(name = "cf")]
    CompactFlash,
    /// SD Card
    #[value(name = "sd")]
    SdCard,
    /// Flash Drive
    #[value(name = "flash")]
    FlashDrive,
    /// GameCube Game Disc
    #[value(name = "gc-disc")]
    NintendoGameCubeGameDisc,
    /// Wii Optical Disc
    #[value(name = "wii-disc")]
    NintendoWiiOpticalDisc,
    /// UMD
    #[value(name = "umd")]
    Umd,
    /// LaserDisc
    #[value(name = "laserdisc")]
    LaserDisc,
    /// Cassette Tape
    #[value(name = "cassette")]
    Cassette,
}

impl MediaType {
    /// The full name, as shown to users.
    pub fn long_name(self) -> &'static str {
        match self {
            Self::CdRom => "CD-ROM",
            Self::Dvd => "DVD-ROM",
            Self::GdRom => "GD-ROM",
            Self::HdDvd => "HD-DVD-ROM",
            Self::BluRay => "BD-ROM",
            Self::FloppyDisk => "Floppy Disk",
            Self::HardDisk => "Hard Disk",
            Self::CompactFlash => "CompactFlash",
            Self::SdCard => "SD Card",
            Self::FlashDrive => "Flash Drive",
            Self::NintendoGameCubeGameDisc => "GameCube Game Disc",
            Self::NintendoWiiOpticalDisc => "Wii Optical Disc",
            Self::Umd => "UMD",
            Self::LaserDisc => "LaserDisc",
            Self::Cassette => "Cassette Tape",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// External programs known to the application. Only some of them have a
/// parameter profile; the rest are recognized for verification only.
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Program {
    /// Aaru
    Aaru,
    /// DiscImageCreator
    #[value(name = "dic")]
    DiscImageCreator,
    /// Redumper
    #[default]
    Redumper,
    /// CleanRip
    #[value(name = "cleanrip")]
    CleanRip,
    /// DCDumper
    #[value(name = "dcdumper")]
    DcDumper,
    /// UmdImageCreator
    #[value(name = "umdic")]
    UmdImageCreator,
}

impl Program {
    /// The name used in settings files and messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aaru => "Aaru",
            Self::DiscImageCreator => "DiscImageCreator",
            Self::Redumper => "Redumper",
            Self::CleanRip => "CleanRip",
            Self::DcDumper => "DCDumper",
            Self::UmdImageCreator => "UmdImageCreator",
        }
    }

    /// Parses the name used in settings files. Case-insensitive.
    pub fn from_setting(value: &str) -> Option<Self> {
        let value = value.trim();
        [
            Self::Aaru,
            Self::DiscImageCreator,
            Self::Redumper,
            Self::CleanRip,
            Self::DcDumper,
            Self::UmdImageCreator,
        ]
        .into_iter()
        .find(|p| p.name().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque reference to the drive holding the disc. Never validated here;
/// it is handed through to the tool and to the disc inspectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drive {
    /// What the tool receives for `--drive` (e.g. `E:` or `/dev/sr0`).
    pub name: String,
    /// Where the disc filesystem is mounted, if it is readable at all.
    pub mount_point: Option<PathBuf>,
}

impl Drive {
    /// A drive by name. On Windows the name also gives the mount point.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        // On Windows the drive letter doubles as the mount point.
        let mount_point = if cfg!(target_os = "windows") {
            Some(PathBuf::from(format!("{}\\", name.trim_end_matches('\\'))))
        } else {
            None
        };
        Self { name, mount_point }
    }

    /// Overrides where the disc filesystem is read from.
    pub fn with_mount_point(mut self, mount_point: impl Into<PathBuf>) -> Self {
        self.mount_point = Some(mount_point.into());
        self
    }
}

// --- SUBMISSION INFO ---
// The record handed to the profile after a dump. Profiles only ever write to it.

/// Release region of a disc.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Europe
    Europe,
    /// Japan
    Japan,
    /// Korea
    Korea,
    /// USA
    Usa,
    /// Asia
    Asia,
    /// World
    World,
}

/// Keys of the free-form "special fields" in the comments section.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SiteCode {
    /// The serial printed on the disc or in its boot files.
    InternalSerialName,
    /// The filesystem volume label.
    VolumeLabel,
}

/// The "common disc info" section.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonDiscInfo {
    /// The dumped system.
    pub system: Option<RedumpSystem>,
    /// The dumped media type.
    pub media: Option<MediaType>,
    /// Region read off the disc.
    pub region: Option<Region>,
    /// Build date of the boot executable, `YYYY-MM-DD`.
    pub exe_date_build_date: Option<String>,
    /// Free-form fields keyed by site code.
    #[serde(default)]
    pub comments_special_fields: BTreeMap<SiteCode, String>,
}

/// The "version and editions" section.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionAndEditions {
    /// Version string read off the disc.
    pub version: Option<String>,
}

/// The "dumping info" section.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpingInfo {
    /// Name of the program that made the dump.
    pub dumping_program: Option<String>,
    /// The invocation it was run with.
    pub parameters: Option<String>,
}

/// Everything gathered about a dumped disc.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionInfo {
    /// See [`CommonDiscInfo`].
    pub common_disc_info: CommonDiscInfo,
    /// See [`VersionAndEditions`].
    pub version_and_editions: VersionAndEditions,
    /// See [`DumpingInfo`].
    pub dumping_info: DumpingInfo,
    /// Output file name to file content, only filled when artifacts are requested.
    #[serde(default)]
    pub artifacts: BTreeMap<String, String>,
}

/// Result of a support check. The message is meant to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportStatus {
    /// Whether the dump can go ahead.
    pub supported: bool,
    /// Why, in a sentence.
    pub message: String,
}

impl SupportStatus {
    /// A supported status.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            supported: true,
            message: message.into(),
        }
    }

    /// An unsupported status.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            supported: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_from_setting_is_case_insensitive() {
        assert_eq!(Program::from_setting("redumper"), Some(Program::Redumper));
        assert_eq!(
            Program::from_setting(" DiscImageCreator "),
            Some(Program::DiscImageCreator)
        );
        assert_eq!(Program::from_setting("nope"), None);
    }

    #[test]
    fn test_drive_mount_point_override() {
        let drive = Drive::new("/dev/sr0").with_mount_point("/mnt/cdrom");
        assert_eq!(drive.name, "/dev/sr0");
        assert_eq!(drive.mount_point, Some(PathBuf::from("/mnt/cdrom")));
    }
}
