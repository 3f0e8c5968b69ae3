// src/profiles/redumper.rs

//! Redumper: flag grammar, default invocation and output files.

use super::{DumpContext, EnrichContext, ToolProfile};
use crate::{
    core::{
        flags::{Bounds, CommandSpec, FlagSpec, Grammar, Value, ValueKind},
        options::Options,
        parameters::Parameters,
        paths::{split_output_path, with_suffix},
    },
    models::{MediaType, Program, RedumpSystem, SiteCode, SubmissionInfo},
    system::inspector::ExecutableInfo,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Redumper subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `cd`: dump, protection, refine, split and info in one run.
    Cd,
    /// `dump`: reads the disc only.
    Dump,
    /// `info`: prints what the drive and disc report.
    Info,
    /// `protection`: scans for copy protection.
    Protection,
    /// `refine`: re-reads bad sectors of an earlier dump.
    Refine,
    /// `split`: cuts an earlier dump into tracks.
    Split,
}

/// Redumper flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `--help`
    Help,
    /// `--audio-silence-threshold`
    AudioSilenceThreshold,
    /// `--cdi-correct-offset`
    CdiCorrectOffset,
    /// `--cdi-ready-normalize`
    CdiReadyNormalize,
    /// `--debug`
    Debug,
    /// `--descramble-new`
    DescrambleNew,
    /// `--drive`
    Drive,
    /// `--force-offset`
    ForceOffset,
    /// `--force-qtoc`
    ForceQtoc,
    /// `--force-split`
    ForceSplit,
    /// `--force-toc`
    ForceToc,
    /// `--iso9660-trim`
    Iso9660Trim,
    /// `--image-name`
    ImageName,
    /// `--image-path`
    ImagePath,
    /// `--leave-unchanged`
    LeaveUnchanged,
    /// `--overwrite`
    Overwrite,
    /// `--refine-subchannel`
    RefineSubchannel,
    /// `--retries`
    Retries,
    /// `--ring-size`
    RingSize,
    /// `--skip`
    Skip,
    /// `--skip-fill`
    SkipFill,
    /// `--skip-leadin`
    SkipLeadIn,
    /// `--skip-size`
    SkipSize,
    /// `--speed`
    Speed,
    /// `--stop-lba`
    StopLba,
    /// `--unsupported`
    Unsupported,
    /// `--verbose`
    Verbose,
}

/// A Redumper invocation.
pub type RedumperParameters = Parameters<Flag, Command>;

const ANY_I32: ValueKind = ValueKind::Int32(Bounds::unbounded());
const COUNT: ValueKind = ValueKind::Int32(Bounds::at_least(0));

// Declaration order is generation order.
static FLAGS: &[FlagSpec<Flag>] = &[
    FlagSpec::new(Flag::Help, "--help", ValueKind::Switch).short("-h"),
    FlagSpec::new(Flag::AudioSilenceThreshold, "--audio-silence-threshold", ANY_I32),
    FlagSpec::new(Flag::CdiCorrectOffset, "--cdi-correct-offset", ValueKind::Switch),
    FlagSpec::new(Flag::CdiReadyNormalize, "--cdi-ready-normalize", ValueKind::Switch),
    FlagSpec::new(Flag::Debug, "--debug", ValueKind::Switch),
    FlagSpec::new(Flag::DescrambleNew, "--descramble-new", ValueKind::Switch),
    FlagSpec::new(Flag::Drive, "--drive", ValueKind::Text),
    FlagSpec::new(Flag::ForceOffset, "--force-offset", ANY_I32),
    FlagSpec::new(Flag::ForceQtoc, "--force-qtoc", ValueKind::Switch),
    FlagSpec::new(Flag::ForceSplit, "--force-split", ValueKind::Switch),
    FlagSpec::new(Flag::ForceToc, "--force-toc", ValueKind::Switch),
    FlagSpec::new(Flag::Iso9660Trim, "--iso9660-trim", ValueKind::Switch),
    FlagSpec::new(Flag::ImageName, "--image-name", ValueKind::Text),
    FlagSpec::new(Flag::ImagePath, "--image-path", ValueKind::Text),
    FlagSpec::new(Flag::LeaveUnchanged, "--leave-unchanged", ValueKind::Switch),
    FlagSpec::new(Flag::Overwrite, "--overwrite", ValueKind::Switch),
    FlagSpec::new(Flag::RefineSubchannel, "--refine-subchannel", ValueKind::Switch),
    FlagSpec::new(Flag::Retries, "--retries", COUNT),
    FlagSpec::new(Flag::RingSize, "--ring-size", COUNT),
    FlagSpec::new(Flag::Skip, "--skip", ValueKind::Text),
    FlagSpec::new(Flag::SkipFill, "--skip-fill", ValueKind::UInt8(Bounds::unbounded())),
    FlagSpec::new(Flag::SkipLeadIn, "--skip-leadin", ValueKind::Switch),
    FlagSpec::new(Flag::SkipSize, "--skip-size", COUNT),
    FlagSpec::new(Flag::Speed, "--speed", COUNT),
    FlagSpec::new(Flag::StopLba, "--stop-lba", ANY_I32),
    FlagSpec::new(Flag::Unsupported, "--unsupported", ValueKind::Switch),
    FlagSpec::new(Flag::Verbose, "--verbose", ValueKind::Switch),
];

/// Every subcommand accepts the same set.
static COMMAND_FLAGS: &[Flag] = &[
    Flag::AudioSilenceThreshold,
    Flag::CdiCorrectOffset,
    Flag::CdiReadyNormalize,
    Flag::Debug,
    Flag::DescrambleNew,
    Flag::Drive,
    Flag::ForceOffset,
    Flag::ForceQtoc,
    Flag::ForceSplit,
    Flag::ForceToc,
    Flag::Iso9660Trim,
    Flag::ImageName,
    Flag::ImagePath,
    Flag::LeaveUnchanged,
    Flag::Overwrite,
    Flag::RefineSubchannel,
    Flag::Retries,
    Flag::RingSize,
    Flag::Skip,
    Flag::SkipFill,
    Flag::SkipLeadIn,
    Flag::SkipSize,
    Flag::Speed,
    Flag::StopLba,
    Flag::Unsupported,
    Flag::Verbose,
];

/// Every subcommand accepts the same flag set; `--help` stands alone.
pub static GRAMMAR: Grammar<Flag, Command> = Grammar {
    flags: FLAGS,
    commands: &[
        CommandSpec {
            id: Command::Cd,
            token: "cd",
            flags: COMMAND_FLAGS,
        },
        CommandSpec {
            id: Command::Dump,
            token: "dump",
            flags: COMMAND_FLAGS,
        },
        CommandSpec {
            id: Command::Info,
            token: "info",
            flags: COMMAND_FLAGS,
        },
        CommandSpec {
            id: Command::Protection,
            token: "protection",
            flags: COMMAND_FLAGS,
        },
        CommandSpec {
            id: Command::Refine,
            token: "refine",
            flags: COMMAND_FLAGS,
        },
        CommandSpec {
            id: Command::Split,
            token: "split",
            flags: COMMAND_FLAGS,
        },
    ],
    bare_flags: &[Flag::Help],
};

/// The Redumper profile.
pub static PROFILE: ToolProfile<Flag, Command> = ToolProfile {
    program: Program::Redumper,
    grammar: &GRAMMAR,
    dumping_commands: &[Command::Cd, Command::Dump],
    input_flag: Flag::Drive,
    speed_flag: Flag::Speed,
    defaults: default_parameters,
    output_path,
    default_extension,
    log_files,
    deletable_files,
    missing_outputs,
    enrich,
};

const LOG_EXTENSIONS: [&str; 8] = [
    "log",
    "toc",
    "fulltoc",
    "cdtext",
    "subcode",
    "state",
    "physical",
    "manufacturer",
];

const DELETABLE_EXTENSIONS: [&str; 2] = ["scram", "scrap"];

fn set(params: &mut RedumperParameters, flag: Flag, value: Value) {
    if let Err(e) = params.set_value(flag, value) {
        log::warn!("Skipping default for {:?}: {}", flag, e);
    }
}

fn default_parameters(context: &DumpContext<'_>, options: &Options) -> RedumperParameters {
    let mut params = Parameters::new(&GRAMMAR);

    match context.media_type {
        Some(MediaType::CdRom | MediaType::Dvd | MediaType::GdRom) => {
            params.set_subcommand(Some(Command::Cd));
        }
        other => {
            log::debug!("Redumper has no default invocation for {:?}", other);
            return params;
        }
    }

    if !context.drive.name.trim().is_empty() {
        set(&mut params, Flag::Drive, Value::Text(context.drive.name.clone()));
    }

    let speed = context
        .drive_speed
        .or_else(|| options.preferred_speed(context.media_type));
    if let Some(speed) = speed {
        set(&mut params, Flag::Speed, Value::Int32(speed.max(0)));
    }

    set(
        &mut params,
        Flag::Retries,
        Value::Int32(options.redumper_reread_count.max(0)),
    );

    let (directory, stem) = split_output_path(context.filename);
    if let Some(directory) = directory {
        set(
            &mut params,
            Flag::ImagePath,
            Value::Text(directory.display().to_string()),
        );
    }
    if let Some(stem) = stem {
        set(&mut params, Flag::ImageName, Value::Text(stem));
    }

    if options.redumper_enable_debug {
        params.set_flag(Flag::Debug, true);
    }
    if options.redumper_enable_verbose {
        params.set_flag(Flag::Verbose, true);
    }

    params
}

fn output_path(params: &RedumperParameters) -> Option<PathBuf> {
    match (params.text(Flag::ImagePath), params.text(Flag::ImageName)) {
        (None, None) => None,
        (directory, name) => {
            Some(Path::new(directory.unwrap_or_default()).join(name.unwrap_or_default()))
        }
    }
}

fn default_extension(media_type: Option<MediaType>) -> Option<&'static str> {
    match media_type? {
        MediaType::CdRom | MediaType::GdRom => Some(".bin"),
        MediaType::Dvd | MediaType::HdDvd | MediaType::BluRay => Some(".iso"),
        _ => None,
    }
}

fn existing_with(base_path: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    extensions
        .iter()
        .map(|extension| with_suffix(base_path, extension))
        .filter(|path| path.exists())
        .collect()
}

fn log_files(base_path: &Path) -> Vec<PathBuf> {
    existing_with(base_path, &LOG_EXTENSIONS)
}

fn deletable_files(base_path: &Path) -> Vec<PathBuf> {
    existing_with(base_path, &DELETABLE_EXTENSIONS)
}

fn missing_outputs(media_type: Option<MediaType>, base_path: &Path) -> Vec<PathBuf> {
    let required: &[&str] = match media_type {
        Some(MediaType::CdRom | MediaType::GdRom) => &["log", "cue", "toc", "subcode"],
        Some(MediaType::Dvd | MediaType::HdDvd | MediaType::BluRay) => &["log", "iso"],
        _ => &["log"],
    };
    required
        .iter()
        .map(|extension| with_suffix(base_path, extension))
        .filter(|path| !path.exists())
        .collect()
}

fn apply_executable_info(info: &mut SubmissionInfo, executable: ExecutableInfo) {
    let disc = &mut info.common_disc_info;
    if let Some(serial) = executable.serial {
        disc.comments_special_fields
            .insert(SiteCode::InternalSerialName, serial);
    }
    if disc.region.is_none() {
        disc.region = executable.region;
    }
    disc.exe_date_build_date = executable.date;
}

/// Each step stands alone; a failing inspector call is logged and skipped.
fn enrich(params: &RedumperParameters, info: &mut SubmissionInfo, context: &EnrichContext<'_>) {
    info.dumping_info.dumping_program = Some(Program::Redumper.to_string());
    info.dumping_info.parameters = params.generate_string();
    if info.common_disc_info.system.is_none() {
        info.common_disc_info.system = params.system;
    }
    if info.common_disc_info.media.is_none() {
        info.common_disc_info.media = params.media_type;
    }

    match (params.system, context.drive) {
        (Some(system), Some(drive)) => {
            let inspector = context.inspector;
            let with_executable = matches!(
                system,
                RedumpSystem::SonyPlayStation
                    | RedumpSystem::SonyPlayStation2
                    | RedumpSystem::KonamiPython2
            );
            if with_executable {
                match inspector.playstation_executable_info(drive) {
                    Ok(executable) => apply_executable_info(info, executable),
                    Err(e) => log::warn!("Could not read the boot executable: {}", e),
                }
            }

            let version = match system {
                RedumpSystem::SonyPlayStation2 | RedumpSystem::KonamiPython2 => {
                    Some(inspector.playstation2_version(drive))
                }
                RedumpSystem::SonyPlayStation4 => Some(inspector.playstation4_version(drive)),
                RedumpSystem::SonyPlayStation5 => Some(inspector.playstation5_version(drive)),
                _ => None,
            };
            match version {
                Some(Ok(version)) => info.version_and_editions.version = Some(version),
                Some(Err(e)) => log::warn!("Could not read the disc version: {}", e),
                None => {}
            }
        }
        (Some(system), None) => {
            log::debug!("No drive to inspect for {}", system);
        }
        (None, _) => {}
    }

    if context.include_artifacts {
        for path in log_files(context.base_path) {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            match fs::read(&path) {
                Ok(bytes) => {
                    info.artifacts
                        .insert(name, String::from_utf8_lossy(&bytes).into_owned());
                }
                Err(e) => log::warn!("Could not read artifact '{}': {}", path.display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Drive, Region};
    use crate::system::inspector::{DiscInspector, InspectError};
    use tempfile::tempdir;

    fn context<'a>(drive: &'a Drive, media_type: MediaType, filename: &'a str) -> DumpContext<'a> {
        DumpContext {
            system: Some(RedumpSystem::SonyPlayStation),
            media_type: Some(media_type),
            drive,
            filename,
            drive_speed: None,
        }
    }

    fn round_trips(params: &RedumperParameters) -> bool {
        let rendered = params.generate_string().unwrap();
        let reparsed = Parameters::try_parse(&GRAMMAR, &rendered).unwrap();
        params.same_invocation(&reparsed)
    }

    // --- Grammar ---

    #[test]
    fn test_every_subcommand_shares_the_flag_set() {
        for command in GRAMMAR.commands {
            assert_eq!(command.flags.len(), 26);
            assert!(!command.flags.contains(&Flag::Help));
        }
        assert_eq!(GRAMMAR.accepted(None), &[Flag::Help]);
    }

    #[test]
    fn test_help_only_without_subcommand() {
        let params = Parameters::parse(&GRAMMAR, "-h");
        assert_eq!(params.flag(Flag::Help), Some(true));
        assert_eq!(params.generate_string().as_deref(), Some("--help"));

        assert!(Parameters::try_parse(&GRAMMAR, "cd --help").is_err());
        assert!(Parameters::try_parse(&GRAMMAR, "--drive=E:").is_err());
    }

    #[test]
    fn test_parse_real_invocation() {
        // --- Setup ---
        let line = r#"dump --drive=E: --speed 8 --retries=100 --image-path="ISO\My Game" --image-name=game --skip-fill 85 --force-offset -6 --skip 1000-2000 --verbose"#;

        // --- Execute ---
        let params = Parameters::try_parse(&GRAMMAR, line).unwrap();

        // --- Assert ---
        assert_eq!(params.subcommand(), Some(Command::Dump));
        assert_eq!(params.text(Flag::Drive), Some("E:"));
        assert_eq!(params.int32(Flag::Speed), Some(8));
        assert_eq!(params.int32(Flag::Retries), Some(100));
        assert_eq!(params.text(Flag::ImagePath), Some(r"ISO\My Game"));
        assert_eq!(params.uint8(Flag::SkipFill), Some(85));
        assert_eq!(params.int32(Flag::ForceOffset), Some(-6));
        assert_eq!(params.text(Flag::Skip), Some("1000-2000"));
        assert_eq!(params.flag(Flag::Verbose), Some(true));
        assert_eq!(params.flag(Flag::Overwrite), None);
        assert!(round_trips(&params));
    }

    #[test]
    fn test_negative_counts_are_rejected() {
        assert!(Parameters::try_parse(&GRAMMAR, "cd --retries=-1").is_err());
        assert!(Parameters::try_parse(&GRAMMAR, "cd --skip-fill 256").is_err());
        assert!(Parameters::try_parse(&GRAMMAR, "cd --stop-lba=-150").is_ok());
    }

    #[test]
    fn test_wrapped_suffixed_count_is_rejected() {
        use crate::core::parameters::ParseError;

        // 3000000k overflows an i32 into a negative speed.
        assert_eq!(
            Parameters::try_parse(&GRAMMAR, "cd --speed 3000000k").err(),
            Some(ParseError::MissingValue("--speed"))
        );
        let params = Parameters::try_parse(&GRAMMAR, "cd --speed 8k --retries=2w").unwrap();
        assert_eq!(params.int32(Flag::Speed), Some(8 * 1024));
        assert_eq!(params.int32(Flag::Retries), Some(4));
        assert!(round_trips(&params));
    }

    #[test]
    fn test_awkward_text_values_round_trip() {
        for line in [
            "cd --skip 1000=2000",
            "cd --image-name foo=bar --image-path=out",
            "dump --drive=E: --image-name \"a = b\"",
            "cd --image-name=a\u{a0}b --verbose",
        ] {
            let params = Parameters::try_parse(&GRAMMAR, line)
                .unwrap_or_else(|e| panic!("'{}' should parse: {}", line, e));
            assert!(round_trips(&params), "'{}' did not round trip", line);
        }

        let params = Parameters::try_parse(&GRAMMAR, "cd --skip 1000=2000").unwrap();
        assert_eq!(params.generate_string().as_deref(), Some("cd --skip 1000=2000"));
        assert!(Parameters::try_parse(&GRAMMAR, "cd --image-name a\"b").is_err());
    }

    // --- Defaults ---

    #[test]
    fn test_cd_defaults() {
        // --- Setup ---
        let drive = Drive::new("E:");
        let options = Options {
            redumper_enable_debug: true,
            ..Options::default()
        };

        // --- Execute ---
        let params = PROFILE.build_defaults(
            &context(&drive, MediaType::CdRom, "ISO/game/game.bin"),
            &options,
        );

        // --- Assert ---
        assert_eq!(params.system, Some(RedumpSystem::SonyPlayStation));
        assert_eq!(
            params.generate(),
            Some(vec![
                "cd".to_string(),
                "--debug".to_string(),
                "--drive=E:".to_string(),
                "--image-name=game".to_string(),
                "--image-path=ISO/game".to_string(),
                "--retries=20".to_string(),
                "--speed=24".to_string(),
            ])
        );
        assert!(PROFILE.is_dumping_command(&params));
        assert!(round_trips(&params));
    }

    #[test]
    fn test_dvd_and_gd_defaults_use_cd_subcommand() {
        let drive = Drive::new("/dev/sr0");
        let options = Options::default();

        let dvd = PROFILE.build_defaults(&context(&drive, MediaType::Dvd, "out/disc.iso"), &options);
        assert_eq!(dvd.subcommand(), Some(Command::Cd));
        assert_eq!(dvd.int32(Flag::Speed), Some(16));
        assert!(round_trips(&dvd));

        let gd = PROFILE.build_defaults(&context(&drive, MediaType::GdRom, "disc.bin"), &options);
        assert_eq!(gd.subcommand(), Some(Command::Cd));
        assert_eq!(gd.text(Flag::ImagePath), None);
        assert_eq!(gd.text(Flag::ImageName), Some("disc"));
    }

    #[test]
    fn test_explicit_drive_speed_wins() {
        let drive = Drive::new("E:");
        let mut ctx = context(&drive, MediaType::CdRom, "game.bin");
        ctx.drive_speed = Some(4);
        let params = PROFILE.build_defaults(&ctx, &Options::default());
        assert_eq!(params.int32(Flag::Speed), Some(4));
    }

    #[test]
    fn test_unsupported_media_has_no_valid_default() {
        let drive = Drive::new("E:");
        let params = PROFILE.build_defaults(
            &context(&drive, MediaType::BluRay, "game.iso"),
            &Options::default(),
        );
        assert_eq!(params.subcommand(), None);
        assert!(!params.is_valid());
    }

    #[test]
    fn test_output_path_with_spaces_round_trips() {
        let drive = Drive::new("E:");
        let params = PROFILE.build_defaults(
            &context(&drive, MediaType::CdRom, "My Dumps/Some Game/Some Game.bin"),
            &Options::default(),
        );
        assert_eq!(params.text(Flag::ImagePath), Some("My Dumps/Some Game"));
        assert_eq!(
            output_path(&params),
            Some(PathBuf::from("My Dumps/Some Game/Some Game"))
        );
        assert!(round_trips(&params));
    }

    // --- Profile data ---

    #[test]
    fn test_default_extension() {
        assert_eq!(default_extension(Some(MediaType::CdRom)), Some(".bin"));
        assert_eq!(default_extension(Some(MediaType::GdRom)), Some(".bin"));
        assert_eq!(default_extension(Some(MediaType::Dvd)), Some(".iso"));
        assert_eq!(default_extension(Some(MediaType::BluRay)), Some(".iso"));
        assert_eq!(default_extension(Some(MediaType::FloppyDisk)), None);
        assert_eq!(default_extension(None), None);
    }

    #[test]
    fn test_dumping_commands() {
        let dump = Parameters::parse(&GRAMMAR, "dump --drive=E:");
        let info = Parameters::parse(&GRAMMAR, "info --drive=E:");
        let bare = Parameters::parse(&GRAMMAR, "--help");
        assert!(PROFILE.is_dumping_command(&dump));
        assert!(!PROFILE.is_dumping_command(&info));
        assert!(!PROFILE.is_dumping_command(&bare));
    }

    #[test]
    fn test_output_file_lists() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let base = dir.path().join("game");
        for extension in ["log", "toc", "scram", "cue"] {
            fs::write(with_suffix(&base, extension), extension).unwrap();
        }

        // --- Execute & Assert ---
        assert_eq!(
            log_files(&base),
            vec![with_suffix(&base, "log"), with_suffix(&base, "toc")]
        );
        assert_eq!(deletable_files(&base), vec![with_suffix(&base, "scram")]);
        assert_eq!(
            missing_outputs(Some(MediaType::CdRom), &base),
            vec![with_suffix(&base, "subcode")]
        );
        assert_eq!(
            missing_outputs(Some(MediaType::Dvd), &base),
            vec![with_suffix(&base, "iso")]
        );
    }

    // --- Enrichment ---

    /// Executable info fails, versions succeed.
    struct PartialInspector;

    impl DiscInspector for PartialInspector {
        fn playstation_executable_info(&self, drive: &Drive) -> Result<ExecutableInfo, InspectError> {
            Err(InspectError::NoMountPoint(drive.name.clone()))
        }
        fn playstation2_version(&self, _drive: &Drive) -> Result<String, InspectError> {
            Ok("1.01".to_string())
        }
        fn playstation4_version(&self, _drive: &Drive) -> Result<String, InspectError> {
            Ok("01.00".to_string())
        }
        fn playstation5_version(&self, _drive: &Drive) -> Result<String, InspectError> {
            Ok("01.000.000".to_string())
        }
    }

    struct FullInspector;

    impl DiscInspector for FullInspector {
        fn playstation_executable_info(&self, _drive: &Drive) -> Result<ExecutableInfo, InspectError> {
            Ok(ExecutableInfo {
                serial: Some("SLUS-00711".to_string()),
                region: Some(Region::Usa),
                date: Some("1998-08-13".to_string()),
            })
        }
        fn playstation2_version(&self, _drive: &Drive) -> Result<String, InspectError> {
            Ok("1.00".to_string())
        }
        fn playstation4_version(&self, _drive: &Drive) -> Result<String, InspectError> {
            Ok("01.00".to_string())
        }
        fn playstation5_version(&self, _drive: &Drive) -> Result<String, InspectError> {
            Ok("01.000.000".to_string())
        }
    }

    fn enrich_with(
        system: RedumpSystem,
        inspector: &dyn DiscInspector,
        info: &mut SubmissionInfo,
    ) {
        let drive = Drive::new("E:");
        let mut params = Parameters::parse(&GRAMMAR, "cd --drive=E:");
        params.system = Some(system);
        let base = PathBuf::from("nonexistent/game");
        let context = EnrichContext {
            base_path: &base,
            drive: Some(&drive),
            include_artifacts: false,
            inspector,
        };
        enrich(&params, info, &context);
    }

    #[test]
    fn test_enrichment_is_partial_when_one_call_fails() {
        let mut info = SubmissionInfo::default();
        enrich_with(RedumpSystem::SonyPlayStation2, &PartialInspector, &mut info);

        assert_eq!(info.version_and_editions.version.as_deref(), Some("1.01"));
        assert!(info.common_disc_info.comments_special_fields.is_empty());
        assert_eq!(info.dumping_info.dumping_program.as_deref(), Some("Redumper"));
        assert_eq!(info.dumping_info.parameters.as_deref(), Some("cd --drive=E:"));
    }

    #[test]
    fn test_playstation_keeps_existing_region() {
        let mut info = SubmissionInfo::default();
        info.common_disc_info.region = Some(Region::Japan);
        enrich_with(RedumpSystem::SonyPlayStation, &FullInspector, &mut info);

        let disc = &info.common_disc_info;
        assert_eq!(
            disc.comments_special_fields.get(&SiteCode::InternalSerialName).map(String::as_str),
            Some("SLUS-00711")
        );
        assert_eq!(disc.region, Some(Region::Japan));
        assert_eq!(disc.exe_date_build_date.as_deref(), Some("1998-08-13"));
        // PlayStation discs carry no version.
        assert_eq!(info.version_and_editions.version, None);
    }

    #[test]
    fn test_python2_and_newer_consoles() {
        let mut info = SubmissionInfo::default();
        enrich_with(RedumpSystem::KonamiPython2, &FullInspector, &mut info);
        assert_eq!(info.common_disc_info.region, Some(Region::Usa));
        assert_eq!(info.version_and_editions.version.as_deref(), Some("1.00"));

        let mut info = SubmissionInfo::default();
        enrich_with(RedumpSystem::SonyPlayStation5, &FullInspector, &mut info);
        assert_eq!(info.version_and_editions.version.as_deref(), Some("01.000.000"));
        assert!(info.common_disc_info.comments_special_fields.is_empty());
    }

    #[test]
    fn test_artifacts_are_collected_on_request() {
        // --- Setup ---
        let dir = tempdir().unwrap();
        let base = dir.path().join("game");
        fs::write(with_suffix(&base, "log"), "redumper log").unwrap();
        let params = Parameters::parse(&GRAMMAR, "cd --drive=E:");
        let context = EnrichContext {
            base_path: &base,
            drive: None,
            include_artifacts: true,
            inspector: &FullInspector,
        };

        // --- Execute ---
        let mut info = SubmissionInfo::default();
        enrich(&params, &mut info, &context);

        // --- Assert ---
        assert_eq!(
            info.artifacts.get("game.log").map(String::as_str),
            Some("redumper log")
        );
    }
}
