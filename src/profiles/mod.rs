// src/profiles/mod.rs

//! Tool profiles and the registry that maps a [`Program`] to one.
//!
//! A profile is plain data: a static grammar plus a handful of function
//! pointers. The generic [`Parameters`] engine does all parsing and
//! generation; the registry only has to pick the right flag and subcommand
//! types, which [`Profile`] and [`Invocation`] do with one variant per
//! supported program.

pub mod redumper;

use crate::{
    core::{
        flags::{Grammar, Ident},
        options::Options,
        parameters::{GenerateError, ParseError, Parameters},
    },
    models::{Drive, MediaType, Program, RedumpSystem, SubmissionInfo},
    system::{
        executor::{ExecutionError, ProcessRunner},
        inspector::DiscInspector,
    },
};
use std::path::{Path, PathBuf};

/// Inputs for building a default invocation.
#[derive(Debug, Clone, Copy)]
pub struct DumpContext<'a> {
    /// The system being dumped.
    pub system: Option<RedumpSystem>,
    /// The media in the drive; picks the subcommand and the speed.
    pub media_type: Option<MediaType>,
    /// The drive to read from.
    pub drive: &'a Drive,
    /// Output file as chosen by the user, e.g. `ISO/game/game.bin`.
    pub filename: &'a str,
    /// Overrides the preferred speed from the options when set.
    pub drive_speed: Option<i32>,
}

/// Inputs for enriching a submission-info record after a dump.
#[derive(Clone, Copy)]
pub struct EnrichContext<'a> {
    /// Output path without extension, e.g. `ISO/game/game`.
    pub base_path: &'a Path,
    /// The drive, for reading serials and versions off the disc.
    pub drive: Option<&'a Drive>,
    /// Whether log files are copied into the record.
    pub include_artifacts: bool,
    /// Reads the disc filesystem.
    pub inspector: &'a dyn DiscInspector,
}

impl std::fmt::Debug for EnrichContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichContext")
            .field("base_path", &self.base_path)
            .field("drive", &self.drive)
            .field("include_artifacts", &self.include_artifacts)
            .finish_non_exhaustive()
    }
}

/// Everything the engine knows about one external program.
#[derive(Debug)]
pub struct ToolProfile<F: Ident, C: Ident> {
    /// The program this profile describes.
    pub program: Program,
    /// Its flag grammar.
    pub grammar: &'static Grammar<F, C>,
    /// Subcommands that actually read a disc.
    pub dumping_commands: &'static [C],
    /// The flag naming the drive.
    pub input_flag: F,
    /// The flag holding the read speed.
    pub speed_flag: F,
    /// Builds the default invocation; context fields are filled in afterwards.
    pub defaults: fn(&DumpContext<'_>, &Options) -> Parameters<F, C>,
    /// Output path without extension, from the invocation's flags.
    pub output_path: fn(&Parameters<F, C>) -> Option<PathBuf>,
    /// Extension of the main image for a media type.
    pub default_extension: fn(Option<MediaType>) -> Option<&'static str>,
    /// Existing log files for a base path.
    pub log_files: fn(&Path) -> Vec<PathBuf>,
    /// Existing intermediate files that may be removed after a dump.
    pub deletable_files: fn(&Path) -> Vec<PathBuf>,
    /// Required outputs that are not there.
    pub missing_outputs: fn(Option<MediaType>, &Path) -> Vec<PathBuf>,
    /// Fills a submission-info record after a dump.
    pub enrich: fn(&Parameters<F, C>, &mut SubmissionInfo, &EnrichContext<'_>),
}

impl<F: Ident, C: Ident> ToolProfile<F, C> {
    /// Default invocation for a dump, tagged with its target context.
    pub fn build_defaults(&self, context: &DumpContext<'_>, options: &Options) -> Parameters<F, C> {
        let mut params = (self.defaults)(context, options);
        params.system = context.system;
        params.media_type = context.media_type;
        params
    }

    /// Whether the invocation's subcommand reads a disc.
    pub fn is_dumping_command(&self, params: &Parameters<F, C>) -> bool {
        params
            .subcommand()
            .is_some_and(|command| self.dumping_commands.contains(&command))
    }
}

/// A registered profile, one variant per program that has one.
#[derive(Debug, Clone, Copy)]
pub enum Profile {
    /// Redumper.
    Redumper(&'static ToolProfile<redumper::Flag, redumper::Command>),
}

/// A parsed or generated invocation of a registered program.
#[derive(Debug, Clone)]
pub enum Invocation {
    /// A Redumper invocation.
    Redumper(redumper::RedumperParameters),
}

macro_rules! with_profile {
    ($profile:expr, $p:ident => $body:expr) => {
        match $profile {
            Profile::Redumper($p) => $body,
        }
    };
}

macro_rules! with_invocation {
    ($invocation:expr, $params:ident, $p:ident => $body:expr) => {
        match $invocation {
            Invocation::Redumper($params) => {
                let $p = &redumper::PROFILE;
                $body
            }
        }
    };
}

impl Profile {
    /// `None` for programs that are recognized but have no profile.
    pub fn for_program(program: Program) -> Option<Self> {
        match program {
            Program::Redumper => Some(Self::Redumper(&redumper::PROFILE)),
            _ => None,
        }
    }

    /// The program the profile belongs to.
    pub fn program(self) -> Program {
        with_profile!(self, p => p.program)
    }

    /// The default invocation for a dump.
    pub fn defaults(self, context: &DumpContext<'_>, options: &Options) -> Invocation {
        with_profile!(self, p => Invocation::Redumper(p.build_defaults(context, options)))
    }

    /// Parses a previous invocation, falling back to an empty one.
    pub fn parse(self, input: &str) -> Invocation {
        with_profile!(self, p => Invocation::Redumper(Parameters::parse(p.grammar, input)))
    }

    /// Parses a previous invocation.
    pub fn try_parse(self, input: &str) -> Result<Invocation, ParseError> {
        with_profile!(self, p => Parameters::try_parse(p.grammar, input).map(Invocation::Redumper))
    }

    /// Extension of the main image file, with the leading dot.
    pub fn default_extension(self, media_type: Option<MediaType>) -> Option<&'static str> {
        with_profile!(self, p => (p.default_extension)(media_type))
    }

    /// Existing log files for a base path.
    pub fn log_files(self, base_path: &Path) -> Vec<PathBuf> {
        with_profile!(self, p => (p.log_files)(base_path))
    }

    /// Existing intermediate files for a base path.
    pub fn deletable_files(self, base_path: &Path) -> Vec<PathBuf> {
        with_profile!(self, p => (p.deletable_files)(base_path))
    }

    /// Required outputs missing for a base path.
    pub fn missing_outputs(self, media_type: Option<MediaType>, base_path: &Path) -> Vec<PathBuf> {
        with_profile!(self, p => (p.missing_outputs)(media_type, base_path))
    }
}

/// One flag of an invocation, rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagEntry {
    /// Long spelling.
    pub flag: &'static str,
    /// The presence bit.
    pub state: bool,
    /// The value, unquoted.
    pub value: Option<String>,
}

impl Invocation {
    /// The profile the invocation was built with.
    pub fn profile(&self) -> Profile {
        with_invocation!(self, _params, p => Profile::Redumper(p))
    }

    /// The program to run.
    pub fn program(&self) -> Program {
        self.profile().program()
    }

    /// See [`Parameters::try_generate`].
    pub fn try_generate(&self) -> Result<Vec<String>, GenerateError> {
        with_invocation!(self, params, _p => params.try_generate())
    }

    /// See [`Parameters::generate_string`].
    pub fn generate_string(&self) -> Option<String> {
        with_invocation!(self, params, _p => params.generate_string())
    }

    /// See [`Parameters::is_valid`].
    pub fn is_valid(&self) -> bool {
        with_invocation!(self, params, _p => params.is_valid())
    }

    /// Whether the subcommand reads a disc.
    pub fn is_dumping_command(&self) -> bool {
        with_invocation!(self, params, p => p.is_dumping_command(params))
    }

    /// The drive the tool reads from.
    pub fn input_path(&self) -> Option<&str> {
        with_invocation!(self, params, p => params.text(p.input_flag))
    }

    /// Where the image goes, without extension.
    pub fn output_path(&self) -> Option<PathBuf> {
        with_invocation!(self, params, p => (p.output_path)(params))
    }

    /// The read speed.
    pub fn speed(&self) -> Option<i32> {
        with_invocation!(self, params, p => params.int32(p.speed_flag))
    }

    /// The target system, if known.
    pub fn system(&self) -> Option<RedumpSystem> {
        with_invocation!(self, params, _p => params.system)
    }

    /// The target media type, if known.
    pub fn media_type(&self) -> Option<MediaType> {
        with_invocation!(self, params, _p => params.media_type)
    }

    /// Sets the target context, which parsed invocations do not carry.
    pub fn set_context(&mut self, system: Option<RedumpSystem>, media_type: Option<MediaType>) {
        with_invocation!(self, params, _p => {
            params.system = system;
            params.media_type = media_type;
        });
    }

    /// The tool executable, once attached.
    pub fn executable_path(&self) -> Option<&Path> {
        with_invocation!(self, params, _p => params.executable_path.as_deref())
    }

    /// Attaches the tool executable.
    pub fn set_executable_path(&mut self, path: Option<PathBuf>) {
        with_invocation!(self, params, _p => params.executable_path = path);
    }

    /// Subcommand token, if any.
    pub fn subcommand(&self) -> Option<&'static str> {
        with_invocation!(self, params, _p => params
            .subcommand()
            .and_then(|command| params.grammar().command(command))
            .map(|spec| spec.token))
    }

    /// Set flags in generation order.
    pub fn entries(&self) -> Vec<FlagEntry> {
        with_invocation!(self, params, _p => params
            .entries()
            .map(|(spec, state, value)| FlagEntry {
                flag: spec.long,
                state,
                value: value.map(|v| match v.as_text() {
                    Some(text) => text.to_string(),
                    None => v.as_i64().map(|n| n.to_string()).unwrap_or_default(),
                }),
            })
            .collect())
    }

    /// Writes everything the tool's output reveals into `info`.
    pub fn enrich(&self, info: &mut SubmissionInfo, context: &EnrichContext<'_>) {
        with_invocation!(self, params, p => (p.enrich)(params, info, context));
    }

    /// A runner for this invocation. An invalid invocation runs without
    /// arguments; callers are expected to check [`Self::is_valid`] first.
    pub fn runner(&self) -> Result<ProcessRunner, ExecutionError> {
        let executable = self
            .executable_path()
            .ok_or_else(|| ExecutionError::NoExecutable(self.program().to_string()))?;
        Ok(ProcessRunner::new(
            executable,
            self.generate_string().unwrap_or_default(),
        ))
    }
}
