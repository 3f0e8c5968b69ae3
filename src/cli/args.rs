// src/cli/args.rs

use crate::models::{MediaType, Program, RedumpSystem};
use clap::{Args, Parser};
use std::path::PathBuf;

/// What the invocation is for. Shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// The dumping program. Defaults to `InternalProgram` from the settings.
    #[arg(long, short)]
    pub program: Option<Program>,

    /// The system the disc belongs to.
    #[arg(long, short)]
    pub system: Option<RedumpSystem>,

    /// The physical media type in the drive.
    #[arg(long, short)]
    pub media: Option<MediaType>,

    /// Settings file to use instead of the one in the config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments of `generate`.
#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    name = "discrun generate",
    about = "Prints the default invocation for a dump."
)]
pub struct GenerateArgs {
    /// Program, system and media selection.
    #[command(flatten)]
    pub target: TargetArgs,

    /// The drive the disc is in (e.g. `E:` or `/dev/sr0`).
    #[arg(long, short)]
    pub drive: String,

    /// Output image file. Defaults to `<DefaultOutputPath>/track<ext>`.
    pub filename: Option<String>,

    /// Read speed. Defaults to the preferred speed for the media type.
    #[arg(long)]
    pub speed: Option<i32>,
}

/// Arguments of `parse`.
#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    name = "discrun parse",
    about = "Parses an invocation and shows what it contains."
)]
pub struct ParseArgs {
    /// Program, system and media selection.
    #[command(flatten)]
    pub target: TargetArgs,

    /// The invocation, either as one quoted string or as separate words.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub invocation: Vec<String>,
}

/// Arguments of `run`.
#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    name = "discrun run",
    about = "Runs the dumping program and prints the submission info as JSON."
)]
pub struct RunArgs {
    /// Program, system and media selection.
    #[command(flatten)]
    pub target: TargetArgs,

    /// The drive the disc is in. Required unless an invocation is given.
    #[arg(long, short)]
    pub drive: Option<String>,

    /// Where the disc filesystem is mounted, for reading serials and versions.
    #[arg(long)]
    pub mount: Option<PathBuf>,

    /// Output image file, used when no invocation is given.
    #[arg(long, short)]
    pub filename: Option<String>,

    /// Read speed, used when no invocation is given.
    #[arg(long)]
    pub speed: Option<i32>,

    /// Kill the program after this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Give the program the terminal instead of capturing its output.
    #[arg(long, conflicts_with = "redirect")]
    pub window: bool,

    /// Capture the program output even if `ToolsInSeparateWindow` is set.
    #[arg(long)]
    pub redirect: bool,

    /// An explicit invocation to run instead of the defaults.
    #[arg(last = true)]
    pub invocation: Vec<String>,
}

/// Arguments of `files`.
#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    name = "discrun files",
    about = "Lists the log, deletable and missing output files of a dump."
)]
pub struct FilesArgs {
    /// Program, system and media selection.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output path without extension (e.g. `ISO/game/game`).
    pub base_path: PathBuf,
}

/// Arguments of `support`.
#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    name = "discrun support",
    about = "Checks whether a program can dump a system and media type."
)]
pub struct SupportArgs {
    /// Program, system and media selection.
    #[command(flatten)]
    pub target: TargetArgs,
}
