// src/cli/handlers/generate.rs

use crate::{
    CancellationToken,
    cli::{args::GenerateArgs, handlers::commons},
    core::{support, values::is_valid_drive_letter},
    models::Drive,
    profiles::DumpContext,
};
use anyhow::Result;
use clap::Parser;
use colored::*;

/// The main handler for the `generate` command.
/// Prints the default invocation for the selected program, system and media.
pub fn handle(args: Vec<String>, _cancellation_token: &CancellationToken) -> Result<()> {
    let args = GenerateArgs::try_parse_from(&args)?;
    let options = commons::load_options(&args.target)?;
    let program = commons::resolve_program(&args.target, &options);
    let profile = commons::resolve_profile(program)?;

    if cfg!(windows) && !is_valid_drive_letter(&args.drive) {
        log::warn!("'{}' does not look like a drive letter", args.drive);
    }

    let status = support::support_status(args.target.system, args.target.media);
    if !status.supported {
        eprintln!("{} {}", "Warning:".yellow().bold(), status.message);
    } else if !support::program_supports_media(program, args.target.media) {
        eprintln!(
            "{} {} does not dump this media type.",
            "Warning:".yellow().bold(),
            program
        );
    }

    let filename = commons::output_filename(args.filename.as_deref(), profile, &args.target, &options);
    let drive = Drive::new(args.drive.as_str());
    let context = DumpContext {
        system: args.target.system,
        media_type: args.target.media,
        drive: &drive,
        filename: &filename,
        drive_speed: args.speed,
    };

    let invocation = commons::default_invocation(profile, &args.target, &options, &context)?;
    let line = invocation.try_generate()?.join(" ");
    log::debug!("Generated invocation for {}: {}", program, line);

    match invocation.executable_path() {
        Some(executable) => println!("{} {}", executable.display().to_string().dimmed(), line),
        None => println!("{}", line),
    }
    Ok(())
}
