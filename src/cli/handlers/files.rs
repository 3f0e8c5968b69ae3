// src/cli/handlers/files.rs

use crate::{
    CancellationToken,
    cli::{args::FilesArgs, handlers::commons},
};
use anyhow::Result;
use clap::Parser;
use colored::*;

/// The main handler for the `files` command.
pub fn handle(args: Vec<String>, _cancellation_token: &CancellationToken) -> Result<()> {
    let args = FilesArgs::try_parse_from(&args)?;
    let options = commons::load_options(&args.target)?;
    let program = commons::resolve_program(&args.target, &options);
    let profile = commons::resolve_profile(program)?;
    let base_path = &args.base_path;

    println!(
        "\n--- {} '{}' ---",
        format!("{} output", program).bold(),
        base_path.display().to_string().yellow()
    );
    commons::print_paths("Log files", &profile.log_files(base_path));
    commons::print_paths("Deletable files", &profile.deletable_files(base_path));

    let missing = profile.missing_outputs(args.target.media, base_path);
    commons::print_paths("Missing outputs", &missing);
    if missing.is_empty() {
        println!("\n{}", "All required outputs are present.".green());
    } else {
        println!("\n{}", format!("{} required output(s) missing.", missing.len()).red());
    }
    Ok(())
}
