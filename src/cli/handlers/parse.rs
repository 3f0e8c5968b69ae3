// src/cli/handlers/parse.rs

use crate::{
    CancellationToken,
    cli::{args::ParseArgs, handlers::commons},
    profiles::Invocation,
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

/// The main handler for the `parse` command.
/// Parses an invocation and shows its subcommand, flags and regenerated form.
pub fn handle(args: Vec<String>, _cancellation_token: &CancellationToken) -> Result<()> {
    let args = ParseArgs::try_parse_from(&args)?;
    let options = commons::load_options(&args.target)?;
    let program = commons::resolve_program(&args.target, &options);
    let profile = commons::resolve_profile(program)?;

    let line = commons::join_invocation(&args.invocation);
    let mut invocation = profile
        .try_parse(&line)
        .with_context(|| format!("'{}' is not a valid {} invocation", line, program))?;
    invocation.set_context(args.target.system, args.target.media);

    print_invocation(&invocation);
    Ok(())
}

fn print_invocation(invocation: &Invocation) {
    println!("\n--- {} {} ---", invocation.program().to_string().yellow(), "invocation".bold());
    println!(
        "  {:<12} {}",
        "Subcommand".blue(),
        invocation.subcommand().unwrap_or("(none)")
    );
    println!("  {:<12} {}", "Dumping".blue(), invocation.is_dumping_command());
    if let Some(input) = invocation.input_path() {
        println!("  {:<12} {}", "Drive".blue(), input);
    }
    if let Some(output) = invocation.output_path() {
        println!("  {:<12} {}", "Output".blue(), output.display());
    }
    if let Some(speed) = invocation.speed() {
        println!("  {:<12} {}", "Speed".blue(), speed);
    }

    let entries = invocation.entries();
    if !entries.is_empty() {
        println!("\n  {}:", "Flags".blue());
        for entry in entries {
            match (entry.state, entry.value) {
                (true, Some(value)) => println!("    - {} = {}", entry.flag.cyan(), value),
                (true, None) => println!("    - {}", entry.flag.cyan()),
                (false, _) => println!("    - {} {}", entry.flag.cyan(), "(off)".dimmed()),
            }
        }
    }

    match invocation.generate_string() {
        Some(line) => println!("\n  {:<12} {}", "Regenerated".blue(), line),
        None => println!("\n  {}", "Cannot be regenerated.".red()),
    }
}
