// src/cli/handlers/commons.rs

// Shared functions used by multiple handlers.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::path::PathBuf;

use crate::{
    cli::args::TargetArgs,
    core::{options::Options, tokenizer::quote_if_needed},
    models::Program,
    profiles::{DumpContext, Invocation, Profile},
};

/// Loads the settings named on the command line, or the default settings file.
pub fn load_options(target: &TargetArgs) -> Result<Options> {
    match &target.config {
        Some(path) => Options::load(path)
            .with_context(|| format!("Failed to load settings from '{}'", path.display())),
        None => Options::load_default().context("Failed to load the default settings"),
    }
}

/// The program to use: the one on the command line, else the configured one.
pub fn resolve_program(target: &TargetArgs, options: &Options) -> Program {
    target.program.unwrap_or(options.internal_program)
}

/// The parameter profile for a program, or an error naming the program.
pub fn resolve_profile(program: Program) -> Result<Profile> {
    Profile::for_program(program)
        .ok_or_else(|| anyhow!("{} has no parameter profile; it can only be verified.", program))
}

/// Joins separately passed words back into one invocation string.
/// A single word is taken as-is, so `"cd --drive=E:"` and `cd --drive=E:` agree.
pub fn join_invocation(words: &[String]) -> String {
    match words {
        [single] => single.clone(),
        words => words
            .iter()
            .map(|word| quote_if_needed(word))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// The output filename: the given one, or `track<ext>` in the default output directory.
pub fn output_filename(filename: Option<&str>, profile: Profile, target: &TargetArgs, options: &Options) -> String {
    if let Some(filename) = filename {
        return filename.to_string();
    }
    let extension = profile.default_extension(target.media).unwrap_or_default();
    PathBuf::from(&options.default_output_path)
        .join(format!("track{}", extension))
        .display()
        .to_string()
}

/// Default invocation for the target, with the configured tool path attached.
pub fn default_invocation(
    profile: Profile,
    target: &TargetArgs,
    options: &Options,
    context: &DumpContext<'_>,
) -> Result<Invocation> {
    let mut invocation = profile.defaults(context, options);
    if !invocation.is_valid() {
        let reason = invocation
            .try_generate()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        let media = target
            .media
            .map_or_else(|| "no media type".to_string(), |m| m.to_string());
        return Err(anyhow!(
            "{} has no default invocation for {}: {}",
            profile.program(),
            media,
            reason
        ));
    }
    attach_executable(&mut invocation, options)?;
    Ok(invocation)
}

/// Resolves the configured executable path for the invocation's program.
pub fn attach_executable(invocation: &mut Invocation, options: &Options) -> Result<()> {
    let program = invocation.program();
    let path = options
        .tool_path(program)
        .ok_or_else(|| anyhow!("No executable path is configured for {}.", program))?
        .with_context(|| format!("Invalid executable path for {}", program))?;
    if !path.exists() {
        log::warn!("{} executable not found at '{}'", program, path.display());
    }
    invocation.set_executable_path(Some(path));
    Ok(())
}

/// Prints a labelled list of paths, or a dimmed placeholder when empty.
pub fn print_paths(label: &str, paths: &[PathBuf]) {
    println!("  {}:", label.blue());
    if paths.is_empty() {
        println!("    {}", "(none)".dimmed());
    }
    for path in paths {
        println!("    - {}", path.display());
    }
}
