// src/cli/handlers/run.rs

use crate::{
    CancellationToken,
    cli::{args::RunArgs, handlers::commons},
    constants::POLL_INTERVAL,
    core::options::Options,
    models::{Drive, SubmissionInfo},
    profiles::{DumpContext, EnrichContext, Invocation, Profile},
    system::{
        executor::{ProcessRunner, StatusSink},
        inspector::FsDiscInspector,
    },
};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

///
/// Main entry point for the 'run' command.
/// Builds or parses the invocation, runs the tool to completion and prints
/// the submission info gathered from its output.
///
pub fn handle(args: Vec<String>, cancellation_token: &CancellationToken) -> Result<()> {
    let args = RunArgs::try_parse_from(&args)?;
    let options = commons::load_options(&args.target)?;
    let program = commons::resolve_program(&args.target, &options);
    let profile = commons::resolve_profile(program)?;

    // 1. Build the invocation: explicit words after `--`, else the defaults.
    let invocation = if args.invocation.is_empty() {
        let drive_name = args
            .drive
            .as_deref()
            .ok_or_else(|| anyhow!("A --drive is required when no invocation is given."))?;
        let drive = Drive::new(drive_name);
        let filename = commons::output_filename(args.filename.as_deref(), profile, &args.target, &options);
        let context = DumpContext {
            system: args.target.system,
            media_type: args.target.media,
            drive: &drive,
            filename: &filename,
            drive_speed: args.speed,
        };
        commons::default_invocation(profile, &args.target, &options, &context)?
    } else {
        parsed_invocation(profile, &args, &options)?
    };

    // 2. Run it.
    let visible = !args.redirect && (args.window || options.tools_in_separate_window);
    let runner = Arc::new(invocation.runner()?.with_sink(print_sink()));
    println!(
        "{} {} {}",
        "Running".green().bold(),
        runner.executable().display(),
        runner.arguments().dimmed()
    );

    let finished: CancellationToken = Arc::new(AtomicBool::new(false));
    let watchdog = match args.timeout {
        Some(seconds) => Some(spawn_watchdog(
            Arc::clone(&runner),
            Duration::from_secs(seconds),
            Arc::clone(&finished),
            Arc::clone(cancellation_token),
        )?),
        None => None,
    };

    let outcome = runner.run(visible);
    finished.store(true, Ordering::SeqCst);
    let stopped = watchdog.is_some_and(|w| w.join().unwrap_or(false));
    let status = outcome.with_context(|| format!("{} did not run to completion", program))?;

    if stopped {
        bail!("{} was stopped before it finished.", program);
    }
    match status {
        Some(status) if !status.success() => bail!("{} exited with {}.", program, status),
        None => bail!("{} exited without a status.", program),
        Some(_) => {}
    }

    // 3. Collect what the output and the disc reveal.
    let info = submission_info(&invocation, &args, options.include_artifacts)?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn parsed_invocation(profile: Profile, args: &RunArgs, options: &Options) -> Result<Invocation> {
    let line = commons::join_invocation(&args.invocation);
    let mut invocation = profile
        .try_parse(&line)
        .with_context(|| format!("'{}' is not a valid {} invocation", line, profile.program()))?;
    invocation.set_context(args.target.system, args.target.media);
    invocation
        .try_generate()
        .with_context(|| format!("'{}' cannot be run", line))?;
    commons::attach_executable(&mut invocation, options)?;
    Ok(invocation)
}

/// Prints each captured output line of the tool.
fn print_sink() -> StatusSink {
    Arc::new(|line: &str| println!("  {} {}", "|".dimmed(), line))
}

/// Terminates the runner once `timeout` elapses or `cancel` is raised,
/// unless `finished` is raised first. Joins to `true` if it terminated.
fn spawn_watchdog(
    runner: Arc<ProcessRunner>,
    timeout: Duration,
    finished: CancellationToken,
    cancel: CancellationToken,
) -> Result<JoinHandle<bool>> {
    let deadline = Instant::now() + timeout;
    thread::Builder::new()
        .name("discrun-watchdog".to_string())
        .spawn(move || {
            while !finished.load(Ordering::SeqCst) {
                if cancel.load(Ordering::SeqCst) || Instant::now() >= deadline {
                    log::warn!("Stopping {} after {:?}", runner.executable().display(), timeout);
                    runner.terminate();
                    return true;
                }
                thread::sleep(POLL_INTERVAL);
            }
            false
        })
        .context("Failed to start the timeout watchdog")
}

fn submission_info(invocation: &Invocation, args: &RunArgs, include_artifacts: bool) -> Result<SubmissionInfo> {
    let mut info = SubmissionInfo::default();
    if !invocation.is_dumping_command() {
        log::debug!("Not a dumping command; skipping enrichment");
        return Ok(info);
    }

    let drive = invocation.input_path().or(args.drive.as_deref()).map(|name| {
        let drive = Drive::new(name);
        match &args.mount {
            Some(mount) => drive.with_mount_point(mount.clone()),
            None => drive,
        }
    });
    let base_path = invocation.output_path().unwrap_or_else(PathBuf::new);

    let missing = invocation.profile().missing_outputs(invocation.media_type(), &base_path);
    for path in &missing {
        eprintln!("{} missing output '{}'", "Warning:".yellow().bold(), path.display());
    }

    let context = EnrichContext {
        base_path: &base_path,
        drive: drive.as_ref(),
        include_artifacts,
        inspector: &FsDiscInspector,
    };
    invocation.enrich(&mut info, &context);
    Ok(info)
}
