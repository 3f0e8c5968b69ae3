// src/cli/handlers/support.rs

use crate::{
    CancellationToken,
    cli::{args::SupportArgs, handlers::commons},
    core::support,
    profiles::Profile,
};
use anyhow::{Result, bail};
use clap::Parser;
use colored::*;

/// The main handler for the `support` command.
/// Fails when the selection cannot be dumped, so scripts can rely on the exit code.
pub fn handle(args: Vec<String>, _cancellation_token: &CancellationToken) -> Result<()> {
    let args = SupportArgs::try_parse_from(&args)?;
    let options = commons::load_options(&args.target)?;
    let program = commons::resolve_program(&args.target, &options);

    let status = support::support_status(args.target.system, args.target.media);
    if !status.supported {
        bail!("{}", status.message);
    }
    if !support::program_supports_media(program, args.target.media) {
        bail!("{} does not support dumping this media type.", program);
    }

    println!("{} {}", "✔".green(), status.message);
    if Profile::for_program(program).is_none() {
        println!(
            "{}",
            format!("{} has no parameter profile; invocations must be written by hand.", program)
                .dimmed()
        );
    }
    Ok(())
}
