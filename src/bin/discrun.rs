// src/bin/discrun.rs

//! The `discrun` command-line tool.

use anyhow::Result;
use clap::Parser;
use colored::*;
use discrun::{
    CancellationToken,
    cli::{Cli, dispatcher},
};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Sets up logging, dispatches to the command handler and reports errors.
fn main() {
    let cancellation_token: CancellationToken = Arc::new(AtomicBool::new(false));
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse(), &cancellation_token) {
        // Argument errors of a command, including its `--help`, are printed by clap.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli, cancellation_token: &CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    dispatcher::dispatch(cli.args, cancellation_token)
}
