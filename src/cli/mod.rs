// src/cli/mod.rs

use clap::Parser;

/// Per-command argument structs.
pub mod args;
/// The command registry.
pub mod dispatcher;
/// One handler per command.
pub mod handlers;

/// Builds the color-aware help text from the command registry.
fn build_help_string() -> &'static str {
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();
    let title = if use_colors { "\x1b[1;33m" } else { "" };
    let cmd = if use_colors { "\x1b[36m" } else { "" };
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let mut help = format!(
        "{title}discrun{reset} {{version}}\n{{about}}\n\n\
         {title}Usage:{reset} discrun <command> [args...]\n\n\
         {title}Commands:{reset}\n"
    );
    for (name, aliases, about) in dispatcher::command_summaries() {
        let aliases = if aliases.is_empty() {
            String::new()
        } else {
            format!(" {dim}({}){reset}", aliases.join(", "))
        };
        help.push_str(&format!("  {cmd}{name:<10}{reset} {about}{aliases}\n"));
    }
    help.push_str(&format!(
        "\n{dim}Run 'discrun <command> --help' for the arguments of a command.\n\
         Set RUST_LOG=debug for diagnostics.{reset}\n"
    ));

    Box::leak(help.into_boxed_str())
}

/// discrun: builds, checks and runs disc-imaging tool invocations.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Command name followed by its own arguments. Hidden from the help
    /// output; each handler parses its part with its own args struct.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
