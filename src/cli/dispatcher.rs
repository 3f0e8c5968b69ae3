// src/cli/dispatcher.rs

use anyhow::{Result, anyhow};

use crate::{CancellationToken, cli::handlers};

/// A command, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    about: &'static str,
    handler: fn(Vec<String>, &CancellationToken) -> Result<()>,
}

/// Every command the binary understands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "generate",
        aliases: &["gen"],
        about: "Print the default invocation for a dump",
        handler: handlers::generate::handle,
    },
    CommandDefinition {
        name: "parse",
        aliases: &[],
        about: "Parse an invocation and show its flags",
        handler: handlers::parse::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &["dump"],
        about: "Run the dumping program and print submission info",
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "files",
        aliases: &["ls"],
        about: "List log, deletable and missing output files",
        handler: handlers::files::handle,
    },
    CommandDefinition {
        name: "support",
        aliases: &[],
        about: "Check program, system and media support",
        handler: handlers::support::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Name, aliases and one-line description of every command, for the help text.
pub fn command_summaries() -> impl Iterator<Item = (&'static str, &'static [&'static str], &'static str)> {
    COMMAND_REGISTRY
        .iter()
        .map(|cmd| (cmd.name, cmd.aliases, cmd.about))
}

/// Routes `discrun <command> [args...]` to the command's handler.
pub fn dispatch(all_args: Vec<String>, cancellation_token: &CancellationToken) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        println!("Nothing to do. Run 'discrun --help' for the list of commands.");
        return Ok(());
    };

    let command = find_command(&name).ok_or_else(|| {
        let known: Vec<_> = COMMAND_REGISTRY.iter().map(|cmd| cmd.name).collect();
        anyhow!("Unknown command '{}'. Expected one of: {}.", name, known.join(", "))
    })?;

    (command.handler)(args.collect(), cancellation_token)
}
