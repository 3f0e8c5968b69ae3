// src/cli/handlers/mod.rs

// One module per CLI command.

/// Helpers shared by the handlers.
pub mod commons;
/// `files`: lists the output files of a dump.
pub mod files;
/// `generate`: builds a default invocation.
pub mod generate;
/// `parse`: validates and explains an invocation.
pub mod parse;
/// `run`: runs the tool and collects submission info.
pub mod run;
/// `support`: checks whether a system and media type can be dumped.
pub mod support;
