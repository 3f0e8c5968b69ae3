//! Models, parses, generates and runs disc-imaging tool invocations.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
/// Raised to ask long-running work to stop.
pub type CancellationToken = Arc<AtomicBool>;

/// Command-line front end.
pub mod cli;
/// Shared constants.
pub mod constants;
/// The parameter engine.
pub mod core;
/// Data types shared across the crate.
pub mod models;
pub mod profiles;
pub mod system;
