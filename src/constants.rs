// src/constants.rs

use std::time::Duration;

/// Name of the application directory under the system config directory.
pub const APP_DIR: &str = "discrun";

/// The settings file inside the application directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// How often `ProcessRunner::wait` checks whether the tool has exited.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between kill attempts while terminating.
pub const KILL_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Kill signals sent by one `terminate` call before it gives up.
pub const KILL_ATTEMPTS: u32 = 100;

/// How long reader threads may keep draining after the tool exited.
pub const READER_DRAIN_GRACE: Duration = Duration::from_secs(2);
