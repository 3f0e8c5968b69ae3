// src/system/executor.rs

//! Runs an external tool and owns its process handle.
//!
//! The handle is a small state machine (`Unstarted -> Running -> Exited`)
//! behind a mutex so that [`ProcessRunner::terminate`] can be called from any
//! thread, including while another thread is blocked in
//! [`ProcessRunner::wait`].

use crate::constants::{KILL_ATTEMPTS, KILL_RETRY_INTERVAL, POLL_INTERVAL, READER_DRAIN_GRACE};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use thiserror::Error;

/// Failures around starting and waiting for a tool.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The invocation has no executable attached.
    #[error("No executable is configured for {0}.")]
    NoExecutable(String),
    /// The process or one of its reader threads could not be started.
    #[error("Program '{0}' could not be started: {1}")]
    LaunchFailed(String, #[source] std::io::Error),
    /// `launch` while the tool is still running.
    #[error("Program '{0}' is already running.")]
    AlreadyRunning(String),
    /// `wait` before `launch`.
    #[error("Program '{0}' has not been started.")]
    NotStarted(String),
    /// The exit status could not be queried.
    #[error("Failed to wait for program '{0}': {1}")]
    WaitFailed(String, #[source] std::io::Error),
}

/// Receives every line the tool writes while its output is redirected.
pub type StatusSink = Arc<dyn Fn(&str) + Send + Sync>;

/// The sink used when the caller does not provide one.
pub fn log_sink() -> StatusSink {
    Arc::new(|line: &str| log::info!("{}", line))
}

/// Observable lifecycle of a [`ProcessRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Never launched.
    Unstarted,
    /// Launched and not yet seen exiting.
    Running,
    /// Reaped, either by `wait` or by `terminate`.
    Exited,
}

enum Handle {
    Unstarted,
    Running(Child),
    /// `None` when the child was reaped but its status could not be read.
    Exited(Option<ExitStatus>),
}

/// A reader thread draining one redirected stream. The thread owns the only
/// sender of `done`, so the channel disconnects when the thread finishes.
struct Reader {
    stream: &'static str,
    thread: JoinHandle<()>,
    done: Receiver<()>,
}

/// One external tool run. Shareable across threads behind an `Arc`.
pub struct ProcessRunner {
    executable: PathBuf,
    arguments: String,
    sink: StatusSink,
    handle: Mutex<Handle>,
    readers: Mutex<Vec<Reader>>,
}

impl std::fmt::Debug for ProcessRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRunner")
            .field("executable", &self.executable)
            .field("arguments", &self.arguments)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ProcessRunner {
    /// `arguments` is a generated invocation string, not yet split.
    pub fn new(executable: impl Into<PathBuf>, arguments: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            arguments: arguments.into(),
            sink: log_sink(),
            handle: Mutex::new(Handle::Unstarted),
            readers: Mutex::new(Vec::new()),
        }
    }

    /// Sends redirected output lines to `sink` instead of the log.
    pub fn with_sink(mut self, sink: StatusSink) -> Self {
        self.sink = sink;
        self
    }

    /// The program being run.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The invocation string it is run with.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessState {
        match *self.lock_handle() {
            Handle::Unstarted => ProcessState::Unstarted,
            Handle::Running(_) => ProcessState::Running,
            Handle::Exited(_) => ProcessState::Exited,
        }
    }

    /// Starts the tool.
    ///
    /// A visible tool keeps the terminal (its own console on Windows). Otherwise
    /// stdout and stderr are piped and two reader threads forward their lines
    /// to the status sink; they start before this returns so the child never
    /// blocks on a full pipe.
    pub fn launch(&self, visible: bool) -> Result<(), ExecutionError> {
        let mut handle = self.lock_handle();
        if matches!(*handle, Handle::Running(_)) {
            return Err(ExecutionError::AlreadyRunning(self.label()));
        }

        let mut command = self.command();
        if visible {
            detach_console(&mut command);
        } else {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }

        log::debug!("Launching {} {}", self.label(), self.arguments);
        let child = command
            .spawn()
            .map_err(|e| ExecutionError::LaunchFailed(self.label(), e))?;

        // Kill the child again if the readers cannot be set up.
        let mut child = scopeguard::guard(child, |mut child| {
            let _ = child.kill();
            let _ = child.wait();
        });

        // Installed only once every reader is up; a half-built set is dropped
        // and its threads end when the killed child's pipes close.
        let mut readers = Vec::with_capacity(2);
        if !visible {
            if let Some(stdout) = child.stdout.take() {
                readers.push(self.spawn_reader("stdout", stdout)?);
            }
            if let Some(stderr) = child.stderr.take() {
                readers.push(self.spawn_reader("stderr", stderr)?);
            }
        }

        *self.lock_readers() = readers;
        *handle = Handle::Running(scopeguard::ScopeGuard::into_inner(child));
        Ok(())
    }

    /// Blocks until the tool exits, then releases the handle.
    ///
    /// The lock is only held for each status poll, so [`Self::terminate`] can
    /// get in between. Once the child is gone the reader threads get a short
    /// grace period to flush trailing output; a reader still blocked after
    /// that (a grandchild holding the pipe open) is abandoned and its thread
    /// exits on its own when the pipe finally closes.
    pub fn wait(&self) -> Result<Option<ExitStatus>, ExecutionError> {
        let status = loop {
            match self.poll()? {
                Some(status) => break status,
                None => thread::sleep(POLL_INTERVAL),
            }
        };
        self.drain_readers();
        log::debug!("{} exited with {:?}", self.label(), status);
        Ok(status)
    }

    /// `launch` followed by `wait`.
    pub fn run(&self, visible: bool) -> Result<Option<ExitStatus>, ExecutionError> {
        self.launch(visible)?;
        self.wait()
    }

    /// Kills the tool and keeps killing it until its exit is observed, for at
    /// most `KILL_ATTEMPTS` signals.
    ///
    /// Does nothing if the tool was never started or has already exited. A
    /// tool that outlives every attempt is logged and stays `Running`, so a
    /// later `wait` or `terminate` can still reap it. Errors are logged and
    /// never returned.
    pub fn terminate(&self) {
        let mut handle = self.lock_handle();
        let Handle::Running(child) = &mut *handle else {
            return;
        };

        let label = self.label();
        let outcome = kill_until_exited(&label, KILL_ATTEMPTS, child, Child::try_wait, Child::kill);
        match outcome {
            KillOutcome::Exited(status) => {
                log::debug!("Terminated {}", label);
                *handle = Handle::Exited(status);
            }
            KillOutcome::GaveUp => {
                log::warn!("{} is still running after {} kill attempts.", label, KILL_ATTEMPTS);
            }
        }
    }

    /// One status check. `Some` once the child has exited.
    fn poll(&self) -> Result<Option<Option<ExitStatus>>, ExecutionError> {
        let mut handle = self.lock_handle();
        let exited = match &mut *handle {
            Handle::Unstarted => return Err(ExecutionError::NotStarted(self.label())),
            Handle::Exited(status) => return Ok(Some(*status)),
            Handle::Running(child) => child
                .try_wait()
                .map_err(|e| ExecutionError::WaitFailed(self.label(), e))?,
        };

        Ok(exited.map(|status| {
            *handle = Handle::Exited(Some(status));
            Some(status)
        }))
    }

    fn drain_readers(&self) {
        let readers = std::mem::take(&mut *self.lock_readers());
        let deadline = Instant::now() + READER_DRAIN_GRACE;

        for reader in readers {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match reader.done.recv_timeout(remaining) {
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "The {} reader of {} is still open after the process exited; leaving it behind.",
                        reader.stream,
                        self.label()
                    );
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    if reader.thread.join().is_err() {
                        log::warn!("The {} reader of {} panicked.", reader.stream, self.label());
                    }
                }
            }
        }
    }

    fn spawn_reader<R>(&self, stream: &'static str, source: R) -> Result<Reader, ExecutionError>
    where
        R: Read + Send + 'static,
    {
        let (tx, done) = mpsc::channel::<()>();
        let sink = Arc::clone(&self.sink);
        let thread = thread::Builder::new()
            .name(format!("discrun-{}", stream))
            .spawn(move || {
                forward_lines(source, sink.as_ref());
                drop(tx);
            })
            .map_err(|e| ExecutionError::LaunchFailed(self.label(), e))?;

        Ok(Reader {
            stream,
            thread,
            done,
        })
    }

    fn command(&self) -> Command {
        let mut command = Command::new(dunce::simplified(&self.executable));
        pass_arguments(&mut command, &self.arguments);
        command
    }

    fn label(&self) -> String {
        self.executable.display().to_string()
    }

    fn lock_handle(&self) -> MutexGuard<'_, Handle> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_readers(&self) -> MutexGuard<'_, Vec<Reader>> {
        self.readers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KillOutcome {
    /// `None` when the exit could not be queried after a kill.
    Exited(Option<ExitStatus>),
    GaveUp,
}

fn kill_until_exited<T>(
    label: &str,
    attempts: u32,
    target: &mut T,
    try_wait: fn(&mut T) -> io::Result<Option<ExitStatus>>,
    kill: fn(&mut T) -> io::Result<()>,
) -> KillOutcome {
    for attempt in 0..=attempts {
        match try_wait(target) {
            Ok(Some(status)) => return KillOutcome::Exited(Some(status)),
            Ok(None) if attempt == attempts => break,
            Ok(None) => {
                if let Err(e) = kill(target) {
                    log::debug!("Kill signal to {} failed: {}", label, e);
                }
                thread::sleep(KILL_RETRY_INTERVAL);
            }
            Err(e) => {
                log::debug!("Could not query {} after kill: {}", label, e);
                return KillOutcome::Exited(None);
            }
        }
    }
    KillOutcome::GaveUp
}

/// Forwards each line of `source` to the sink until end of stream.
fn forward_lines(source: impl Read, sink: &(dyn Fn(&str) + Send + Sync)) {
    let mut reader = BufReader::new(source);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                sink(line.trim_end_matches(['\r', '\n']));
            }
            Err(e) => {
                log::debug!("Stopped reading tool output: {}", e);
                break;
            }
        }
    }
}

/// Windows gets the invocation string verbatim, exactly as generated.
#[cfg(windows)]
fn pass_arguments(command: &mut Command, arguments: &str) {
    use std::os::windows::process::CommandExt;
    command.raw_arg(arguments);
}

/// Elsewhere the string is split like the parser splits it, and the quotes
/// that only group whitespace are dropped.
#[cfg(not(windows))]
fn pass_arguments(command: &mut Command, arguments: &str) {
    use crate::core::tokenizer::tokenize;
    command.args(tokenize(arguments).iter().map(|token| token.replace('"', "")));
}

#[cfg(windows)]
fn detach_console(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
    command.creation_flags(CREATE_NEW_CONSOLE);
}

/// Without a window system of our own the tool simply shares the terminal.
#[cfg(not(windows))]
fn detach_console(_command: &mut Command) {}
