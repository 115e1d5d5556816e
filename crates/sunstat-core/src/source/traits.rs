//! Abstractions over where raw stats come from, to enable testing and mocking.
//!
//! The `CommandRunner` trait lets collectors run the real administrative
//! commands on an Illumos host or read canned output in tests. `KstatSource`
//! hands out one kstat session per poll.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::SourceError;
use crate::source::kstat::KstatSession;

/// Abstraction for running a command and capturing its standard output.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and returns its standard output.
    ///
    /// # Returns
    /// The output as a string, or a [`SourceError`] if the command cannot be
    /// started, exits non-zero, or prints something that is not UTF-8.
    fn run(&self, program: &str, args: &[&str]) -> Result<String, SourceError>;

    /// Runs a command through `pfexec(1)`, for tools that need extra privileges.
    fn run_privileged(&self, program: &str, args: &[&str]) -> Result<String, SourceError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(program);
        full.extend_from_slice(args);
        self.run("/bin/pfexec", &full)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, SourceError> {
        (**self).run(program, args)
    }
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealRunner;

impl RealRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, SourceError> {
        let command = command_line(program, args);
        debug!(%command, "running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| SourceError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::Failed {
                command,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| SourceError::Encoding { command })
    }
}

/// Joins a program and its arguments the way a shell would show them.
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Hands out kstat sessions. A session lives for one poll and is closed when
/// dropped.
pub trait KstatSource: Send + Sync {
    fn open(&self) -> Result<KstatSession, SourceError>;
}

/// Reads kstats from `kstat -p` output.
#[derive(Debug, Clone)]
pub struct CommandKstat<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> CommandKstat<R> {
    pub const PROGRAM: &'static str = "/usr/bin/kstat";

    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> KstatSource for CommandKstat<R> {
    fn open(&self) -> Result<KstatSession, SourceError> {
        let text = self.runner.run(Self::PROGRAM, &["-p"])?;
        Ok(KstatSession::from_text(&text))
    }
}

/// Reads kstats from a file holding saved `kstat -p` output.
#[derive(Debug, Clone)]
pub struct FileKstat {
    path: PathBuf,
}

impl FileKstat {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KstatSource for FileKstat {
    fn open(&self) -> Result<KstatSession, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(KstatSession::from_text(&text))
    }
}
