//! In-memory command runner for testing collectors without an Illumos host.
//!
//! `MockRunner` answers commands from canned output keyed by the full
//! command line, so tests run on any platform and in CI.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use crate::error::SourceError;
use crate::source::traits::{CommandRunner, command_line};

#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Failure { status: i32, stderr: String },
}

/// Command runner backed by canned output.
///
/// Unknown commands fail the way a missing binary does. Every call is
/// recorded, in order, so tests can check what a collector ran.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, Response>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Creates a runner that knows no commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `command` (program and arguments, space-separated) print `output`.
    pub fn add_output(&mut self, command: &str, output: impl Into<String>) {
        self.responses
            .insert(command.to_string(), Response::Output(output.into()));
    }

    /// Makes `command` exit with `status`.
    pub fn add_failure(&mut self, command: &str, status: i32, stderr: &str) {
        self.responses.insert(
            command.to_string(),
            Response::Failure {
                status,
                stderr: stderr.to_string(),
            },
        );
    }

    /// Forgets a command, so running it fails as if it were not installed.
    pub fn remove(&mut self, command: &str) {
        self.responses.remove(command);
    }

    /// Command lines run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, SourceError> {
        let command = command_line(program, args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }

        match self.responses.get(&command) {
            Some(Response::Output(output)) => Ok(output.clone()),
            Some(Response::Failure { status, stderr }) => Err(SourceError::Failed {
                command,
                status: *status,
                stderr: stderr.clone(),
            }),
            None => Err(SourceError::Spawn {
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no canned output for {command}"),
                ),
                command,
            }),
        }
    }
}
