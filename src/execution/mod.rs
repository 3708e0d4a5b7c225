//! Job execution: single commands and pipelines
//!
//! This module turns tokenized command vectors into running child processes.
//! Each job gets its own process group; the group owns the controlling
//! terminal while it runs and the terminal is handed back to the interpreter
//! once every member has been reaped.
//!
//! - [`ProcessLauncher`] - fork/exec of one command, with preflight checks
//! - [`PipelineExecutor`] - N stages chained with pipes, one process group
//! - [`Foreground`] - terminal foreground handoff with guaranteed restore
//! - [`Job`] - a running process group and its member processes

mod job;
mod launcher;
mod pipeline;
mod preflight;
mod status;
mod stdio;
mod terminal;

pub use job::Job;
pub use launcher::{ProcessLauncher, EXIT_CANNOT_EXECUTE, EXIT_NOT_FOUND};
pub use pipeline::PipelineExecutor;
pub use preflight::preflight;
pub use status::{ExitStatus, JobReport, StageStatus};
pub use stdio::{pipe_cloexec, StdioBindings};
pub use terminal::{Foreground, ForegroundGuard};

use crate::error::{Error, Result};
use nix::unistd::Pid;
use std::fmt;

/// Argument vector for one external program; element 0 is the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandVector {
    args: Vec<String>,
}

impl CommandVector {
    /// Build a command vector, rejecting an empty argument list
    pub fn new<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Err(Error::EmptyCommand);
        }
        Ok(Self { args })
    }

    /// Program name or path
    pub fn program(&self) -> &str {
        &self.args[0]
    }

    /// Full argument vector, program included
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether the program is given as a path rather than a bare name
    pub fn has_path_separator(&self) -> bool {
        self.program().contains('/')
    }
}

impl fmt::Display for CommandVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// One command of a pipeline together with its 0-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStage {
    pub index: usize,
    pub command: CommandVector,
}

impl PipelineStage {
    /// Number a sequence of commands as pipeline stages
    pub fn from_commands(commands: Vec<CommandVector>) -> Vec<PipelineStage> {
        commands
            .into_iter()
            .enumerate()
            .map(|(index, command)| PipelineStage { index, command })
            .collect()
    }
}

/// Process group chosen for a job; always the pid of its first process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessGroupHandle {
    pgid: Pid,
}

impl ProcessGroupHandle {
    /// Group led by `pid`
    pub fn led_by(pid: Pid) -> Self {
        Self { pgid: pid }
    }

    /// Group identifier
    pub fn pgid(&self) -> Pid {
        self.pgid
    }
}
