//! Exit status records for reaped job members

use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::fmt;

/// How a child process finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Exited normally with the given code
    Exited(i32),
    /// Terminated by a signal
    Signaled(Signal),
}

impl ExitStatus {
    /// Exited with code 0
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    /// Shell-style status code: the exit code, or 128 + signal number
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Exited(code) => *code,
            ExitStatus::Signaled(signal) => 128 + *signal as i32,
        }
    }

    /// Terminated by `SIGINT`
    pub fn was_interrupted(&self) -> bool {
        matches!(self, ExitStatus::Signaled(Signal::SIGINT))
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exited with code {}", code),
            ExitStatus::Signaled(signal) => write!(f, "terminated by {}", signal),
        }
    }
}

/// Exit status of one pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStatus {
    pub index: usize,
    pub pid: Pid,
    pub status: ExitStatus,
}

/// Outcome of a job once every member has been waited on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub pgid: Pid,
    pub stages: Vec<StageStatus>,
}

impl JobReport {
    /// Status of the last stage, which is the status of the job
    pub fn last_status(&self) -> ExitStatus {
        self.stages
            .last()
            .map(|stage| stage.status)
            .unwrap_or(ExitStatus::Exited(0))
    }

    /// Whether the job as a whole succeeded
    pub fn success(&self) -> bool {
        self.last_status().success()
    }
}
