//! Terminal foreground ownership
//!
//! The controlling terminal's foreground process group is the one piece of
//! state shared between the interpreter and its jobs. [`Foreground::hand_to`]
//! gives it to a job and returns a guard; the guard hands it back to the
//! interpreter's group when restored explicitly or when dropped, so every
//! exit path ends with the interpreter in the foreground.

use super::{Job, JobReport, ProcessGroupHandle};
use crate::error::{Error, Result};
use crate::platform::{Platform, TerminalOps};
use crate::signals::SignalManager;
use nix::unistd::{getpgrp, Pid};
use std::fmt;
use std::io::IsTerminal;
use std::sync::Arc;

/// Foreground handoff policy for jobs started by the interpreter
#[derive(Clone)]
pub struct Foreground {
    terminal: Option<Arc<dyn TerminalOps>>,
    shell_pgid: Pid,
}

impl Foreground {
    /// No terminal handoff; jobs still receive forwarded interrupts
    pub fn detached() -> Self {
        Self {
            terminal: None,
            shell_pgid: getpgrp(),
        }
    }

    /// Hand the given terminal to each job
    pub fn with_terminal(terminal: Arc<dyn TerminalOps>) -> Self {
        Self {
            terminal: Some(terminal),
            shell_pgid: getpgrp(),
        }
    }

    /// Use the controlling terminal when standard input is attached to one
    pub fn detect() -> Result<Self> {
        if !std::io::stdin().is_terminal() {
            debug!("Standard input is not a terminal; foreground handoff disabled");
            return Ok(Self::detached());
        }

        match Platform::controlling_terminal()? {
            Some(terminal) => Ok(Self::attach(terminal)),
            None => Ok(Self::detached()),
        }
    }

    /// Hand `terminal` to jobs only if the interpreter is its foreground group
    ///
    /// An interpreter started in the background must not take the terminal
    /// from whoever owns it.
    pub fn attach(terminal: Arc<dyn TerminalOps>) -> Self {
        let shell_pgid = getpgrp();
        match terminal.foreground_group() {
            Ok(owner) if owner == shell_pgid => Self::with_terminal(terminal),
            Ok(owner) => {
                warn!(
                    "Terminal belongs to process group {}, not {}; foreground handoff disabled",
                    owner, shell_pgid
                );
                Self::detached()
            }
            Err(e) => {
                warn!("Cannot query terminal foreground group: {}", e);
                Self::detached()
            }
        }
    }

    /// Process group of the interpreter
    pub fn shell_group(&self) -> Pid {
        self.shell_pgid
    }

    /// Whether jobs are given the terminal
    pub fn has_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Make `group` the foreground job until the returned guard is released
    pub fn hand_to(&self, group: ProcessGroupHandle) -> Result<ForegroundGuard<'_>> {
        let pgid = group.pgid();
        SignalManager::set_foreground_job(pgid);

        if let Some(terminal) = &self.terminal {
            if let Err(e) = terminal.set_foreground_group(pgid) {
                SignalManager::clear_foreground_job();
                return Err(Error::TerminalHandoffFailed {
                    pgid: pgid.as_raw(),
                    reason: e.to_string(),
                });
            }
            debug!("Terminal handed to process group {}", pgid);
        }

        Ok(ForegroundGuard {
            foreground: self,
            active: true,
        })
    }

    /// Hand the terminal to `job`, reap every member, then take it back
    ///
    /// The terminal is restored even when waiting fails. If the handoff
    /// itself fails the job is terminated and reaped before returning.
    pub fn run_job(&self, job: Job) -> Result<JobReport> {
        let guard = match self.hand_to(job.group()) {
            Ok(guard) => guard,
            Err(e) => {
                job.terminate();
                let _ = job.wait();
                return Err(e);
            }
        };

        let waited = job.wait();
        let restored = guard.restore();
        let report = waited?;
        restored?;
        Ok(report)
    }

    fn reclaim(&self) -> Result<()> {
        SignalManager::clear_foreground_job();

        if let Some(terminal) = &self.terminal {
            terminal
                .set_foreground_group(self.shell_pgid)
                .map_err(|e| Error::TerminalRestoreFailed {
                    pgid: self.shell_pgid.as_raw(),
                    reason: e.to_string(),
                })?;
            debug!("Terminal returned to interpreter group {}", self.shell_pgid);
        }
        Ok(())
    }
}

impl fmt::Debug for Foreground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Foreground")
            .field("has_terminal", &self.has_terminal())
            .field("shell_pgid", &self.shell_pgid)
            .finish()
    }
}

/// Returns the terminal to the interpreter when restored or dropped
#[must_use = "dropping the guard immediately gives the terminal back"]
pub struct ForegroundGuard<'a> {
    foreground: &'a Foreground,
    active: bool,
}

impl ForegroundGuard<'_> {
    /// Give the terminal back to the interpreter and report failure
    pub fn restore(mut self) -> Result<()> {
        self.active = false;
        self.foreground.reclaim()
    }
}

impl Drop for ForegroundGuard<'_> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        // Drop cannot propagate; a lost terminal must still be visible
        if let Err(e) = self.foreground.reclaim() {
            error!("{}", e);
            eprintln!("{}: {}", crate::SHELL_NAME, e);
        }
    }
}
