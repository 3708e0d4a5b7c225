//! Running jobs: one process group and its member processes

use super::{ExitStatus, JobReport, ProcessGroupHandle, StageStatus};
use crate::error::{Error, Result};
use crate::platform::Platform;
use crate::signals::SignalManager;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;

/// A started job
///
/// Members are kept in stage order. A job is complete only once every member
/// has been waited on, so [`Job::wait`] keeps reaping after a failure.
#[derive(Debug)]
#[must_use = "a job must be waited on to reap its processes"]
pub struct Job {
    group: ProcessGroupHandle,
    members: Vec<Pid>,
}

impl Job {
    pub(crate) fn new(group: ProcessGroupHandle, first: Pid) -> Self {
        Self {
            group,
            members: vec![first],
        }
    }

    pub(crate) fn push(&mut self, pid: Pid) {
        self.members.push(pid);
    }

    /// Process group shared by every member
    pub fn group(&self) -> ProcessGroupHandle {
        self.group
    }

    /// Member process ids in stage order
    pub fn members(&self) -> &[Pid] {
        &self.members
    }

    /// Ask every member to terminate
    pub fn terminate(&self) {
        if let Err(e) = Platform::signals().terminate_group(self.group.pgid()) {
            debug!("Could not terminate process group {}: {}", self.group.pgid(), e);
        }
    }

    /// Wait for every member and collect their exit statuses
    pub fn wait(self) -> Result<JobReport> {
        let mut stages = Vec::with_capacity(self.members.len());
        let mut first_error = None;

        for (index, pid) in self.members.iter().copied().enumerate() {
            match wait_for(pid) {
                Ok(status) => {
                    debug!("Stage {} (pid {}) {}", index, pid, status);
                    stages.push(StageStatus { index, pid, status });
                }
                Err(e) => {
                    warn!("Stage {} (pid {}): {}", index, pid, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        SignalManager::release_foreground_job(self.group.pgid());

        match first_error {
            Some(e) => Err(e),
            None => Ok(JobReport {
                pgid: self.group.pgid(),
                stages,
            }),
        }
    }
}

/// Block until `pid` exits, retrying when a signal interrupts the wait
fn wait_for(pid: Pid) -> Result<ExitStatus> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitStatus::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(ExitStatus::Signaled(signal)),
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(e) => {
                return Err(Error::WaitFailed {
                    pid: pid.as_raw(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
