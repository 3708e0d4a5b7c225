//! Pipelines: N stages joined by pipes, running as one process group

use super::launcher::{fork_exec, ChildImage};
use super::stdio::{pipe_cloexec, StdioBindings};
use super::{ExitStatus, Foreground, Job, JobReport, PipelineStage, ProcessGroupHandle, ProcessLauncher};
use crate::error::{Error, Result};
use crate::signals::SignalManager;
use std::fs::File;
use std::io::Read;
use nix::unistd::Pid;
use std::os::fd::{AsFd, AsRawFd, OwnedFd, RawFd};

/// Runs a pipeline as a single foreground job
///
/// Stage `i`'s standard output feeds stage `i + 1`'s standard input. The
/// first stage leads the job's process group and every later stage joins it,
/// so one terminal handoff covers the whole pipeline.
pub struct PipelineExecutor {
    launcher: ProcessLauncher,
}

impl PipelineExecutor {
    pub fn new(foreground: Foreground) -> Self {
        Self {
            launcher: ProcessLauncher::new(foreground),
        }
    }

    /// Launcher used to prepare and fork each stage
    pub fn launcher(&self) -> &ProcessLauncher {
        &self.launcher
    }

    /// Run `stages` with the pipeline's ends bound to the interpreter's streams
    ///
    /// Returns the exit status of the last stage.
    pub fn run(&self, stages: &[PipelineStage]) -> Result<ExitStatus> {
        self.run_with(stages, StdioBindings::inherit())
    }

    /// Run `stages`, binding the first stage's input and the last stage's
    /// output per `stdio`
    pub fn run_with(&self, stages: &[PipelineStage], stdio: StdioBindings<'_>) -> Result<ExitStatus> {
        SignalManager::install_base_dispositions()?;
        let job = self.spawn(stages, stdio)?;
        let report = self.launcher.foreground().run_job(job)?;
        Ok(report.last_status())
    }

    /// Run `stages` in the foreground and collect the last stage's output
    ///
    /// The output pipe is drained before the job is waited on, so a stage
    /// writing more than a pipe buffer cannot block the interpreter.
    pub fn capture(&self, stages: &[PipelineStage], stdio: StdioBindings<'_>) -> Result<(JobReport, Vec<u8>)> {
        SignalManager::install_base_dispositions()?;
        let (read, write) = pipe_cloexec()?;
        let job = self.spawn(stages, stdio.stdout(write.as_fd()))?;
        drop(write);

        let guard = match self.launcher.foreground().hand_to(job.group()) {
            Ok(guard) => guard,
            Err(e) => {
                job.terminate();
                let _ = job.wait();
                return Err(e);
            }
        };

        let mut output = Vec::new();
        let drained = File::from(read).read_to_end(&mut output);
        let waited = job.wait();
        let restored = guard.restore();

        let report = waited?;
        drained?;
        restored?;
        Ok((report, output))
    }

    /// Start every stage without waiting
    ///
    /// All stages are preflighted before the first fork, so a bad program
    /// anywhere in the pipeline starts nothing. If a later fork or pipe fails
    /// the stages already running are terminated and reaped.
    pub fn spawn(&self, stages: &[PipelineStage], stdio: StdioBindings<'_>) -> Result<Job> {
        self.spawn_using(stages, stdio, fork_exec)
    }

    fn spawn_using<F>(&self, stages: &[PipelineStage], stdio: StdioBindings<'_>, mut fork: F) -> Result<Job>
    where
        F: FnMut(&ChildImage, Option<ProcessGroupHandle>, &StdioBindings<'_>, &[RawFd]) -> Result<Pid>,
    {
        if stages.is_empty() {
            return Err(Error::EmptyPipelineStage);
        }

        let images = stages
            .iter()
            .map(|stage| self.launcher.prepare(&stage.command))
            .collect::<Result<Vec<_>>>()?;

        let mut job: Option<Job> = None;
        match spawn_stages(&images, stdio, &mut job, &mut fork) {
            Ok(()) => job.ok_or(Error::EmptyPipelineStage),
            Err(e) => {
                if let Some(job) = job {
                    warn!("Aborting partially started pipeline: {}", e);
                    job.terminate();
                    let _ = job.wait();
                }
                Err(e)
            }
        }
    }
}

fn spawn_stages<F>(
    images: &[ChildImage],
    stdio: StdioBindings<'_>,
    job: &mut Option<Job>,
    fork: &mut F,
) -> Result<()>
where
    F: FnMut(&ChildImage, Option<ProcessGroupHandle>, &StdioBindings<'_>, &[RawFd]) -> Result<Pid>,
{
    let last = images.len() - 1;
    let mut upstream: Option<OwnedFd> = None;

    for (i, image) in images.iter().enumerate() {
        let next = if i < last { Some(pipe_cloexec()?) } else { None };

        let mut bindings = StdioBindings::inherit();
        bindings.stderr = stdio.stderr;
        bindings.stdin = match &upstream {
            Some(read) => Some(read.as_fd()),
            None => stdio.stdin,
        };
        bindings.stdout = match &next {
            Some((_, write)) => Some(write.as_fd()),
            None => stdio.stdout,
        };

        // The child must not hold the read end meant for the next stage
        let close_in_child: Vec<_> = next.iter().map(|(read, _)| read.as_raw_fd()).collect();

        let group = job.as_ref().map(Job::group);
        let pid = fork(image, group, &bindings, &close_in_child)?;
        match job {
            Some(started) => started.push(pid),
            None => {
                // The group exists once stage 0 is forked; interrupts reach it from here
                SignalManager::set_foreground_job(pid);
                *job = Some(Job::new(ProcessGroupHandle::led_by(pid), pid));
            }
        }

        // Our copies of this stage's ends close here; only the next read end survives
        upstream = next.map(|(read, _write)| read);
    }

    Ok(())
}
