//! Integration Tests for Pipelines
//!
//! These tests verify data flow between stages, process group membership,
//! termination when a reader exits early, and terminal handoff for the
//! pipeline as a whole.

use mysh::error::{Error, Result};
use mysh::execution::{
    pipe_cloexec, CommandVector, ExitStatus, Foreground, PipelineExecutor, PipelineStage,
    ProcessLauncher, StdioBindings,
};
use mysh::platform::TerminalOps;
use nix::unistd::{getpgid, getpgrp, Pid};
use std::fs::{self, File};
use std::io::Read;
use std::os::fd::AsFd;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingTerminal {
    calls: Mutex<Vec<Pid>>,
}

impl TerminalOps for RecordingTerminal {
    fn foreground_group(&self) -> Result<Pid> {
        Ok(self.calls.lock().unwrap().last().copied().unwrap_or_else(getpgrp))
    }

    fn set_foreground_group(&self, pgid: Pid) -> Result<()> {
        self.calls.lock().unwrap().push(pgid);
        Ok(())
    }
}

fn stages(commands: &[&[&str]]) -> Vec<PipelineStage> {
    PipelineStage::from_commands(
        commands
            .iter()
            .map(|args| CommandVector::new(args.iter().copied()).unwrap())
            .collect(),
    )
}

/// Run `commands` with stdin from `input` and return stdout and status
fn run_capturing(commands: &[&[&str]], input: Option<&File>) -> (String, ExitStatus) {
    let executor = PipelineExecutor::new(Foreground::detached());
    let (read, write) = pipe_cloexec().unwrap();

    let mut stdio = StdioBindings::inherit().stdout(write.as_fd());
    if let Some(input) = input {
        stdio = stdio.stdin(input.as_fd());
    }
    let job = executor.spawn(&stages(commands), stdio).unwrap();
    drop(write);

    // Drain before waiting so a full pipe cannot stall the last stage
    let mut out = String::new();
    File::from(read).read_to_string(&mut out).unwrap();
    let report = job.wait().unwrap();
    (out, report.last_status())
}

#[test]
fn test_identity_pipeline_preserves_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    let content: String = (0..2000).map(|i| format!("line {}\n", i)).collect();
    fs::write(&path, &content).unwrap();

    let input = File::open(&path).unwrap();
    let (out, status) = run_capturing(&[&["cat"], &["cat"], &["cat"]], Some(&input));
    assert!(status.success());
    assert_eq!(out, content);
}

#[test]
fn test_early_reader_exit_terminates_writer() {
    let started = Instant::now();
    let (out, status) = run_capturing(&[&["yes"], &["head", "-n", "1"]], None);
    assert_eq!(out, "y\n");
    assert!(status.success());
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "yes must die of SIGPIPE once head exits"
    );
}

#[test]
fn test_long_stream_reaches_last_stage() {
    let (out, status) = run_capturing(&[&["seq", "1", "100000"], &["tail", "-n", "1"]], None);
    assert!(status.success());
    assert_eq!(out, "100000\n");
}

#[test]
fn test_every_stage_shares_the_first_stage_group() {
    let executor = PipelineExecutor::new(Foreground::detached());
    let job = executor
        .spawn(
            &stages(&[&["sleep", "0.3"], &["sleep", "0.3"], &["sleep", "0.3"], &["sleep", "0.3"]]),
            StdioBindings::inherit(),
        )
        .unwrap();

    let leader = job.members()[0];
    assert_eq!(job.group().pgid(), leader);
    assert_ne!(leader, getpgrp());
    for pid in job.members() {
        assert_eq!(getpgid(Some(*pid)).unwrap(), leader);
    }

    let report = job.wait().unwrap();
    assert_eq!(report.stages.len(), 4);
    assert!(report.success());
}

#[test]
fn test_pipeline_hands_terminal_over_once() {
    let terminal = Arc::new(RecordingTerminal::default());
    let executor = PipelineExecutor::new(Foreground::with_terminal(terminal.clone()));

    let status = executor
        .run(&stages(&[&["true"], &["true"], &["true"]]))
        .unwrap();
    assert!(status.success());

    let calls = terminal.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], getpgrp());
}

#[test]
fn test_single_stage_pipeline_matches_launcher() {
    let via_pipeline = Arc::new(RecordingTerminal::default());
    let via_launcher = Arc::new(RecordingTerminal::default());

    let executor = PipelineExecutor::new(Foreground::with_terminal(via_pipeline.clone()));
    let launcher = ProcessLauncher::new(Foreground::with_terminal(via_launcher.clone()));

    let a = executor.run(&stages(&[&["sh", "-c", "exit 3"]])).unwrap();
    let b = launcher
        .run(&CommandVector::new(["sh", "-c", "exit 3"]).unwrap())
        .unwrap();
    assert_eq!(a, b);

    let pipeline_calls = via_pipeline.calls.lock().unwrap().clone();
    let launcher_calls = via_launcher.calls.lock().unwrap().clone();
    assert_eq!(pipeline_calls.len(), launcher_calls.len());
    assert_eq!(pipeline_calls.last(), launcher_calls.last());
}

#[test]
fn test_bad_middle_stage_starts_nothing() {
    let terminal = Arc::new(RecordingTerminal::default());
    let executor = PipelineExecutor::new(Foreground::with_terminal(terminal.clone()));
    let dir = tempfile::tempdir().unwrap();

    let result = executor.run(&stages(&[
        &["yes"],
        &[dir.path().to_str().unwrap()],
        &["head", "-n", "1"],
    ]));
    assert!(matches!(result, Err(Error::IsADirectory { .. })));
    assert!(terminal.calls.lock().unwrap().is_empty());
}

#[test]
fn test_status_is_last_stage() {
    let executor = PipelineExecutor::new(Foreground::detached());
    let status = executor
        .run(&stages(&[&["true"], &["sh", "-c", "exit 5"]]))
        .unwrap();
    assert_eq!(status, ExitStatus::Exited(5));
}
