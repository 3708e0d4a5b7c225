//! Integration Tests for Large Output Handling
//!
//! These tests verify that jobs producing far more than a pipe buffer of
//! output complete without deadlocking the interpreter.

use mysh::execution::{
    pipe_cloexec, CommandVector, Foreground, PipelineExecutor, PipelineStage, ProcessLauncher,
    StdioBindings,
};
use std::fs::File;
use std::io::Read;
use std::os::fd::AsFd;

const MEGABYTE: usize = 1024 * 1024;

fn stages(commands: &[&[&str]]) -> Vec<PipelineStage> {
    PipelineStage::from_commands(
        commands
            .iter()
            .map(|args| CommandVector::new(args.iter().copied()).unwrap())
            .collect(),
    )
}

#[test]
fn test_single_command_large_output() {
    // 2 MiB of zeros from one process
    let launcher = ProcessLauncher::new(Foreground::detached());
    let (read, write) = pipe_cloexec().unwrap();
    let job = launcher
        .spawn(
            &CommandVector::new(["head", "-c", "2097152", "/dev/zero"]).unwrap(),
            None,
            StdioBindings::inherit().stdout(write.as_fd()),
        )
        .unwrap();
    drop(write);

    let mut out = Vec::new();
    File::from(read).read_to_end(&mut out).unwrap();
    assert_eq!(out.len(), 2 * MEGABYTE);
    assert!(out.iter().all(|&b| b == 0));
    assert!(job.wait().unwrap().success());
}

#[test]
fn test_pipeline_large_output() {
    let executor = PipelineExecutor::new(Foreground::detached());
    let (read, write) = pipe_cloexec().unwrap();
    let job = executor
        .spawn(
            &stages(&[&["seq", "1", "300000"], &["cat"], &["cat"]]),
            StdioBindings::inherit().stdout(write.as_fd()),
        )
        .unwrap();
    drop(write);

    let mut out = String::new();
    File::from(read).read_to_string(&mut out).unwrap();
    assert!(out.len() > MEGABYTE);
    assert_eq!(out.lines().count(), 300000);
    assert_eq!(out.lines().last(), Some("300000"));
    assert!(job.wait().unwrap().success());
}

#[test]
fn test_capture_large_output() {
    let executor = PipelineExecutor::new(Foreground::detached());
    let (report, out) = executor
        .capture(
            &stages(&[&["head", "-c", "1500000", "/dev/zero"], &["tr", "\\0", "x"]]),
            StdioBindings::inherit(),
        )
        .unwrap();
    assert!(report.success());
    assert_eq!(out.len(), 1_500_000);
    assert!(out.iter().all(|&b| b == b'x'));
}
