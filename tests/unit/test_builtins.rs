//! Unit Tests for Builtin Commands
//!
//! Builtins are driven through the dispatcher with in-memory streams. The
//! working directory is process-wide, so everything touching it lives in a
//! single test.

use mysh::dispatcher::{Dispatcher, LineOutcome, Streams};
use mysh::execution::{ExitStatus, Foreground};
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;

struct Ran {
    outcome: LineOutcome,
    stdout: String,
    stderr: String,
}

fn run(dispatcher: &Dispatcher, line: &str) -> Ran {
    let mut stdin: &[u8] = b"";
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let outcome = dispatcher.dispatch(
        line,
        &mut Streams {
            stdin: &mut stdin,
            stdout: &mut stdout,
            stderr: &mut stderr,
        },
    );
    Ran {
        outcome,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

#[test]
fn test_cd_and_pwd() {
    let dispatcher = Dispatcher::new(Foreground::detached());
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let inner = root.join("inner");
    fs::create_dir(&inner).unwrap();
    let file = root.join("plain.txt");
    fs::write(&file, "x").unwrap();

    let ran = run(&dispatcher, &format!("cd {}", inner.display()));
    assert_eq!(ran.outcome, LineOutcome::Continue(ExitStatus::Exited(0)));
    assert_eq!(env::current_dir().unwrap(), inner);
    assert_eq!(env::var("PWD").unwrap(), inner.display().to_string());

    let ran = run(&dispatcher, "pwd");
    assert_eq!(ran.stdout, format!("{}\n", inner.display()));

    run(&dispatcher, "cd ..");
    assert_eq!(env::current_dir().unwrap(), root);
    assert_eq!(run(&dispatcher, "pwd -P").stdout, format!("{}\n", root.display()));

    let ran = run(&dispatcher, "cd plain.txt");
    assert_eq!(ran.stderr, "cd: not a directory: plain.txt\n");
    assert_eq!(ran.outcome, LineOutcome::Continue(ExitStatus::Exited(1)));

    let ran = run(&dispatcher, "cd no_such_dir");
    assert_eq!(ran.stderr, "cd: no such file or directory: no_such_dir\n");

    let ran = run(&dispatcher, "cd a b");
    assert_eq!(ran.stderr, "cd: too many arguments\n");

    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if !nix::unistd::Uid::effective().is_root() {
        let ran = run(&dispatcher, "cd locked");
        assert_eq!(ran.stderr, "cd: permission denied: locked\n");
    }
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let ran = run(&dispatcher, "pwd -L");
    assert_eq!(ran.stderr, "pwd: invalid option: -L\n");
    let ran = run(&dispatcher, "pwd somewhere");
    assert_eq!(ran.stderr, "pwd: not expecting any arguments\n");

    env::set_var("HOME", &inner);
    run(&dispatcher, "cd");
    assert_eq!(env::current_dir().unwrap(), inner);
    run(&dispatcher, "cd /");
    run(&dispatcher, "cd ~");
    assert_eq!(env::current_dir().unwrap(), inner);

    env::set_current_dir("/").unwrap();
}

#[test]
fn test_var_and_echo() {
    let dispatcher = Dispatcher::new(Foreground::detached());

    run(&dispatcher, "var MYSH_UNIT_COLOR blue");
    let ran = run(&dispatcher, "echo sky is ${MYSH_UNIT_COLOR}");
    assert_eq!(ran.stdout, "sky is blue\n");

    let ran = run(&dispatcher, "var -s MYSH_UNIT_COUNT 'printf abc | wc -c'");
    assert_eq!(ran.outcome, LineOutcome::Continue(ExitStatus::Exited(0)));
    assert_eq!(env::var("MYSH_UNIT_COUNT").unwrap(), "3");

    let ran = run(&dispatcher, "var -s 9bad 'echo x'");
    assert_eq!(ran.stderr, "var: invalid characters for variable 9bad\n");

    let ran = run(&dispatcher, "var -s ONLY_NAME");
    assert_eq!(ran.stderr, "var: expected 2 arguments, got 1\n");
}

#[test]
fn test_cat_and_which() {
    let dispatcher = Dispatcher::new(Foreground::detached());
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "first\nsecond\n").unwrap();

    let ran = run(&dispatcher, &format!("cat {}", file.display()));
    assert_eq!(ran.stdout, "first\nsecond\n");

    let missing = dir.path().join("absent");
    let ran = run(&dispatcher, &format!("cat {}", missing.display()));
    assert_eq!(
        ran.stderr,
        format!("cat: {}: No such file or directory\n", missing.display())
    );

    let ran = run(&dispatcher, "which cd exit pwd which var echo cat");
    assert_eq!(ran.stdout.lines().count(), 7);
    assert!(ran
        .stdout
        .lines()
        .all(|line| line.ends_with(": shell built-in command")));
}
