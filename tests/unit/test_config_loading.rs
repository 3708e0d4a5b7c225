//! Unit Tests for Startup File Loading
//!
//! Covers validation of `.myshrc` entries, reference expansion, export to
//! the environment and the diagnostics printed for bad files.

use mysh::config::{ConfigLoader, RejectedEntry, ShellConfig, RC_FILE_NAME};
use std::env;
use std::fs;

#[test]
fn test_load_exports_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(RC_FILE_NAME);
    fs::write(
        &path,
        r#"{
            "MYSH_CFG_ROOT": "/data",
            "MYSH_CFG_LOGS": "${MYSH_CFG_ROOT}/logs",
            "MYSH_CFG_LIST": ["not", "a", "string"],
            "MYSH CFG SPACED": "x"
        }"#,
    )
    .unwrap();

    let mut diagnostics = Vec::new();
    let config = ConfigLoader::with_path(&path).load(&mut diagnostics);
    let diagnostics = String::from_utf8(diagnostics).unwrap();

    assert_eq!(env::var("MYSH_CFG_LOGS").unwrap(), "/data/logs");
    assert_eq!(config.variables.len(), 2);
    assert_eq!(config.rc_path.as_deref(), Some(path.as_path()));
    assert!(diagnostics.contains("mysh: .myshrc: MYSH_CFG_LIST: not a string\n"));
    assert!(diagnostics.contains("mysh: .myshrc: MYSH CFG SPACED: invalid characters for variable name\n"));
    assert!(env::var_os("MYSH CFG SPACED").is_none());
}

#[test]
fn test_defaults_fill_missing_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut diagnostics = Vec::new();
    let config = ConfigLoader::with_path(dir.path().join(RC_FILE_NAME)).load(&mut diagnostics);

    assert!(diagnostics.is_empty());
    assert!(env::var_os("PROMPT").is_some());
    assert!(env::var_os("MYSH_VERSION").is_some());
    assert_eq!(config.version, env::var("MYSH_VERSION").unwrap());
    assert_eq!(config.prompt, ShellConfig::current_prompt());
}

#[test]
fn test_invalid_json_is_ignored_as_a_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(RC_FILE_NAME);
    fs::write(&path, r#"{"MYSH_CFG_HALF": "value""#).unwrap();

    let mut diagnostics = Vec::new();
    let config = ConfigLoader::with_path(&path).load(&mut diagnostics);

    assert_eq!(
        String::from_utf8(diagnostics).unwrap(),
        "mysh: invalid JSON format for .myshrc\n"
    );
    assert!(config.variables.is_empty());
    assert!(env::var_os("MYSH_CFG_HALF").is_none());
}

#[test]
fn test_read_reports_rejections_without_exporting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(RC_FILE_NAME);
    fs::write(&path, r#"{"MYSH_CFG_ONLY_READ": "1", "2X": "y"}"#).unwrap();

    let rc = ConfigLoader::with_path(&path).read().unwrap();
    assert_eq!(rc.variables["MYSH_CFG_ONLY_READ"], "1");
    assert_eq!(rc.rejected, vec![RejectedEntry::InvalidName("2X".to_string())]);
    assert!(env::var_os("MYSH_CFG_ONLY_READ").is_none());
}

#[test]
fn test_default_path_follows_myshdotdir() {
    let dir = tempfile::tempdir().unwrap();
    env::set_var("MYSHDOTDIR", dir.path());
    assert_eq!(
        ConfigLoader::default_path().unwrap(),
        dir.path().join(".myshrc")
    );
    assert_eq!(
        ConfigLoader::new().path(),
        Some(dir.path().join(".myshrc").as_path())
    );
    env::remove_var("MYSHDOTDIR");
}
