//! Unit Tests for Command Line Parsing
//!
//! Exercises the public parser API: pipe splitting, quoting, escapes and
//! expansion of `${NAME}` and `~`.

use mysh::error::Error;
use mysh::parser::{
    is_valid_variable_name, parse_line, split_pipeline, substitute_variables, tokenize_with,
};
use std::collections::HashMap;

fn env(name: &str) -> Option<String> {
    match name {
        "HOME" => Some("/home/tester".to_string()),
        "PROJECT" => Some("mysh".to_string()),
        _ => None,
    }
}

#[test]
fn test_split_respects_quotes() {
    let stages = split_pipeline(r#"grep "a|b" file | sort | uniq -c"#).unwrap();
    assert_eq!(stages, vec![r#"grep "a|b" file"#, "sort", "uniq -c"]);
}

#[test]
fn test_split_rejects_dangling_pipes() {
    let err = split_pipeline("cat file |").unwrap_err();
    assert!(matches!(err, Error::EmptyPipelineStage));
    assert_eq!(err.to_string(), "syntax error: expected command after pipe");
}

#[test]
fn test_tokenize_mixed_quoting() {
    let words = tokenize_with(r#"git commit -m "fix: ${PROJECT} 'quoted'" --author='A B'"#, env).unwrap();
    assert_eq!(
        words,
        vec!["git", "commit", "-m", "fix: mysh 'quoted'", "--author=A B"]
    );
}

#[test]
fn test_tokenize_tilde_only_at_word_start() {
    let words = tokenize_with("ls ~ ~/docs a/~ \"~\"", env).unwrap();
    assert_eq!(words, vec!["ls", "/home/tester", "/home/tester/docs", "a/~", "~"]);
}

#[test]
fn test_tokenize_errors() {
    let err = tokenize_with("echo \"unterminated", env).unwrap_err();
    assert_eq!(err.to_string(), "syntax error: unterminated quote");

    let err = tokenize_with("echo ${has-dash}", env).unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error: invalid characters for variable has-dash"
    );
}

#[test]
fn test_parse_line_builds_stages() {
    let stages = parse_line("echo one | wc -c").unwrap();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].index, 0);
    assert_eq!(stages[0].command.to_string(), "echo one");
    assert_eq!(stages[1].command.args(), ["wc", "-c"]);
}

#[test]
fn test_substitution_table_then_environment() {
    std::env::set_var("MYSH_PARSER_TEST_ENV", "from-env");
    let table: HashMap<String, String> = [
        ("ROOT".to_string(), "/srv".to_string()),
        ("DATA".to_string(), "${ROOT}/data".to_string()),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        substitute_variables("${DATA}:${MYSH_PARSER_TEST_ENV}:${MISSING_XYZ}", &table),
        "/srv/data:from-env:${MISSING_XYZ}"
    );
}

#[test]
fn test_variable_name_rules() {
    for good in ["A", "_", "snake_case", "X1"] {
        assert!(is_valid_variable_name(good), "{}", good);
    }
    for bad in ["", "9lives", "a b", "a-b", "é"] {
        assert!(!is_valid_variable_name(bad), "{}", bad);
    }
}
