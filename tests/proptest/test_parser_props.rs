//! Property-based tests for command line parsing

use mysh::parser::{split_pipeline, tokenize_with};
use proptest::prelude::*;

fn no_env(_: &str) -> Option<String> {
    None
}

proptest! {
    #[test]
    fn test_tokenize_doesnt_panic(s in "\\PC*") {
        let _ = tokenize_with(&s, no_env);
        // Should not panic on any input
    }

    #[test]
    fn test_split_doesnt_panic(s in "\\PC*") {
        let _ = split_pipeline(&s);
    }

    #[test]
    fn test_plain_words_survive_tokenizing(
        words in prop::collection::vec("[a-zA-Z0-9_./=-]{1,12}", 1..8),
    ) {
        let line = words.join("  ");
        prop_assert_eq!(tokenize_with(&line, no_env).unwrap(), words);
    }

    #[test]
    fn test_single_quoting_is_literal(word in "[^'\\x00]{0,24}") {
        let quoted = format!("'{}'", word);
        prop_assert_eq!(tokenize_with(&quoted, no_env).unwrap(), vec![word]);
    }

    #[test]
    fn test_stage_count_matches_pipes(
        commands in prop::collection::vec("[a-z]{1,8}( [a-z0-9]{1,6}){0,3}", 1..6),
    ) {
        let line = commands.join(" | ");
        let stages = split_pipeline(&line).unwrap();
        prop_assert_eq!(stages, commands);
    }

    #[test]
    fn test_trailing_pipe_is_rejected(command in "[a-z]{1,8}", blanks in " {0,3}") {
        let line = format!("{} |{}", command, blanks);
        prop_assert!(split_pipeline(&line).is_err());
    }
}
