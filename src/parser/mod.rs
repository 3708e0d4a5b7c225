//! Command line parsing
//!
//! A line is first cut into pipeline stages on unquoted `|`, then each stage
//! is split into words by the [`lexer`]. Variable and `~` expansion happen
//! during word splitting, so the execution layer only ever sees final argv.

pub mod lexer;
pub mod variables;

pub use lexer::{tokenize, tokenize_with};
pub use variables::{is_valid_variable_name, substitute_variables};

use crate::error::{Error, Result};
use crate::execution::{CommandVector, PipelineStage};

/// Cut `line` into pipeline stages on every `|` that is neither quoted nor
/// escaped
///
/// Quotes and escapes are kept in the returned text for the lexer. A blank
/// stage (`ls |`, `| wc`, `a || b`) is a syntax error.
pub fn split_pipeline(line: &str) -> Result<Vec<String>> {
    let mut stages = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => {
                quote = None;
                current.push(c);
            }
            (Some('\''), _) => current.push(c),
            (_, '\\') => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '|') => stages.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    stages.push(current);

    if stages.iter().any(|stage| stage.trim().is_empty()) {
        return Err(Error::EmptyPipelineStage);
    }
    Ok(stages.into_iter().map(|stage| stage.trim().to_string()).collect())
}

/// Parse a whole line into numbered pipeline stages
pub fn parse_line(line: &str) -> Result<Vec<PipelineStage>> {
    let commands = split_pipeline(line)?
        .iter()
        .map(|stage| CommandVector::new(tokenize(stage)?))
        .collect::<Result<Vec<_>>>()?;
    Ok(PipelineStage::from_commands(commands))
}
