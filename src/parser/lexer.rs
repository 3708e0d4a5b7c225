//! Word splitting for one pipeline stage
//!
//! Quoting follows the POSIX shell rules a user expects at a prompt:
//! single quotes are fully literal, double quotes keep whitespace and accept
//! `\"`, `\\` and `\$`, and an unquoted backslash escapes the next character.
//! `${NAME}` is expanded everywhere except inside single quotes. The expanded
//! value is never split into further words.

use super::variables::is_valid_variable_name;
use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Split `stage` into words, expanding variables and `~` from the environment
pub fn tokenize(stage: &str) -> Result<Vec<String>> {
    tokenize_with(stage, |name| std::env::var(name).ok())
}

/// Split `stage` into words, resolving variables (and `HOME` for `~`)
/// through `lookup`
pub fn tokenize_with<F>(stage: &str, lookup: F) -> Result<Vec<String>>
where
    F: Fn(&str) -> Option<String>,
{
    Lexer {
        chars: stage.chars().peekable(),
        lookup,
        words: Vec::new(),
        word: String::new(),
        in_word: false,
    }
    .run()
}

struct Lexer<'a, F> {
    chars: Peekable<Chars<'a>>,
    lookup: F,
    words: Vec<String>,
    word: String,
    in_word: bool,
}

impl<F> Lexer<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn run(mut self) -> Result<Vec<String>> {
        while let Some(c) = self.chars.next() {
            match c {
                c if c.is_whitespace() => self.finish_word(),
                '\'' => self.single_quoted()?,
                '"' => self.double_quoted()?,
                '\\' => {
                    self.in_word = true;
                    // A trailing backslash has nothing to escape and stays literal
                    let escaped = self.chars.next().unwrap_or('\\');
                    self.word.push(escaped);
                }
                '$' if self.chars.peek() == Some(&'{') => {
                    self.in_word = true;
                    self.variable()?;
                }
                '~' if !self.in_word && self.at_tilde_boundary() => {
                    self.in_word = true;
                    match self.home() {
                        Some(home) => self.word.push_str(&home),
                        None => self.word.push('~'),
                    }
                }
                c => {
                    self.in_word = true;
                    self.word.push(c);
                }
            }
        }
        self.finish_word();
        Ok(self.words)
    }

    fn finish_word(&mut self) {
        if self.in_word {
            self.words.push(std::mem::take(&mut self.word));
            self.in_word = false;
        }
    }

    fn single_quoted(&mut self) -> Result<()> {
        self.in_word = true;
        loop {
            match self.chars.next() {
                Some('\'') => return Ok(()),
                Some(c) => self.word.push(c),
                None => return Err(Error::UnterminatedQuote),
            }
        }
    }

    fn double_quoted(&mut self) -> Result<()> {
        self.in_word = true;
        loop {
            match self.chars.next() {
                Some('"') => return Ok(()),
                Some('\\') => match self.chars.peek() {
                    Some(&c @ ('"' | '\\' | '$')) => {
                        self.chars.next();
                        self.word.push(c);
                    }
                    _ => self.word.push('\\'),
                },
                Some('$') if self.chars.peek() == Some(&'{') => self.variable()?,
                Some(c) => self.word.push(c),
                None => return Err(Error::UnterminatedQuote),
            }
        }
    }

    /// Expand `${NAME}`; the `$` has been consumed and `{` is next
    fn variable(&mut self) -> Result<()> {
        let rest: String = self.chars.clone().skip(1).collect();
        let Some(end) = rest.find('}') else {
            // No closing brace: keep the text as typed
            self.word.push('$');
            return Ok(());
        };

        let name = &rest[..end];
        if !is_valid_variable_name(name) {
            return Err(Error::InvalidVariableName {
                name: name.to_string(),
            });
        }

        let value = (self.lookup)(name).unwrap_or_default();
        self.word.push_str(&value);
        // Skip `{`, the name and `}`
        for _ in 0..name.chars().count() + 2 {
            self.chars.next();
        }
        Ok(())
    }

    fn at_tilde_boundary(&mut self) -> bool {
        match self.chars.peek() {
            None | Some('/') => true,
            Some(c) => c.is_whitespace(),
        }
    }

    fn home(&self) -> Option<String> {
        (self.lookup)("HOME").or_else(|| {
            dirs::home_dir().map(|path| path.to_string_lossy().into_owned())
        })
    }
}
