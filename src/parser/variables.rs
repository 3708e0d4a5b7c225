//! Shell variable names and `${NAME}` substitution

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::env;

static VARIABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern"));

static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern"));

/// Whether `name` can be used as a shell variable name
pub fn is_valid_variable_name(name: &str) -> bool {
    VARIABLE_NAME.is_match(name)
}

/// Replace every `${NAME}` in `text`
///
/// Names found in `table` are substituted recursively with their own
/// references resolved; other names fall back to the environment. A name
/// found in neither, or one that refers back to itself, stays literal.
pub fn substitute_variables(text: &str, table: &HashMap<String, String>) -> String {
    let mut resolving = HashSet::new();
    substitute(text, table, &mut resolving)
}

fn substitute(text: &str, table: &HashMap<String, String>, resolving: &mut HashSet<String>) -> String {
    REFERENCE
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            if let Some(value) = table.get(name) {
                if !resolving.insert(name.to_string()) {
                    return caps[0].to_string();
                }
                let resolved = substitute(value, table, resolving);
                resolving.remove(name);
                resolved
            } else if let Ok(value) = env::var(name) {
                value
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
