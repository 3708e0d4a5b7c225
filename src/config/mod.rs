//! Configuration management for mysh
//!
//! The interpreter is configured through the process environment. The
//! startup file (`.myshrc`) is a flat JSON object of variables that is
//! validated, expanded and exported before the first prompt; see
//! [`loader::ConfigLoader`].

pub mod loader;

pub use loader::{ConfigLoader, RcFile, RejectedEntry, RC_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

/// Prompt shown when `PROMPT` is unset
pub const DEFAULT_PROMPT: &str = ">> ";

/// Value of `MYSH_VERSION` when the environment does not provide one
pub const DEFAULT_VERSION: &str = "1.0";

/// Variable holding the prompt text
pub const PROMPT_VAR: &str = "PROMPT";

/// Variable holding the interpreter version
pub const VERSION_VAR: &str = "MYSH_VERSION";

/// Resolved interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Prompt in effect after startup
    pub prompt: String,

    /// Value of `MYSH_VERSION`
    pub version: String,

    /// Startup file that was consulted, if any
    pub rc_path: Option<PathBuf>,

    /// Variables exported from the startup file
    pub variables: BTreeMap<String, String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            version: DEFAULT_VERSION.to_string(),
            rc_path: None,
            variables: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    /// Prompt to print now; `var PROMPT ...` can change it between lines
    pub fn current_prompt() -> String {
        env::var(PROMPT_VAR).unwrap_or_else(|_| DEFAULT_PROMPT.to_string())
    }

    /// Fill in `PROMPT` and `MYSH_VERSION` when the environment lacks them
    pub fn apply_defaults() {
        if env::var_os(PROMPT_VAR).is_none() {
            env::set_var(PROMPT_VAR, DEFAULT_PROMPT);
        }
        if env::var_os(VERSION_VAR).is_none() {
            env::set_var(VERSION_VAR, DEFAULT_VERSION);
        }
    }

    /// Snapshot of the configuration currently in effect
    pub fn from_env(rc_path: Option<PathBuf>, variables: BTreeMap<String, String>) -> Self {
        Self {
            prompt: Self::current_prompt(),
            version: env::var(VERSION_VAR).unwrap_or_else(|_| DEFAULT_VERSION.to_string()),
            rc_path,
            variables,
        }
    }
}
