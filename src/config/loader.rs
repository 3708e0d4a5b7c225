//! Startup file loading
//!
//! `.myshrc` lives in `$MYSHDOTDIR` when that is set, otherwise in the home
//! directory. It must hold a single JSON object whose keys are variable names
//! and whose values are strings. Values may refer to other entries or to the
//! environment with `${NAME}`.

use super::ShellConfig;
use crate::error::{Error, Result};
use crate::parser::{is_valid_variable_name, substitute_variables};
use crate::platform::Platform;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Name of the startup file
pub const RC_FILE_NAME: &str = ".myshrc";

/// An entry of the startup file that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedEntry {
    /// Key is not a valid variable name
    InvalidName(String),
    /// Value is not a JSON string
    NotAString(String),
}

impl fmt::Display for RejectedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectedEntry::InvalidName(key) => {
                write!(f, "{}: {}: invalid characters for variable name", RC_FILE_NAME, key)
            }
            RejectedEntry::NotAString(key) => write!(f, "{}: {}: not a string", RC_FILE_NAME, key),
        }
    }
}

/// Validated contents of a startup file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcFile {
    /// Accepted entries with references expanded
    pub variables: BTreeMap<String, String>,
    /// Entries that were skipped, in key order
    pub rejected: Vec<RejectedEntry>,
}

impl RcFile {
    /// Validate a parsed JSON object and expand references between entries
    pub fn from_object(object: Map<String, Value>) -> Self {
        let mut accepted = HashMap::new();
        let mut rejected = Vec::new();

        for (key, value) in object {
            if !is_valid_variable_name(&key) {
                rejected.push(RejectedEntry::InvalidName(key));
            } else if let Value::String(value) = value {
                accepted.insert(key, value);
            } else {
                rejected.push(RejectedEntry::NotAString(key));
            }
        }

        let variables = accepted
            .iter()
            .map(|(key, value)| (key.clone(), substitute_variables(value, &accepted)))
            .collect();

        Self { variables, rejected }
    }

    /// Export every accepted entry to the process environment
    pub fn export(&self) {
        for (key, value) in &self.variables {
            env::set_var(key, value);
        }
    }
}

/// Startup file loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader for the default startup file location
    pub fn new() -> Self {
        let path = match Self::default_path() {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("No startup file location: {}", e);
                None
            }
        };
        Self { path }
    }

    /// Loader for an explicit startup file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `$MYSHDOTDIR/.myshrc`, else `~/.myshrc`
    pub fn default_path() -> Result<PathBuf> {
        Ok(Platform::paths().rc_dir()?.join(RC_FILE_NAME))
    }

    /// Startup file this loader reads
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read and validate the startup file
    ///
    /// A missing file is an empty configuration.
    pub fn read(&self) -> Result<RcFile> {
        let Some(path) = &self.path else {
            return Ok(RcFile::default());
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No startup file at {}", path.display());
                return Ok(RcFile::default());
            }
            Err(e) => {
                return Err(Error::ConfigLoadFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })
            }
        };

        let parse_failed = |reason: String| Error::ConfigParseFailed {
            path: path.clone(),
            reason,
        };
        match serde_json::from_str::<Value>(&content).map_err(|e| parse_failed(e.to_string()))? {
            Value::Object(object) => Ok(RcFile::from_object(object)),
            _ => Err(parse_failed("top level is not an object".to_string())),
        }
    }

    /// Read the startup file, export its variables and apply defaults
    ///
    /// Problems are reported on `diagnostics` as `mysh: ...` lines and never
    /// stop startup; an unreadable or malformed file is ignored as a whole.
    pub fn load(&self, diagnostics: &mut dyn Write) -> ShellConfig {
        let rc = match self.read() {
            Ok(rc) => rc,
            Err(e) => {
                warn!("Ignoring startup file: {}", e);
                let _ = writeln!(diagnostics, "{}: {}", crate::SHELL_NAME, e);
                RcFile::default()
            }
        };

        for entry in &rc.rejected {
            let _ = writeln!(diagnostics, "{}: {}", crate::SHELL_NAME, entry);
        }

        rc.export();
        ShellConfig::apply_defaults();
        info!("Loaded {} startup variables", rc.variables.len());
        ShellConfig::from_env(self.path.clone(), rc.variables)
    }
}
