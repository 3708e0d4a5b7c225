//! Error types and Result aliases for mysh
//!
//! `Display` renders `<reason>: <detail>`; the caller prefixes the name of
//! the builtin or `mysh`, giving the one-line diagnostics printed to stderr.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for mysh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mysh
#[derive(Debug)]
pub enum Error {
    // === Preflight errors (detected before forking) ===
    /// Program path does not exist
    NotFound {
        path: String,
    },

    /// Program path names a directory
    IsADirectory {
        path: String,
    },

    /// Program path exists but is not executable by the caller
    PermissionDenied {
        path: String,
    },

    /// Bare program name could not be resolved on `PATH`
    CommandNotFound {
        command: String,
    },

    // === Process and descriptor errors ===
    /// fork(2) or pipe(2) failed, typically because of process or descriptor limits
    ResourceExhausted {
        operation: String,
        reason: String,
    },

    /// waitpid(2) failed for a job member
    WaitFailed {
        pid: i32,
        reason: String,
    },

    /// Failed to install a signal disposition
    SignalInstallFailed {
        signal: String,
        reason: String,
    },

    /// Failed to send a signal to a process or group
    SignalSendFailed {
        signal: String,
        reason: String,
    },

    /// Handing the terminal to a job failed
    TerminalHandoffFailed {
        pgid: i32,
        reason: String,
    },

    /// Giving the terminal back to the interpreter failed
    TerminalRestoreFailed {
        pgid: i32,
        reason: String,
    },

    // === Command line errors ===
    /// Command vector with no program name
    EmptyCommand,

    /// Pipeline with a blank stage, e.g. `ls |` or `| wc`
    EmptyPipelineStage,

    /// Quote opened but never closed
    UnterminatedQuote,

    /// `${...}` with a name that is not an identifier
    InvalidVariableName {
        name: String,
    },

    /// Argument that cannot be passed to exec (interior NUL byte)
    InvalidArgument {
        argument: String,
    },

    // === Configuration errors ===
    /// Startup file exists but could not be read
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Startup file is not a JSON object
    ConfigParseFailed {
        path: PathBuf,
        reason: String,
    },

    // === I/O errors ===
    /// I/O errors
    Io(std::io::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors
    Other(String),
}

impl Error {
    /// Build a `ResourceExhausted` error for a failed system call
    pub fn resource(operation: &str, err: nix::errno::Errno) -> Self {
        Error::ResourceExhausted {
            operation: operation.to_string(),
            reason: err.desc().to_string(),
        }
    }

    /// Whether this error was raised before any process was created
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::IsADirectory { .. }
                | Error::PermissionDenied { .. }
                | Error::CommandNotFound { .. }
                | Error::InvalidArgument { .. }
                | Error::EmptyCommand
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Preflight errors
            Error::NotFound { path } => write!(f, "no such file or directory: {}", path),
            Error::IsADirectory { path } => write!(f, "is a directory: {}", path),
            Error::PermissionDenied { path } => write!(f, "permission denied: {}", path),
            Error::CommandNotFound { command } => write!(f, "command not found: {}", command),

            // Process errors
            Error::ResourceExhausted { operation, reason } => {
                write!(f, "{} failed: {}", operation, reason)
            }
            Error::WaitFailed { pid, reason } => {
                write!(f, "failed to wait for process {}: {}", pid, reason)
            }
            Error::SignalInstallFailed { signal, reason } => {
                write!(f, "failed to install {} handler: {}", signal, reason)
            }
            Error::SignalSendFailed { signal, reason } => {
                write!(f, "failed to send {}: {}", signal, reason)
            }
            Error::TerminalHandoffFailed { pgid, reason } => {
                write!(f, "failed to give terminal to process group {}: {}", pgid, reason)
            }
            Error::TerminalRestoreFailed { pgid, reason } => {
                write!(f, "failed to restore terminal to process group {}: {}", pgid, reason)
            }

            // Command line errors
            Error::EmptyCommand => write!(f, "syntax error: empty command"),
            Error::EmptyPipelineStage => write!(f, "syntax error: expected command after pipe"),
            Error::UnterminatedQuote => write!(f, "syntax error: unterminated quote"),
            Error::InvalidVariableName { name } => {
                write!(f, "syntax error: invalid characters for variable {}", name)
            }
            Error::InvalidArgument { argument } => {
                write!(f, "invalid argument: {}", argument.escape_debug())
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "cannot read {}: {}", path.display(), reason)
            }
            Error::ConfigParseFailed { .. } => write!(f, "invalid JSON format for .myshrc"),

            // I/O errors
            Error::Io(err) => write!(f, "I/O error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<nix::errno::Errno> for Error {
    fn from(err: nix::errno::Errno) -> Self {
        Error::Io(std::io::Error::from(err))
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
