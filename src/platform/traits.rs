//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use nix::unistd::Pid;
use std::path::{Path, PathBuf};

/// Platform-specific signal operations
pub trait SignalOps: Send + Sync {
    /// Send a termination signal to every process in a group
    fn terminate_group(&self, pgid: Pid) -> Result<()>;
}

/// Platform-specific filesystem operations
pub trait FilesystemOps: Send + Sync {
    /// Whether the calling process may execute `path` (directories included)
    fn can_execute(&self, path: &Path) -> bool;

    /// Check if a path is a regular file the caller may execute
    fn is_executable(&self, path: &Path) -> bool {
        path.is_file() && self.can_execute(path)
    }

    /// Find a command in PATH
    fn find_command(&self, command: &str) -> Option<PathBuf>;
}

/// Platform-specific path operations
pub trait PathOps: Send + Sync {
    /// Get the user's home directory
    fn home_dir(&self) -> Result<PathBuf>;

    /// Directory holding the `.myshrc` startup file
    fn rc_dir(&self) -> Result<PathBuf>;
}

/// Controlling-terminal foreground group operations
pub trait TerminalOps: Send + Sync {
    /// Process group currently in the terminal's foreground
    fn foreground_group(&self) -> Result<Pid>;

    /// Make `pgid` the terminal's foreground process group
    fn set_foreground_group(&self, pgid: Pid) -> Result<()>;
}
