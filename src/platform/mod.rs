//! Platform abstraction layer
//!
//! This module provides a unified interface for the Unix facilities the
//! shell relies on, so job control can be exercised against fakes in tests.

mod traits;
mod unix;

pub use traits::*;
pub use unix::UnixTerminal;

use crate::error::Result;
use std::sync::Arc;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific signal operations
    pub fn signals() -> Box<dyn SignalOps> {
        Box::new(unix::UnixSignals::new())
    }

    /// Get the platform-specific filesystem operations
    pub fn filesystem() -> Box<dyn FilesystemOps> {
        Box::new(unix::UnixFilesystem::new())
    }

    /// Get the platform-specific path operations
    pub fn paths() -> Box<dyn PathOps> {
        Box::new(unix::UnixPaths::new())
    }

    /// Open the controlling terminal, if this process has one
    ///
    /// Returns `Ok(None)` when there is no controlling terminal, which is the
    /// normal situation for scripted sessions and test runs.
    pub fn controlling_terminal() -> Result<Option<Arc<dyn TerminalOps>>> {
        Ok(UnixTerminal::open()?.map(|tty| Arc::new(tty) as Arc<dyn TerminalOps>))
    }
}
