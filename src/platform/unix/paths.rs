//! Unix path operations

use crate::error::{Error, Result};
use crate::platform::traits::PathOps;
use std::path::PathBuf;

/// Overrides the directory searched for `.myshrc`
pub const RC_DIR_VAR: &str = "MYSHDOTDIR";

pub struct UnixPaths;

impl UnixPaths {
    pub fn new() -> Self {
        Self
    }
}

impl PathOps for UnixPaths {
    fn home_dir(&self) -> Result<PathBuf> {
        // HOME wins so `cd` and `~` follow the user's environment
        if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
            Ok(PathBuf::from(home))
        } else if let Some(home) = dirs::home_dir() {
            Ok(home)
        } else {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine home directory",
            )))
        }
    }

    fn rc_dir(&self) -> Result<PathBuf> {
        match std::env::var_os(RC_DIR_VAR) {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => self.home_dir(),
        }
    }
}
