//! Checks run on path-qualified programs before anything is forked

use super::CommandVector;
use crate::error::{Error, Result};
use crate::platform::FilesystemOps;
use std::path::Path;

/// Validate a command whose program name contains a path separator
///
/// Bare names are left to the program loader's `PATH` search in the child.
pub fn preflight(command: &CommandVector, filesystem: &dyn FilesystemOps) -> Result<()> {
    if !command.has_path_separator() {
        return Ok(());
    }

    let program = command.program();
    let path = Path::new(program);

    if !path.exists() {
        Err(Error::NotFound {
            path: program.to_string(),
        })
    } else if path.is_dir() {
        Err(Error::IsADirectory {
            path: program.to_string(),
        })
    } else if !filesystem.can_execute(path) {
        Err(Error::PermissionDenied {
            path: program.to_string(),
        })
    } else {
        Ok(())
    }
}
