//! Unix filesystem operations

use crate::platform::traits::FilesystemOps;
use nix::unistd::{access, AccessFlags};
use std::env;
use std::path::{Path, PathBuf};

/// Search path used when `PATH` is unset
const DEFAULT_SEARCH_PATH: &str = "/bin:/usr/bin";

pub struct UnixFilesystem;

impl UnixFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl FilesystemOps for UnixFilesystem {
    fn can_execute(&self, path: &Path) -> bool {
        // access(2) answers for the real uid/gid, which is what exec checks
        access(path, AccessFlags::X_OK).is_ok()
    }

    fn find_command(&self, command: &str) -> Option<PathBuf> {
        let search_path =
            env::var_os("PATH").unwrap_or_else(|| DEFAULT_SEARCH_PATH.into());

        env::split_paths(&search_path)
            .map(|dir| dir.join(command))
            .find(|candidate| self.is_executable(candidate))
    }
}
