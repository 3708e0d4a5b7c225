//! Standard stream bindings for child processes

use crate::error::{Error, Result};
use std::os::fd::{BorrowedFd, OwnedFd};

/// Descriptors to install as a child's fd 0, 1 and 2
///
/// `None` keeps the descriptor inherited from the interpreter. The caller
/// keeps ownership and closes its copies once the child has been forked.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioBindings<'a> {
    pub stdin: Option<BorrowedFd<'a>>,
    pub stdout: Option<BorrowedFd<'a>>,
    pub stderr: Option<BorrowedFd<'a>>,
}

impl<'a> StdioBindings<'a> {
    /// Inherit all three streams
    pub fn inherit() -> Self {
        Self::default()
    }

    pub fn stdin(mut self, fd: BorrowedFd<'a>) -> Self {
        self.stdin = Some(fd);
        self
    }

    pub fn stdout(mut self, fd: BorrowedFd<'a>) -> Self {
        self.stdout = Some(fd);
        self
    }

    pub fn stderr(mut self, fd: BorrowedFd<'a>) -> Self {
        self.stderr = Some(fd);
        self
    }
}

/// Create an anonymous pipe whose ends are close-on-exec
///
/// Returns `(read, write)`. Only the copies duplicated onto a child's
/// standard streams survive exec, so a stray fork elsewhere in the process
/// cannot keep a pipe open past the lifetime of its real readers and writers.
pub fn pipe_cloexec() -> Result<(OwnedFd, OwnedFd)> {
    raw_pipe().map_err(|e| Error::resource("pipe", e))
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
fn raw_pipe() -> nix::Result<(OwnedFd, OwnedFd)> {
    nix::unistd::pipe2(nix::fcntl::OFlag::O_CLOEXEC)
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
fn raw_pipe() -> nix::Result<(OwnedFd, OwnedFd)> {
    use nix::libc;
    use std::os::fd::AsRawFd;

    let (read, write) = nix::unistd::pipe()?;
    for fd in [&read, &write] {
        let res = unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) };
        nix::errno::Errno::result(res)?;
    }
    Ok((read, write))
}
