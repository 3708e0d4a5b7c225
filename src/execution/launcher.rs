//! Fork/exec of a single external command
//!
//! Everything the child needs (C strings, diagnostics) is prepared before
//! `fork`, so between fork and exec the child performs only
//! async-signal-safe calls: no allocation, no locking, no logging.

use super::stdio::StdioBindings;
use super::{preflight, CommandVector, ExitStatus, Foreground, Job, ProcessGroupHandle};
use crate::error::{Error, Result};
use crate::platform::{FilesystemOps, Platform};
use crate::signals::SignalManager;
use nix::errno::Errno;
use nix::libc;
use nix::unistd::{execvp, fork, setpgid, ForkResult, Pid};
use std::ffi::CString;
use std::os::fd::{AsRawFd, RawFd};

/// Exit status of a child whose program could not be found
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit status of a child whose program was found but could not be executed
pub const EXIT_CANNOT_EXECUTE: i32 = 126;

/// Runs one external command as a child process
pub struct ProcessLauncher {
    foreground: Foreground,
    filesystem: Box<dyn FilesystemOps>,
}

impl ProcessLauncher {
    /// Create a launcher that hands the terminal to its jobs per `foreground`
    pub fn new(foreground: Foreground) -> Self {
        Self {
            foreground,
            filesystem: Platform::filesystem(),
        }
    }

    /// Foreground handoff policy used by this launcher
    pub fn foreground(&self) -> &Foreground {
        &self.foreground
    }

    /// Run `command` as a foreground job with inherited standard streams
    pub fn run(&self, command: &CommandVector) -> Result<ExitStatus> {
        self.run_with(command, StdioBindings::inherit())
    }

    /// Run `command` as a foreground job with the given stream bindings
    ///
    /// The child leads a new process group which owns the terminal until it
    /// has been reaped; the terminal is then returned to the interpreter.
    pub fn run_with(&self, command: &CommandVector, stdio: StdioBindings<'_>) -> Result<ExitStatus> {
        let job = self.spawn(command, None, stdio)?;
        let report = self.foreground.run_job(job)?;
        Ok(report.last_status())
    }

    /// Start `command` without waiting for it
    ///
    /// With `group` the child joins that process group, otherwise it becomes
    /// the leader of a new one and is registered as the foreground job until
    /// reaped. Path-qualified programs are checked first and nothing is forked
    /// when the check fails.
    pub fn spawn(
        &self,
        command: &CommandVector,
        group: Option<ProcessGroupHandle>,
        stdio: StdioBindings<'_>,
    ) -> Result<Job> {
        let image = self.prepare(command)?;
        let pid = fork_exec(&image, group, &stdio, &[])?;
        let group = match group {
            Some(group) => group,
            None => {
                // Interrupts from here on reach the job even before handoff
                SignalManager::set_foreground_job(pid);
                ProcessGroupHandle::led_by(pid)
            }
        };
        Ok(Job::new(group, pid))
    }

    /// Preflight `command` and build its exec image
    pub(crate) fn prepare(&self, command: &CommandVector) -> Result<ChildImage> {
        preflight(command, self.filesystem.as_ref())?;
        ChildImage::prepare(command)
    }
}

/// Exec arguments and failure diagnostics for one child
pub(crate) struct ChildImage {
    program: CString,
    argv: Vec<CString>,
    not_found: Vec<u8>,
    cannot_execute: Vec<u8>,
}

impl ChildImage {
    fn prepare(command: &CommandVector) -> Result<Self> {
        let argv = command
            .args()
            .iter()
            .map(|arg| {
                CString::new(arg.as_str()).map_err(|_| Error::InvalidArgument {
                    argument: arg.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let not_found = Error::CommandNotFound {
            command: command.program().to_string(),
        };
        let cannot_execute = Error::PermissionDenied {
            path: command.program().to_string(),
        };

        Ok(Self {
            program: argv[0].clone(),
            argv,
            not_found: format!("{}: {}\n", crate::SHELL_NAME, not_found).into_bytes(),
            cannot_execute: format!("{}: {}\n", crate::SHELL_NAME, cannot_execute).into_bytes(),
        })
    }

    /// Report a failed exec on stderr and leave the child. Async-signal-safe.
    fn exit_after_exec_failure(&self, errno: Errno) -> ! {
        let (message, code) = match errno {
            Errno::ENOENT | Errno::ENOTDIR => (&self.not_found, EXIT_NOT_FOUND),
            _ => (&self.cannot_execute, EXIT_CANNOT_EXECUTE),
        };
        unsafe {
            libc::write(libc::STDERR_FILENO, message.as_ptr().cast(), message.len());
            libc::_exit(code)
        }
    }
}

/// Fork a child that joins or creates a process group, binds its standard
/// streams, closes `close_in_child`, and execs `image`
///
/// Returns the child's pid in the parent. The parent also places the child
/// in its group so the group exists before the parent relies on it.
pub(crate) fn fork_exec(
    image: &ChildImage,
    group: Option<ProcessGroupHandle>,
    stdio: &StdioBindings<'_>,
    close_in_child: &[RawFd],
) -> Result<Pid> {
    // SAFETY: the child branch only performs async-signal-safe calls
    match unsafe { fork() } {
        Ok(ForkResult::Child) => enter_child(image, group, stdio, close_in_child),
        Ok(ForkResult::Parent { child }) => {
            let pgid = group.map(|g| g.pgid()).unwrap_or(child);
            match setpgid(child, pgid) {
                // EACCES: the child already exec'd after joining; ESRCH: already gone
                Ok(()) | Err(Errno::EACCES) | Err(Errno::ESRCH) => {}
                Err(e) => warn!("setpgid({}, {}) failed: {}", child, pgid, e),
            }
            debug!("Forked pid {} into process group {}", child, pgid);
            Ok(child)
        }
        Err(e) => Err(Error::resource("fork", e)),
    }
}

fn enter_child(
    image: &ChildImage,
    group: Option<ProcessGroupHandle>,
    stdio: &StdioBindings<'_>,
    close_in_child: &[RawFd],
) -> ! {
    let pgid = group.map(|g| g.pgid()).unwrap_or_else(|| Pid::from_raw(0));
    let _ = setpgid(Pid::from_raw(0), pgid);
    SignalManager::restore_child_defaults();

    let bindings = [
        (stdio.stdin, libc::STDIN_FILENO),
        (stdio.stdout, libc::STDOUT_FILENO),
        (stdio.stderr, libc::STDERR_FILENO),
    ];

    for (fd, slot) in bindings {
        if let Some(fd) = fd {
            let raw = fd.as_raw_fd();
            if raw != slot && unsafe { libc::dup2(raw, slot) } < 0 {
                unsafe { libc::_exit(EXIT_CANNOT_EXECUTE) }
            }
        }
    }

    let originals = bindings
        .iter()
        .filter_map(|(fd, _)| fd.map(|fd| fd.as_raw_fd()));
    for raw in originals.chain(close_in_child.iter().copied()) {
        if raw > libc::STDERR_FILENO {
            unsafe { libc::close(raw) };
        }
    }

    let errno = match execvp(&image.program, &image.argv) {
        Ok(never) => match never {},
        Err(errno) => errno,
    };
    image.exit_after_exec_failure(errno)
}
