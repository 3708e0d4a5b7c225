//! Process-wide signal dispositions
//!
//! The interpreter ignores `SIGTTOU` so it can take the terminal back from a
//! finished job without being stopped, and routes `SIGINT` through
//! [`SignalManager::on_interrupt`], which forwards the interrupt to the
//! running foreground job and broadcasts it to the interpreter's own group.
//!
//! Everything reachable from the handler is async-signal-safe: atomics and
//! `kill(2)`-family calls only.

use crate::error::{Error, Result};
use nix::libc::c_int;
use nix::sys::signal::{killpg, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::{getpgrp, getpid, Pid};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Set once the base dispositions have been installed
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Process group of the job currently running in the foreground, 0 if none
static FOREGROUND_JOB: AtomicI32 = AtomicI32::new(0);

/// Latched by every interrupt, cleared by the read-eval loop
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Our own group broadcast comes back to us; swallow exactly that one
static PENDING_ECHO: AtomicBool = AtomicBool::new(false);

/// Signal disposition state of the interpreter process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Dispositions inherited at process creation
    Default,
    /// `SIGTTOU` ignored and `SIGINT` routed to the interrupt handler
    Installed,
}

/// Installs and services the interpreter's signal dispositions
pub struct SignalManager;

impl SignalManager {
    /// Ignore `SIGTTOU` and route `SIGINT` to [`SignalManager::on_interrupt`]
    ///
    /// Idempotent; pipelines call it again before every run in case a builtin
    /// changed the interrupt disposition in between.
    pub fn install_base_dispositions() -> Result<()> {
        let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
        // No SA_RESTART: a blocking waitpid must see EINTR and loop
        let interrupt = SigAction::new(
            SigHandler::Handler(handle_sigint),
            SaFlags::empty(),
            SigSet::empty(),
        );

        unsafe { sigaction(Signal::SIGTTOU, &ignore) }.map_err(|e| {
            Error::SignalInstallFailed {
                signal: "SIGTTOU".to_string(),
                reason: e.to_string(),
            }
        })?;
        unsafe { sigaction(Signal::SIGINT, &interrupt) }.map_err(|e| {
            Error::SignalInstallFailed {
                signal: "SIGINT".to_string(),
                reason: e.to_string(),
            }
        })?;

        if Self::disposition() == Disposition::Default {
            INSTALLED.store(true, Ordering::SeqCst);
            debug!("Installed base signal dispositions");
        }
        Ok(())
    }

    /// Current disposition state
    pub fn disposition() -> Disposition {
        if INSTALLED.load(Ordering::SeqCst) {
            Disposition::Installed
        } else {
            Disposition::Default
        }
    }

    /// Interrupt handler body
    ///
    /// Forwards `SIGINT` to the registered foreground job, then broadcasts it
    /// to the interpreter's own process group. The broadcast is only sent when
    /// the interpreter leads its group, so a parent that launched us without
    /// job control never receives it.
    pub fn on_interrupt() {
        if PENDING_ECHO.swap(false, Ordering::SeqCst) {
            return;
        }
        INTERRUPTED.store(true, Ordering::SeqCst);

        let job = FOREGROUND_JOB.load(Ordering::SeqCst);
        if job > 0 {
            let _ = killpg(Pid::from_raw(job), Signal::SIGINT);
        }

        let group = getpgrp();
        if group == getpid() {
            PENDING_ECHO.store(true, Ordering::SeqCst);
            if killpg(group, Signal::SIGINT).is_err() {
                PENDING_ECHO.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Record the process group that should receive forwarded interrupts
    pub fn set_foreground_job(pgid: Pid) {
        FOREGROUND_JOB.store(pgid.as_raw(), Ordering::SeqCst);
    }

    /// Forget the foreground job once it has been reaped
    pub fn clear_foreground_job() {
        FOREGROUND_JOB.store(0, Ordering::SeqCst);
    }

    /// Forget `pgid` if it is still the registered foreground job
    pub fn release_foreground_job(pgid: Pid) {
        let _ = FOREGROUND_JOB.compare_exchange(pgid.as_raw(), 0, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// Return and clear the interrupt latch
    pub fn take_interrupted() -> bool {
        INTERRUPTED.swap(false, Ordering::SeqCst)
    }

    /// Reset inherited dispositions in a freshly forked child
    ///
    /// Ignored dispositions survive exec: `SIGTTOU` is ignored by the
    /// interpreter and `SIGPIPE` by the Rust runtime, and a pipeline writer
    /// must die of `SIGPIPE` once its reader exits. Async-signal-safe.
    pub(crate) fn restore_child_defaults() {
        let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        unsafe {
            let _ = sigaction(Signal::SIGINT, &default);
            let _ = sigaction(Signal::SIGTTOU, &default);
            let _ = sigaction(Signal::SIGPIPE, &default);
        }
    }
}

extern "C" fn handle_sigint(_signum: c_int) {
    SignalManager::on_interrupt();
}
