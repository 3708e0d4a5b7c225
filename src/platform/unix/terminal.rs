//! Controlling terminal access

use crate::error::{Error, Result};
use crate::platform::traits::TerminalOps;
use nix::errno::Errno;
use nix::unistd::{tcgetpgrp, tcsetpgrp, Pid};
use std::fs::{File, OpenOptions};

const TTY_PATH: &str = "/dev/tty";

/// Handle on the process's controlling terminal
#[derive(Debug)]
pub struct UnixTerminal {
    tty: File,
}

impl UnixTerminal {
    /// Open `/dev/tty`; `Ok(None)` when the process has no controlling terminal
    pub fn open() -> Result<Option<Self>> {
        match OpenOptions::new().read(true).write(true).open(TTY_PATH) {
            Ok(tty) => Ok(Some(Self { tty })),
            Err(e) => match e.raw_os_error().map(Errno::from_raw) {
                Some(Errno::ENXIO) | Some(Errno::ENOENT) | Some(Errno::ENOTTY) => {
                    debug!("No controlling terminal: {}", e);
                    Ok(None)
                }
                _ => Err(Error::Io(e)),
            },
        }
    }
}

impl TerminalOps for UnixTerminal {
    fn foreground_group(&self) -> Result<Pid> {
        Ok(tcgetpgrp(&self.tty)?)
    }

    fn set_foreground_group(&self, pgid: Pid) -> Result<()> {
        Ok(tcsetpgrp(&self.tty, pgid)?)
    }
}
