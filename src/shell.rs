//! Interactive read-eval loop

use crate::config::{ConfigLoader, ShellConfig};
use crate::dispatcher::{Dispatcher, LineOutcome, Streams};
use crate::error::Result;
use crate::execution::Foreground;
use crate::signals::SignalManager;
use nix::errno::Errno;
use nix::libc;
use std::io::{self, Read, Write};
use std::os::fd::RawFd;
use std::path::PathBuf;

/// Startup options for [`Shell`]
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    /// Startup file to read instead of the default `.myshrc`
    pub rc_path: Option<PathBuf>,
}

/// One result of reading from the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Line(String),
    /// Ctrl-C arrived while the line was being typed
    Interrupted,
    Eof,
}

/// Reads lines from a descriptor without retrying reads cut short by `SIGINT`
///
/// Bytes read past the end of a line are kept for the next call and are
/// also what a builtin reading standard input sees first.
pub struct LineReader {
    fd: RawFd,
    buffer: Vec<u8>,
    eof: bool,
}

impl LineReader {
    pub fn new(fd: RawFd) -> Self {
        Self {
            fd,
            buffer: Vec::new(),
            eof: false,
        }
    }

    /// Reader over the interpreter's standard input
    pub fn stdin() -> Self {
        Self::new(libc::STDIN_FILENO)
    }

    pub fn read_line(&mut self) -> Result<InputLine> {
        loop {
            if let Some(end) = self.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=end).collect();
                return Ok(InputLine::Line(String::from_utf8_lossy(&line[..end]).into_owned()));
            }

            if self.eof {
                if self.buffer.is_empty() {
                    return Ok(InputLine::Eof);
                }
                let line = std::mem::take(&mut self.buffer);
                return Ok(InputLine::Line(String::from_utf8_lossy(&line).into_owned()));
            }

            match self.fill() {
                Ok(()) => {}
                Err(Errno::EINTR) => {
                    if SignalManager::take_interrupted() {
                        self.buffer.clear();
                        return Ok(InputLine::Interrupted);
                    }
                }
                Err(e) => return Err(io::Error::from(e).into()),
            }
        }
    }

    fn fill(&mut self) -> std::result::Result<(), Errno> {
        let mut chunk = [0u8; 4096];
        // SAFETY: `chunk` is valid for writes of its full length
        let n = unsafe { libc::read(self.fd, chunk.as_mut_ptr().cast(), chunk.len()) };
        let n = Errno::result(n)? as usize;
        if n == 0 {
            self.eof = true;
        }
        self.buffer.extend_from_slice(&chunk[..n]);
        Ok(())
    }
}

impl Read for LineReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if !self.buffer.is_empty() {
                let n = buf.len().min(self.buffer.len());
                buf[..n].copy_from_slice(&self.buffer[..n]);
                self.buffer.drain(..n);
                return Ok(n);
            }
            if self.eof {
                return Ok(0);
            }
            match self.fill() {
                Ok(()) => {}
                // Ctrl-C ends the input a builtin is consuming
                Err(Errno::EINTR) if SignalManager::take_interrupted() => return Ok(0),
                Err(Errno::EINTR) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// The interactive interpreter
pub struct Shell {
    dispatcher: Dispatcher,
    config: ShellConfig,
    input: LineReader,
}

impl Shell {
    /// Install signal dispositions, find the terminal and load `.myshrc`
    pub fn new(options: ShellOptions) -> Result<Self> {
        SignalManager::install_base_dispositions()?;
        let foreground = Foreground::detect()?;
        info!(
            "Starting {} (terminal handoff {})",
            crate::SHELL_NAME,
            if foreground.has_terminal() { "enabled" } else { "disabled" }
        );

        let loader = match options.rc_path {
            Some(path) => ConfigLoader::with_path(path),
            None => ConfigLoader::new(),
        };
        let config = loader.load(&mut io::stderr());

        Ok(Self {
            dispatcher: Dispatcher::new(foreground),
            config,
            input: LineReader::stdin(),
        })
    }

    /// Configuration in effect after startup
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Prompt, read and dispatch until `exit` or end of input
    ///
    /// Returns the interpreter's exit code.
    pub fn run(&mut self) -> Result<i32> {
        let stdout = io::stdout();
        let stderr = io::stderr();

        loop {
            // Re-arm before reading; a builtin may have touched SIGINT
            SignalManager::install_base_dispositions()?;
            {
                let mut out = stdout.lock();
                write!(out, "{}", ShellConfig::current_prompt())?;
                out.flush()?;
            }

            let line = match self.input.read_line()? {
                InputLine::Line(line) => line,
                InputLine::Interrupted => {
                    println!();
                    continue;
                }
                InputLine::Eof => {
                    println!();
                    return Ok(0);
                }
            };

            let mut out = stdout.lock();
            let mut err = stderr.lock();
            let mut streams = Streams {
                stdin: &mut self.input,
                stdout: &mut out,
                stderr: &mut err,
            };

            match self.dispatcher.dispatch(&line, &mut streams) {
                LineOutcome::Exit(code) => {
                    info!("Exiting with status {}", code);
                    return Ok(code);
                }
                LineOutcome::Continue(status) => {
                    SignalManager::take_interrupted();
                    if status.was_interrupted() {
                        writeln!(out)?;
                    }
                }
            }
        }
    }
}
