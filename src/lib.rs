//! mysh - a small interactive Unix shell with job control
//!
//! This library provides the interpreter behind the `mysh` binary: it parses
//! command lines, runs builtins in-process, and runs external commands and
//! pipelines as foreground jobs that own the controlling terminal.
//!
//! ## Features
//!
//! - **Process groups:** Every job runs in its own process group
//! - **Terminal handoff:** The job owns the terminal while it runs and the
//!   interpreter always gets it back
//! - **Pipelines:** `a | b | c` with every stage in one group
//! - **Interrupts:** Ctrl-C reaches the foreground job, never the prompt
//! - **Startup file:** `.myshrc` JSON variables with `${NAME}` expansion
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`execution`] - Fork/exec, pipelines, jobs, terminal ownership
//! - [`signals`] - Signal dispositions and interrupt forwarding
//! - [`platform`] - Unix system-call seams used by the core
//! - [`mod@error`] - Error types and Result aliases
//!
//! ### Interpreter
//!
//! - [`parser`] - Pipe splitting, word splitting, expansion
//! - [`builtins`] - `cd`, `pwd`, `exit`, `which`, `var`, `echo`, `cat`
//! - [`dispatcher`] - Routes a line to a builtin or the execution layer
//! - [`shell`] - The read-eval loop
//! - [`config`] - Startup file loading and defaults
//!
//! ## Quick Start
//!
//! ```no_run
//! use mysh::execution::{CommandVector, Foreground, ProcessLauncher};
//!
//! # fn main() -> mysh::Result<()> {
//! let launcher = ProcessLauncher::new(Foreground::detect()?);
//! let status = launcher.run(&CommandVector::new(["ls", "-l"])?)?;
//! println!("ls finished: {}", status);
//! # Ok(())
//! # }
//! ```

#![allow(unexpected_cfgs)]

#[cfg(not(unix))]
compile_error!("mysh requires a Unix platform (process groups and terminal job control)");

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod platform;
pub mod signals;

// Core modules
pub mod execution;

// Interpreter modules
pub mod builtins;
pub mod dispatcher;
pub mod parser;
pub mod shell;

// Re-exports for core functionality
pub use config::{ConfigLoader, ShellConfig};
pub use error::{Error, Result};
pub use execution::{CommandVector, ExitStatus, Foreground, PipelineExecutor, PipelineStage, ProcessLauncher};
pub use shell::{Shell, ShellOptions};
pub use signals::SignalManager;

/// Name used as the prefix of every diagnostic
pub const SHELL_NAME: &str = "mysh";

// Version information
/// The current version of mysh from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
