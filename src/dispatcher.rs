//! Line dispatch: builtin, single external command, or pipeline

use crate::builtins::{Builtin, BuiltinContext, BuiltinOutcome};
use crate::error::{Error, Result};
use crate::execution::{ExitStatus, Foreground, PipelineExecutor, EXIT_CANNOT_EXECUTE, EXIT_NOT_FOUND};
use crate::parser;
use std::io::{Read, Write};

/// What the read-eval loop does after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Prompt again; the line finished with this status
    Continue(ExitStatus),
    /// Leave the interpreter with this exit code
    Exit(i32),
}

/// Standard streams the dispatcher and builtins use
pub struct Streams<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// Routes parsed lines to builtins or the execution layer
pub struct Dispatcher {
    executor: PipelineExecutor,
}

impl Dispatcher {
    pub fn new(foreground: Foreground) -> Self {
        Self {
            executor: PipelineExecutor::new(foreground),
        }
    }

    pub fn executor(&self) -> &PipelineExecutor {
        &self.executor
    }

    /// Run one input line
    ///
    /// Any error is reported as a single `mysh: ...` line on `streams.stderr`
    /// and the loop continues.
    pub fn dispatch(&self, line: &str, streams: &mut Streams<'_>) -> LineOutcome {
        match self.execute(line, streams) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("Line {:?} failed: {:?}", line, e);
                let _ = writeln!(streams.stderr, "{}: {}", crate::SHELL_NAME, e);
                LineOutcome::Continue(ExitStatus::Exited(failure_code(&e)))
            }
        }
    }

    fn execute(&self, line: &str, streams: &mut Streams<'_>) -> Result<LineOutcome> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(LineOutcome::Continue(ExitStatus::Exited(0)));
        }

        let stages = parser::parse_line(line)?;
        if let [stage] = stages.as_slice() {
            if let Some(builtin) = Builtin::from_name(stage.command.program()) {
                return self.run_builtin(builtin, stage.command.args(), streams);
            }
        }

        // Children write straight to the inherited descriptors
        streams.stdout.flush()?;
        streams.stderr.flush()?;

        let status = match stages.as_slice() {
            [stage] => self.executor.launcher().run(&stage.command)?,
            _ => self.executor.run(&stages)?,
        };
        debug!("Line finished with {}", status);
        Ok(LineOutcome::Continue(status))
    }

    fn run_builtin(
        &self,
        builtin: Builtin,
        args: &[String],
        streams: &mut Streams<'_>,
    ) -> Result<LineOutcome> {
        let mut ctx = BuiltinContext {
            stdin: &mut *streams.stdin,
            stdout: &mut *streams.stdout,
            stderr: &mut *streams.stderr,
            executor: &self.executor,
        };
        let outcome = builtin.run(args, &mut ctx)?;
        ctx.stdout.flush()?;

        Ok(match outcome {
            BuiltinOutcome::Continue(code) => LineOutcome::Continue(ExitStatus::Exited(code)),
            BuiltinOutcome::Exit(code) => LineOutcome::Exit(code),
        })
    }
}

/// Status recorded for a line that failed before or while starting a job
fn failure_code(error: &Error) -> i32 {
    match error {
        Error::NotFound { .. } | Error::CommandNotFound { .. } => EXIT_NOT_FOUND,
        Error::IsADirectory { .. } | Error::PermissionDenied { .. } => EXIT_CANNOT_EXECUTE,
        _ => 1,
    }
}
