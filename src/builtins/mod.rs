//! Builtin commands
//!
//! Builtins run inside the interpreter process and never fork, with the
//! exception of `var -s`, which runs its command through the pipeline
//! executor. Usage problems are reported on the builtin's error stream as
//! `<builtin>: <message>` and yield status 1; only I/O and job failures are
//! returned as errors.

mod files;
mod navigation;
mod variables;

use crate::error::Result;
use crate::execution::PipelineExecutor;
use crate::platform::Platform;
use std::fmt;
use std::io::{Read, Write};

/// Names recognized as builtins, in the order `which` reports them
pub const BUILTIN_NAMES: [&str; 7] = ["cd", "exit", "pwd", "which", "var", "echo", "cat"];

/// A builtin command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
    Pwd,
    Which,
    Var,
    Echo,
    Cat,
}

/// What the interpreter should do after a builtin ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
    /// Keep reading commands; the builtin finished with this status
    Continue(i32),
    /// Leave the interpreter with this exit code
    Exit(i32),
}

impl BuiltinOutcome {
    const SUCCESS: Self = BuiltinOutcome::Continue(0);
    const FAILURE: Self = BuiltinOutcome::Continue(1);
}

/// Streams and services available to a running builtin
pub struct BuiltinContext<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
    pub executor: &'a PipelineExecutor,
}

impl BuiltinContext<'_> {
    /// Report a usage problem as `<builtin>: <message>` and fail
    fn usage(&mut self, builtin: Builtin, message: impl fmt::Display) -> Result<BuiltinOutcome> {
        writeln!(self.stderr, "{}: {}", builtin, message)?;
        Ok(BuiltinOutcome::FAILURE)
    }
}

impl Builtin {
    /// Look up a builtin by command name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cd" => Some(Builtin::Cd),
            "exit" => Some(Builtin::Exit),
            "pwd" => Some(Builtin::Pwd),
            "which" => Some(Builtin::Which),
            "var" => Some(Builtin::Var),
            "echo" => Some(Builtin::Echo),
            "cat" => Some(Builtin::Cat),
            _ => None,
        }
    }

    /// Command name of this builtin
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Exit => "exit",
            Builtin::Pwd => "pwd",
            Builtin::Which => "which",
            Builtin::Var => "var",
            Builtin::Echo => "echo",
            Builtin::Cat => "cat",
        }
    }

    /// Run the builtin; `args[0]` is the builtin's own name
    pub fn run(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
        debug!("Running builtin {:?}", args);
        let operands = args.get(1..).unwrap_or_default();
        match self {
            Builtin::Cd => navigation::cd(operands, ctx),
            Builtin::Exit => exit(operands, ctx),
            Builtin::Pwd => navigation::pwd(operands, ctx),
            Builtin::Which => which(operands, ctx),
            Builtin::Var => variables::var(operands, ctx),
            Builtin::Echo => echo(operands, ctx),
            Builtin::Cat => files::cat(operands, ctx),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn exit(operands: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    match operands {
        [] => Ok(BuiltinOutcome::Exit(0)),
        [code] if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) => {
            // Only the low 8 bits reach the parent, as with exit(3)
            let code = code
                .bytes()
                .fold(0u32, |acc, digit| (acc * 10 + u32::from(digit - b'0')) % 256);
            Ok(BuiltinOutcome::Exit(code as i32))
        }
        [code] => ctx.usage(
            Builtin::Exit,
            format_args!("non-integer exit code provided: {}", code),
        ),
        _ => ctx.usage(Builtin::Exit, "too many arguments"),
    }
}

fn which(operands: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    if operands.is_empty() {
        writeln!(ctx.stderr, "usage: which command ...")?;
        return Ok(BuiltinOutcome::FAILURE);
    }

    let filesystem = Platform::filesystem();
    let mut outcome = BuiltinOutcome::SUCCESS;
    for name in operands {
        if Builtin::from_name(name).is_some() {
            writeln!(ctx.stdout, "{}: shell built-in command", name)?;
        } else if let Some(path) = filesystem.find_command(name) {
            writeln!(ctx.stdout, "{}", path.display())?;
        } else {
            writeln!(ctx.stdout, "{} not found", name)?;
            outcome = BuiltinOutcome::FAILURE;
        }
    }
    Ok(outcome)
}

fn echo(operands: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    writeln!(ctx.stdout, "{}", operands.join(" "))?;
    Ok(BuiltinOutcome::SUCCESS)
}
