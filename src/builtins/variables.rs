//! `var`: set shell variables, optionally from a command's output

use super::{Builtin, BuiltinContext, BuiltinOutcome};
use crate::error::Result;
use crate::execution::StdioBindings;
use crate::parser::{self, is_valid_variable_name};
use std::env;

const CAPTURE_FLAG: &str = "-s";

pub(super) fn var(operands: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    if let Some(option) = operands.first().filter(|o| o.starts_with('-') && *o != CAPTURE_FLAG) {
        let option: String = option.chars().take(2).collect();
        return ctx.usage(Builtin::Var, format_args!("invalid option: {}", option));
    }

    match operands {
        [flag, name, command] if flag == CAPTURE_FLAG => capture(name, command, ctx),
        [flag, rest @ ..] if flag == CAPTURE_FLAG => expected_two(rest.len(), ctx),
        [name, value] => {
            if !is_valid_variable_name(name) {
                return invalid_name(name, ctx);
            }
            env::set_var(name, value);
            Ok(BuiltinOutcome::SUCCESS)
        }
        _ => expected_two(operands.len(), ctx),
    }
}

/// `var -s NAME COMMAND`: run COMMAND and store its trimmed output
///
/// NAME is only assigned when the command succeeds.
fn capture(name: &str, command: &str, ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    if !is_valid_variable_name(name) {
        return invalid_name(name, ctx);
    }

    let stages = parser::parse_line(command.trim())?;
    let (report, output) = ctx.executor.capture(&stages, StdioBindings::inherit())?;
    if !report.success() {
        let status = report.last_status();
        debug!("var -s {}: command exited with {}", name, status);
        return Ok(BuiltinOutcome::Continue(status.code()));
    }

    let value = String::from_utf8_lossy(&output);
    env::set_var(name, value.trim());
    Ok(BuiltinOutcome::SUCCESS)
}

fn expected_two(got: usize, ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    ctx.usage(Builtin::Var, format_args!("expected 2 arguments, got {}", got))
}

fn invalid_name(name: &str, ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    ctx.usage(
        Builtin::Var,
        format_args!("invalid characters for variable {}", name),
    )
}
