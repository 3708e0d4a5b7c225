//! `cat`

use super::{BuiltinContext, BuiltinOutcome};
use crate::error::Result;
use std::fs::File;
use std::io;
use std::path::Path;

pub(super) fn cat(operands: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    if operands.is_empty() {
        io::copy(&mut *ctx.stdin, &mut *ctx.stdout)?;
        ctx.stdout.flush()?;
        return Ok(BuiltinOutcome::SUCCESS);
    }

    let mut outcome = BuiltinOutcome::SUCCESS;
    for name in operands {
        let path = Path::new(name);
        let problem = if !path.exists() {
            Some("No such file or directory".to_string())
        } else if path.is_dir() {
            Some("Is a directory".to_string())
        } else {
            match File::open(path).and_then(|mut file| io::copy(&mut file, &mut *ctx.stdout)) {
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            }
        };

        if let Some(problem) = problem {
            writeln!(ctx.stderr, "cat: {}: {}", name, problem)?;
            outcome = BuiltinOutcome::FAILURE;
        }
    }
    ctx.stdout.flush()?;
    Ok(outcome)
}
