//! `cd` and `pwd`

use super::{Builtin, BuiltinContext, BuiltinOutcome};
use crate::error::Result;
use crate::platform::Platform;
use nix::libc;
use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

pub(super) fn cd(operands: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    let target = match operands {
        [] => Platform::paths().home_dir()?,
        [dir] if dir == "~" => Platform::paths().home_dir()?,
        [dir] => PathBuf::from(dir),
        _ => return ctx.usage(Builtin::Cd, "too many arguments"),
    };
    let shown = target.display().to_string();

    if let Err(e) = env::set_current_dir(&target) {
        let reason = match e.raw_os_error() {
            Some(libc::ENOTDIR) => "not a directory",
            _ => match e.kind() {
                io::ErrorKind::NotFound => "no such file or directory",
                io::ErrorKind::PermissionDenied => "permission denied",
                _ => return ctx.usage(Builtin::Cd, format_args!("{}: {}", shown, e)),
            },
        };
        return ctx.usage(Builtin::Cd, format_args!("{}: {}", reason, shown));
    }

    let pwd = logical_path(&target);
    debug!("Changed directory to {}", pwd.display());
    env::set_var("PWD", &pwd);
    Ok(BuiltinOutcome::SUCCESS)
}

pub(super) fn pwd(operands: &[String], ctx: &mut BuiltinContext<'_>) -> Result<BuiltinOutcome> {
    let mut physical = false;
    for operand in operands {
        if operand == "-P" {
            physical = true;
        } else if operand.starts_with('-') {
            let option: String = operand.chars().take(2).collect();
            return ctx.usage(Builtin::Pwd, format_args!("invalid option: {}", option));
        } else {
            return ctx.usage(Builtin::Pwd, "not expecting any arguments");
        }
    }

    let cwd = if physical {
        env::current_dir()?.canonicalize()?
    } else {
        logical_cwd()?
    };
    writeln!(ctx.stdout, "{}", cwd.display())?;
    Ok(BuiltinOutcome::SUCCESS)
}

/// `$PWD` when it still names the working directory, else the physical path
fn logical_cwd() -> io::Result<PathBuf> {
    let cwd = env::current_dir()?;
    match env::var_os("PWD").map(PathBuf::from) {
        Some(pwd) if pwd.is_absolute() && same_file(&pwd, &cwd) => Ok(pwd),
        _ => Ok(cwd),
    }
}

/// Path of the new working directory as the user spelled it
///
/// `..` is resolved textually against the previous `$PWD`, as interactive
/// shells do. Falls back to the physical path if the result does not name
/// the directory we are actually in.
fn logical_path(target: &Path) -> PathBuf {
    let physical = env::current_dir().unwrap_or_else(|_| target.to_path_buf());
    let base = env::var_os("PWD").map(PathBuf::from).filter(|p| p.is_absolute());

    let joined = match base {
        Some(base) if target.is_relative() => base.join(target),
        _ => target.to_path_buf(),
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    if normalized.is_absolute() && same_file(&normalized, &physical) {
        normalized
    } else {
        physical
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
