//! shell
//!
//! External command execution.
//!
//! # Architecture
//!
//! Every process Gitman launches goes through this module. Each call takes
//! its working directory as an explicit parameter; the module never changes
//! the process's own working directory.
//!
//! Three failure policies are offered:
//!
//! - [`run`] - non-zero exit is an error carrying the captured output
//! - [`run_unchecked`] - the caller branches on success itself
//! - [`run_ignored`] - failures are swallowed (best-effort calls such as
//!   `git stash` on a tree that may have nothing to stash)

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// A command that exited non-zero or could not be launched.
///
/// Carries the working directory and the combined stdout/stderr so the
/// failure can be shown to the user with full context.
#[derive(Debug, Error)]
#[error("command `{program}` failed in {}:\n{output}", cwd.display())]
pub struct ShellError {
    /// The program that was invoked
    pub program: String,
    /// The working directory of the invocation
    pub cwd: PathBuf,
    /// Combined captured output (or the launch error)
    pub output: String,
}

/// Result of a finished command, for callers that branch on outcome.
#[derive(Debug)]
pub struct CommandOutput {
    /// Captured stdout, trimmed
    pub text: String,
    /// Captured stderr, trimmed
    pub errors: String,
    /// Whether the command exited zero
    pub success: bool,
}

/// Run a command in `cwd` and return its combined output.
///
/// # Errors
///
/// [`ShellError`] if the command cannot be launched or exits non-zero.
pub fn run<I, S>(cwd: &Path, program: &str, args: I) -> Result<String, ShellError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_unchecked(cwd, program, args)?;
    if output.success {
        Ok(output.text)
    } else {
        let mut combined = output.text;
        if !output.errors.is_empty() {
            if !combined.is_empty() {
                combined.push('\n');
            }
            combined.push_str(&output.errors);
        }
        Err(ShellError {
            program: program.to_string(),
            cwd: cwd.to_path_buf(),
            output: combined,
        })
    }
}

/// Run a command in `cwd` without treating a non-zero exit as an error.
///
/// # Errors
///
/// [`ShellError`] only if the command cannot be launched at all (missing
/// binary, nonexistent working directory).
pub fn run_unchecked<I, S>(cwd: &Path, program: &str, args: I) -> Result<CommandOutput, ShellError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|err| ShellError {
            program: program.to_string(),
            cwd: cwd.to_path_buf(),
            output: err.to_string(),
        })?;

    Ok(CommandOutput {
        text: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        errors: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        success: output.status.success(),
    })
}

/// Run a command in `cwd`, swallowing any failure.
pub fn run_ignored<I, S>(cwd: &Path, program: &str, args: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let _ = run(cwd, program, args);
}

/// Run one script string through the platform shell in `cwd`.
///
/// # Errors
///
/// [`ShellError`] if the script exits non-zero.
pub fn run_script(cwd: &Path, script: &str) -> Result<String, ShellError> {
    #[cfg(unix)]
    {
        run(cwd, "sh", ["-c", script])
    }
    #[cfg(windows)]
    {
        run(cwd, "cmd", ["/C", script])
    }
}
