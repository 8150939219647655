//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT touch git or the filesystem directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers in [`commands`], which load the manifest through the store and
//! run exactly one engine operation. Errors bubble out to `main`, where the
//! remediation hint is rendered and the process exits non-zero.

pub mod args;
pub mod commands;

pub use args::Cli;

use std::env;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::ui::Verbosity;

/// Per-invocation context shared by every command handler.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Optional root-directory override (`--root`).
    pub root: Option<PathBuf>,
    /// Minimal output.
    pub quiet: bool,
    /// Verbose output.
    pub debug: bool,
}

impl Context {
    /// The directory manifest discovery starts from.
    pub fn start_dir(&self) -> Result<PathBuf> {
        let cwd = env::current_dir().context("failed to determine the current directory")?;
        Ok(match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => cwd,
        })
    }

    /// Output verbosity derived from the global flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        root: cli.root.clone(),
        quiet: cli.quiet,
        debug: cli.debug,
    };

    commands::dispatch(cli.command, &ctx)
}
