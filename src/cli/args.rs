//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--root <path>`: Run against a project rooted at that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gitman - a language-agnostic dependency manager for git repositories
#[derive(Parser, Debug)]
#[command(name = "gitman")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Start manifest discovery from this directory instead of the
    /// current one
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new manifest in the current directory
    #[command(
        name = "init",
        long_about = "Create a new manifest in the current directory.\n\n\
            The manifest declares which git repositories this project depends on, \
            where they are materialized, and (after locking) the exact revisions \
            needed to reproduce an installation."
    )]
    Init,

    /// Install dependencies, preferring locked revisions
    #[command(
        name = "install",
        long_about = "Install the requested dependencies.\n\n\
            Sources are materialized into the storage directory at their locked \
            revisions when a lock list exists, and at their declared revisions \
            otherwise. Manifests discovered inside installed dependencies are \
            installed recursively.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Install everything (or the default group, if one is configured)
    gitman install

    # Install two specific sources
    gitman install lib tool

    # Install one named group
    gitman install backend

    # Reinstall over local edits, discarding them
    gitman install --force

    # Limit recursion into nested manifests
    gitman install --depth 2"
    )]
    Install {
        /// Source or group names to install (default: the default group,
        /// or everything)
        names: Vec<String>,

        /// Maximum recursion depth into nested manifests
        #[arg(short, long, value_name = "N")]
        depth: Option<usize>,

        /// Overwrite local changes and rebuild invalid repositories
        #[arg(short, long)]
        force: bool,

        /// Ask before overwriting each dependency with local changes
        #[arg(long)]
        force_interactive: bool,

        /// Fetch the latest refs even when the revision is already present
        #[arg(short = 'e', long)]
        fetch: bool,

        /// Also delete untracked and ignored files in dependencies
        #[arg(short, long)]
        clean: bool,

        /// Leave dependencies with local changes alone instead of failing
        #[arg(short, long)]
        skip_changes: bool,

        /// Ignore the configured default group
        #[arg(long)]
        no_default_group: bool,
    },

    /// Update dependencies to their latest declared revisions
    #[command(
        name = "update",
        long_about = "Update the requested dependencies.\n\n\
            Unlike install, update ignores locked revisions and moves each \
            source to the latest commit matching its declared revision, then \
            records the achieved state back into the lock list (unless \
            --no-lock is given).",
        after_help = "\
WORKFLOW EXAMPLES:
    # Update everything and re-lock
    gitman update

    # Update one source without touching the lock list
    gitman update lib --no-lock

    # Update nested manifests to their latest revisions as well
    gitman update --recurse"
    )]
    Update {
        /// Source or group names to update (default: the default group,
        /// or everything)
        names: Vec<String>,

        /// Maximum recursion depth into nested manifests
        #[arg(short, long, value_name = "N")]
        depth: Option<usize>,

        /// Overwrite local changes and rebuild invalid repositories
        #[arg(short, long)]
        force: bool,

        /// Ask before overwriting each dependency with local changes
        #[arg(long)]
        force_interactive: bool,

        /// Also delete untracked and ignored files in dependencies
        #[arg(short, long)]
        clean: bool,

        /// Leave dependencies with local changes alone instead of failing
        #[arg(short, long)]
        skip_changes: bool,

        /// Also update dependencies of nested manifests
        #[arg(long)]
        recurse: bool,

        /// Do not record the updated revisions in the lock list
        #[arg(long)]
        no_lock: bool,

        /// Ignore the configured default group
        #[arg(long)]
        no_default_group: bool,
    },

    /// Display the current revision of each dependency
    #[command(
        name = "list",
        after_help = "\
READING THE OUTPUT:
    <path>: <repository url> @ <revision>

    Revisions are full commit hashes; a dependency with local changes shows
    <dirty> and one that was never installed shows <unknown>."
    )]
    List {
        /// Maximum recursion depth into nested manifests
        #[arg(short, long, value_name = "N")]
        depth: Option<usize>,

        /// Fail when a dependency has local changes instead of showing
        /// the <dirty> marker
        #[arg(short = 'D', long)]
        no_dirty: bool,
    },

    /// Pin the currently installed revisions in the manifest
    #[command(
        name = "lock",
        long_about = "Record the revision each installed dependency currently \
            points at into the manifest's lock list, so a later install \
            reproduces this exact state.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Lock everything that is installed
    gitman lock

    # Lock a single source
    gitman lock lib"
    )]
    Lock {
        /// Source or group names to lock (default: the default group,
        /// or everything)
        names: Vec<String>,
    },

    /// Delete all installed dependencies
    #[command(name = "uninstall")]
    Uninstall {
        /// Delete even dependencies with local changes
        #[arg(short, long)]
        force: bool,

        /// Keep the storage directory itself, deleting only its contents
        #[arg(short, long)]
        keep_location: bool,
    },

    /// Print the path of the manifest or of installed dependencies
    #[command(name = "show")]
    Show {
        /// Source names to show (default: the manifest itself)
        names: Vec<String>,
    },

    /// Open the manifest in the default editor
    #[command(name = "edit")]
    Edit,
}
