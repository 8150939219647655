//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the manifest through the store
//! 2. Runs one engine operation
//! 3. Formats and displays the outcome
//!
//! Handlers never talk to git directly, and a zero count ("nothing to do")
//! is an error so the process exits non-zero.

mod edit;
mod init;
mod install;
mod list;
mod lock_cmd;
mod show;
mod uninstall;
mod update;

pub use edit::edit;
pub use init::init;
pub use install::install;
pub use list::list;
pub use lock_cmd::lock;
pub use show::show;
pub use uninstall::uninstall;
pub use update::update;

use anyhow::{anyhow, Result};

use crate::cli::args::Command;
use crate::cli::Context;
use crate::core::manifest::Manifest;
use crate::core::store;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init => init::init(ctx),
        Command::Install {
            names,
            depth,
            force,
            force_interactive,
            fetch,
            clean,
            skip_changes,
            no_default_group,
        } => install::install(
            ctx,
            &names,
            depth,
            force,
            force_interactive,
            fetch,
            clean,
            skip_changes,
            no_default_group,
        ),
        Command::Update {
            names,
            depth,
            force,
            force_interactive,
            clean,
            skip_changes,
            recurse,
            no_lock,
            no_default_group,
        } => update::update(
            ctx,
            &names,
            depth,
            force,
            force_interactive,
            clean,
            skip_changes,
            recurse,
            no_lock,
            no_default_group,
        ),
        Command::List { depth, no_dirty } => list::list(ctx, depth, no_dirty),
        Command::Lock { names } => lock_cmd::lock(ctx, &names),
        Command::Uninstall {
            force,
            keep_location,
        } => uninstall::uninstall(ctx, force, keep_location),
        Command::Show { names } => show::show(ctx, &names),
        Command::Edit => edit::edit(ctx),
    }
}

/// Load the nearest manifest, or fail with a pointer at `gitman init`.
pub(crate) fn load_manifest(ctx: &Context) -> Result<Manifest> {
    let start = ctx.start_dir()?;
    store::load(&start, true)?.ok_or_else(|| {
        anyhow!(
            "no manifest found from {} (run `gitman init` to create one)",
            start.display()
        )
    })
}

/// Report how many dependencies an operation touched; zero is a failure.
pub(crate) fn summarize(ctx: &Context, count: usize, verb: &str) -> Result<()> {
    if count == 0 {
        return Err(anyhow!("no dependencies were {}", verb));
    }

    let noun = if count == 1 {
        "dependency"
    } else {
        "dependencies"
    };
    output::message(
        format!("{} {} {}.", capitalize(verb), count, noun),
        0,
        ctx.verbosity(),
    );
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
