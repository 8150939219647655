//! lock command - pin the currently installed revisions

use anyhow::Result;

use crate::cli::commands::{load_manifest, summarize};
use crate::cli::Context;
use crate::core::store;
use crate::ui::output;

/// Record each installed dependency's revision in the lock list.
pub fn lock(ctx: &Context, names: &[String]) -> Result<()> {
    let mut manifest = load_manifest(ctx)?;

    output::message("Locking dependencies...", 0, ctx.verbosity());

    let count = manifest.lock_dependencies(names, false, false, ctx.verbosity())?;
    if count > 0 {
        store::save(&manifest)?;
    }

    summarize(ctx, count, "locked")
}
