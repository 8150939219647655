//! uninstall command - delete installed dependencies

use anyhow::Result;

use crate::cli::commands::load_manifest;
use crate::cli::Context;
use crate::ui::output;

/// Remove the storage directory (or just its contents).
pub fn uninstall(ctx: &Context, force: bool, keep_location: bool) -> Result<()> {
    let manifest = load_manifest(ctx)?;

    manifest.uninstall_dependencies(force, keep_location)?;

    output::message("Uninstalled dependencies.", 0, ctx.verbosity());
    Ok(())
}
