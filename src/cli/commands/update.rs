//! update command - move dependencies to their latest declared revisions

use anyhow::Result;

use crate::cli::commands::{load_manifest, summarize};
use crate::cli::Context;
use crate::core::manifest::InstallOptions;
use crate::core::resolver::ResolutionContext;
use crate::core::store;
use crate::ui::output;

/// Update the requested dependencies and, by default, re-lock them.
#[allow(clippy::too_many_arguments)]
pub fn update(
    ctx: &Context,
    names: &[String],
    depth: Option<usize>,
    force: bool,
    force_interactive: bool,
    clean: bool,
    skip_changes: bool,
    recurse: bool,
    no_lock: bool,
    no_default_group: bool,
) -> Result<()> {
    let mut manifest = load_manifest(ctx)?;

    output::message("Updating dependencies...", 0, ctx.verbosity());

    let opts = InstallOptions {
        names: names.to_vec(),
        depth,
        update: true,
        recurse,
        force,
        force_interactive,
        // an update without a fetch would only rediscover the old state
        fetch: true,
        clean,
        skip_changes,
        skip_default_group: no_default_group,
        verbosity: ctx.verbosity(),
    };

    let mut resolution = ResolutionContext::new();
    let count = manifest.install_dependencies(&mut resolution, &opts)?;

    if count > 0 && !no_lock {
        manifest.lock_dependencies(names, false, skip_changes, ctx.verbosity())?;
        store::save(&manifest)?;
    }

    summarize(ctx, count, "updated")
}
