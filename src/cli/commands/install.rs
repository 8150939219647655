//! install command - materialize dependencies, preferring locked revisions

use anyhow::Result;

use crate::cli::commands::{load_manifest, summarize};
use crate::cli::Context;
use crate::core::manifest::InstallOptions;
use crate::core::resolver::ResolutionContext;
use crate::ui::output;

/// Install the requested dependencies.
#[allow(clippy::too_many_arguments)]
pub fn install(
    ctx: &Context,
    names: &[String],
    depth: Option<usize>,
    force: bool,
    force_interactive: bool,
    fetch: bool,
    clean: bool,
    skip_changes: bool,
    no_default_group: bool,
) -> Result<()> {
    let manifest = load_manifest(ctx)?;

    output::message("Installing dependencies...", 0, ctx.verbosity());

    let opts = InstallOptions {
        names: names.to_vec(),
        depth,
        update: false,
        recurse: false,
        force,
        force_interactive,
        fetch,
        clean,
        skip_changes,
        skip_default_group: no_default_group,
        verbosity: ctx.verbosity(),
    };

    let mut resolution = ResolutionContext::new();
    let count = manifest.install_dependencies(&mut resolution, &opts)?;

    summarize(ctx, count, "installed")
}
