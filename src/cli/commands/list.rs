//! list command - display the current revision of each dependency

use anyhow::{bail, Result};

use crate::cli::commands::load_manifest;
use crate::cli::Context;
use crate::ui::output;

/// Print `path: url @ revision` for every dependency, depth-first.
pub fn list(ctx: &Context, depth: Option<usize>, no_dirty: bool) -> Result<()> {
    let manifest = load_manifest(ctx)?;

    output::message(
        format!("Dependencies from {}:", manifest.manifest_path().display()),
        0,
        ctx.verbosity(),
    );

    let statuses = manifest.get_dependencies(depth, !no_dirty)?;
    if statuses.is_empty() {
        bail!("no dependencies are declared");
    }

    for status in &statuses {
        println!("{}: {} @ {}", status.path, status.url, status.revision);
    }
    Ok(())
}
