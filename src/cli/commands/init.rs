//! init command - create a new manifest

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::core::manifest::Manifest;
use crate::core::store;
use crate::ui::output;

/// Create an empty manifest in the starting directory.
///
/// Refuses when a manifest is already reachable from there, so nested
/// projects do not silently end up with two.
pub fn init(ctx: &Context) -> Result<()> {
    let start = ctx.start_dir()?;

    if let Some(existing) = store::find_manifest(&start, true) {
        bail!("manifest already exists: {}", existing.display());
    }

    let manifest = Manifest::new(start, store::DEFAULT_FILENAME);
    store::save(&manifest)?;

    output::message(
        format!("Created {}", manifest.manifest_path().display()),
        0,
        ctx.verbosity(),
    );
    Ok(())
}
