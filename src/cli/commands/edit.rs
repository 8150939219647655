//! edit command - open the manifest in the default editor

use anyhow::{Context as _, Result};

use crate::cli::commands::load_manifest;
use crate::cli::Context;

/// Open the manifest file with the platform's default application.
pub fn edit(ctx: &Context) -> Result<()> {
    let manifest = load_manifest(ctx)?;
    let path = manifest.manifest_path();

    open::that(&path).with_context(|| format!("failed to open {}", path.display()))
}
