//! show command - print manifest and dependency paths

use anyhow::{anyhow, Result};

use crate::cli::commands::load_manifest;
use crate::cli::Context;
use crate::core::manifest::SourceMode;

/// Print the manifest path, or the working-tree path of each named source.
pub fn show(ctx: &Context, names: &[String]) -> Result<()> {
    let manifest = load_manifest(ctx)?;

    if names.is_empty() {
        println!("{}", manifest.manifest_path().display());
        return Ok(());
    }

    let sources = manifest.merged_sources(SourceMode::PreferLocked, true);
    for name in names {
        let entry = sources
            .iter()
            .find(|entry| entry.name == *name)
            .ok_or_else(|| anyhow!("no such source: {}", name))?;
        println!("{}", manifest.location_path().join(&entry.name).display());
    }
    Ok(())
}
