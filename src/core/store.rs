//! core::store
//!
//! Manifest discovery and persistence.
//!
//! # Discovery
//!
//! [`find_manifest`] walks upward from a working directory toward (but not
//! past) the project root - the nearest ancestor containing `.git`, falling
//! back to the filesystem root - and returns the first directory holding a
//! recognized manifest filename. Non-searching discovery checks only the
//! exact directory given; the engine uses it to probe freshly installed
//! dependencies for nested manifests.
//!
//! # Persistence
//!
//! Documents are YAML. Loading goes through a raw serde shape
//! ([`ManifestDoc`]), then a pure defaulting step ([`resolve_defaults`]),
//! then [`Manifest::validate`] - configuration is never patched up after
//! construction. Saving rewrites the file atomically (write to a temp file
//! in the same directory, then rename).

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::core::manifest::{Group, Manifest, DEFAULT_LOCATION};
use crate::core::resolver::ResolverMode;
use crate::core::source::SourceEntry;

/// Recognized manifest filenames, in match priority order.
///
/// Matching is case-insensitive and tolerates a leading dot. `gdm.yml` and
/// `gdm.yaml` are legacy aliases.
pub const MANIFEST_FILENAMES: [&str; 4] = ["gitman.yml", "gitman.yaml", "gdm.yml", "gdm.yaml"];

/// Filename used for newly created manifests.
pub const DEFAULT_FILENAME: &str = "gitman.yml";

/// The raw serde shape of a manifest document.
///
/// All fields are optional in the file; defaulting happens in one place,
/// [`resolve_defaults`], never during deserialization hooks.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDoc {
    /// Directory, relative to the manifest, where sources land.
    #[serde(default)]
    pub location: String,

    /// Resolver mode name; empty means nested.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resolver: String,

    /// Declared sources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceEntry>,

    /// Pinned sources from the last lock.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_locked: Vec<SourceEntry>,

    /// Named subsets of source names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,

    /// Group selected when no names are requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_group: Option<String>,
}

/// Find the project root for `start`: the nearest ancestor containing
/// `.git`, else the filesystem root.
pub fn find_root(start: &Path) -> PathBuf {
    let mut dir = start;
    loop {
        if dir.join(".git").exists() {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return dir.to_path_buf(),
        }
    }
}

/// Locate the nearest manifest file.
///
/// With `search`, walks upward from `start` toward (but not past) the
/// project root; without it, checks only `start` itself.
pub fn find_manifest(start: &Path, search: bool) -> Option<PathBuf> {
    if !search {
        return manifest_file_in(start);
    }

    let root = find_root(start);
    let mut dir = Some(start);
    while let Some(current) = dir {
        if let Some(found) = manifest_file_in(current) {
            return Some(found);
        }
        if current == root {
            break;
        }
        dir = current.parent();
    }
    None
}

/// Load the nearest manifest, if one exists.
///
/// # Errors
///
/// [`Error::InvalidConfig`] when the document cannot be parsed or fails
/// validation; I/O errors reading the file.
pub fn load(start: &Path, search: bool) -> Result<Option<Manifest>> {
    let Some(path) = find_manifest(start, search) else {
        return Ok(None);
    };

    let text = fs::read_to_string(&path)
        .map_err(|err| Error::io(format!("reading {}", path.display()), err))?;

    let doc: ManifestDoc = if text.trim().is_empty() {
        ManifestDoc::default()
    } else {
        serde_yaml::from_str(&text).map_err(|err| {
            Error::invalid_config(format!("failed to parse {}: {}", path.display(), err))
        })?
    };

    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let manifest = resolve_defaults(doc, root, filename)?;
    manifest.validate()?;
    Ok(Some(manifest))
}

/// Probe exactly one directory for a manifest (no upward search).
pub fn load_single(dir: &Path) -> Result<Option<Manifest>> {
    load(dir, false)
}

/// Turn a raw document into a manifest with every field filled in.
///
/// Pure defaulting: the storage location falls back to
/// [`DEFAULT_LOCATION`], the resolver name is parsed, and source names are
/// inferred from their repo URLs when omitted.
pub fn resolve_defaults(doc: ManifestDoc, root: PathBuf, filename: String) -> Result<Manifest> {
    let resolver = ResolverMode::parse(&doc.resolver)?;
    let location = if doc.location.is_empty() {
        DEFAULT_LOCATION.to_string()
    } else {
        doc.location
    };

    Ok(Manifest {
        root,
        filename,
        location,
        resolver,
        sources: fill_names(doc.sources),
        sources_locked: fill_names(doc.sources_locked),
        groups: doc.groups,
        default_group: doc.default_group,
    })
}

fn fill_names(mut entries: Vec<SourceEntry>) -> Vec<SourceEntry> {
    for entry in &mut entries {
        if entry.name.is_empty() {
            entry.name = SourceEntry::infer_name(&entry.repo);
        }
    }
    entries
}

fn to_doc(manifest: &Manifest) -> ManifestDoc {
    ManifestDoc {
        location: manifest.location.clone(),
        resolver: match manifest.resolver {
            // the default mode is left implicit in the file
            ResolverMode::Nested => String::new(),
            other => other.as_str().to_string(),
        },
        sources: manifest.sources.clone(),
        sources_locked: manifest.sources_locked.clone(),
        groups: manifest.groups.clone(),
        default_group: manifest.default_group.clone(),
    }
}

/// Persist a manifest to its own path, atomically.
pub fn save(manifest: &Manifest) -> Result<()> {
    let path = manifest.manifest_path();
    let text = serde_yaml::to_string(&to_doc(manifest))
        .map_err(|err| Error::invalid_config(format!("failed to serialize manifest: {}", err)))?;

    let temp_path = path.with_extension("yml.tmp");
    let mut file = fs::File::create(&temp_path)
        .map_err(|err| Error::io(format!("creating {}", temp_path.display()), err))?;
    file.write_all(text.as_bytes())
        .map_err(|err| Error::io(format!("writing {}", temp_path.display()), err))?;
    file.sync_all()
        .map_err(|err| Error::io(format!("syncing {}", temp_path.display()), err))?;

    fs::rename(&temp_path, &path)
        .map_err(|err| Error::io(format!("renaming to {}", path.display()), err))
}

/// Match a directory entry against the recognized filenames.
fn manifest_file_in(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;

    let mut by_lower = BTreeMap::new();
    for entry in entries.flatten() {
        let actual = entry.file_name();
        by_lower.insert(actual.to_string_lossy().to_lowercase(), actual);
    }

    for filename in MANIFEST_FILENAMES {
        for candidate in [filename.to_string(), format!(".{}", filename)] {
            if let Some(actual) = by_lower.get(&candidate) {
                return Some(dir.join(actual));
            }
        }
    }
    None
}
