//! core::source
//!
//! One declared dependency: identity, revision spec, optional symlink, and
//! post-install scripts, with the lifecycle that materializes it against a
//! working directory.
//!
//! # Lifecycle
//!
//! `absent -> cloned -> valid -> clean|dirty -> at target revision`
//!
//! - [`SourceEntry::update_files`] walks the whole chain
//! - [`SourceEntry::create_link`] places the optional symlink
//! - [`SourceEntry::run_scripts`] runs the post-install hooks
//! - [`SourceEntry::identify`] reports where the working tree actually is
//! - [`SourceEntry::lock`] captures the current state as a new pinned entry
//!
//! # Identity
//!
//! Two entries are the same dependency iff their names match; `repo` and
//! `rev` never participate in equality or ordering.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::git::VcsKind;
use crate::shell;
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts;

/// Revision marker for a working tree with local modifications.
pub const REVISION_DIRTY: &str = "<dirty>";
/// Revision/url marker for information that cannot be determined.
pub const REVISION_UNKNOWN: &str = "<unknown>";
/// Path marker for a dependency that has not been installed.
pub const PATH_MISSING: &str = "<missing>";

fn default_rev() -> String {
    "main".to_string()
}

/// One external source repository declared in a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Remote repository identifier. Required, non-empty.
    pub repo: String,

    /// Unique name within one manifest; doubles as the directory name.
    /// Inferred from the repo URL when omitted in the document.
    #[serde(default)]
    pub name: String,

    /// Revision spec: branch, tag, full hash, or `branch@{timestamp}`.
    #[serde(default = "default_rev")]
    pub rev: String,

    /// Version-control kind; selects the driver once, at use time.
    #[serde(default, rename = "type", skip_serializing_if = "VcsKind::is_default")]
    pub vcs: VcsKind,

    /// Optional path, relative to the manifest root, at which a symlink to
    /// the working tree is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Shell commands run after checkout, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<String>,

    /// Sparse-checkout patterns; empty means a full checkout.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sparse_paths: Vec<String>,
}

/// Where a dependency's working tree is and what it points at.
///
/// `url` and `revision` fall back to the marker strings when the
/// information cannot be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    /// Absolute path of the working tree (or [`PATH_MISSING`])
    pub path: String,
    /// Remote URL (or [`REVISION_UNKNOWN`])
    pub url: String,
    /// Commit hash, [`REVISION_DIRTY`], or [`REVISION_UNKNOWN`]
    pub revision: String,
}

/// Flags controlling one materialization pass.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOptions {
    /// Overwrite local changes and rebuild invalid trees
    pub force: bool,
    /// Ask per dirty source instead of failing
    pub force_interactive: bool,
    /// Always fetch, even when the tree already points at the revision
    pub fetch: bool,
    /// Also remove untracked and ignored files
    pub clean: bool,
    /// Leave dirty sources alone instead of failing
    pub skip_changes: bool,
    /// Output verbosity
    pub verbosity: Verbosity,
}

impl SourceEntry {
    /// Create an entry with defaults for everything but the remote.
    pub fn new(repo: impl Into<String>, name: impl Into<String>, rev: impl Into<String>) -> Self {
        SourceEntry {
            repo: repo.into(),
            name: name.into(),
            rev: rev.into(),
            vcs: VcsKind::default(),
            link: None,
            scripts: Vec::new(),
            sparse_paths: Vec::new(),
        }
    }

    /// Infer a source name from the last path segment of a repo URL.
    ///
    /// Handles scheme URLs, scp-like `git@host:path` remotes, and plain
    /// filesystem paths; a `.git` suffix is stripped.
    pub fn infer_name(repo: &str) -> String {
        let tail = repo
            .trim_end_matches('/')
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(repo);
        tail.trim_end_matches(".git").to_string()
    }

    /// Bring the working tree at `dir` to the configured revision.
    ///
    /// Returns `false` when the source was deliberately left alone (dirty
    /// tree with `skip_changes`), `true` when the tree was materialized.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRepository`] if `dir` exists but is not a working
    ///   tree and `force` was not given
    /// - [`Error::UncommittedChanges`] if the tree is dirty and no
    ///   force/skip flag authorizes proceeding
    pub fn update_files(&self, dir: &Path, opts: &UpdateOptions) -> Result<bool> {
        let driver = self.vcs.driver();
        let mut fetch = opts.fetch;

        if !dir.exists() {
            driver.clone_repo(&self.repo, dir, &self.rev, &self.sparse_paths)?;
        }

        if !driver.valid(dir) {
            if opts.force {
                driver.rebuild(dir, &self.repo)?;
                fetch = true;
            } else {
                return Err(Error::InvalidRepository {
                    path: dir.to_path_buf(),
                });
            }
        }

        if !opts.force && driver.changes(dir, opts.clean) {
            if opts.skip_changes {
                output::warn(
                    format!(
                        "skipped '{}': uncommitted changes in {}",
                        self.name,
                        dir.display()
                    ),
                    opts.verbosity,
                );
                return Ok(false);
            }

            let overwrite = opts.force_interactive
                && prompts::confirm(&format!(
                    "Overwrite uncommitted changes in '{}' ({})?",
                    self.name,
                    dir.display()
                ));
            if !overwrite {
                return Err(Error::UncommittedChanges {
                    message: format!("uncommitted changes in {}", dir.display()),
                });
            }
        }

        // Fetch avoidance: a tree already pointing at the revision needs no
        // network round trip.
        let at_rev = !fetch && {
            let mut current = Vec::new();
            current.extend(driver.get_branch(dir));
            current.extend(driver.get_hash(dir).ok());
            current.extend(driver.get_tag(dir));
            current.iter().any(|rev| *rev == self.rev)
        };
        if fetch || !at_rev {
            driver.fetch(dir, &self.repo, &self.rev)?;
        }

        driver.update(dir, &self.repo, &self.rev, opts.clean, fetch)?;
        Ok(true)
    }

    /// Create the configured symlink under `root`, pointing at `dir`.
    ///
    /// No-op when no link is configured. An occupied path is replaced under
    /// `force` and rejected otherwise.
    pub fn create_link(&self, root: &Path, dir: &Path, force: bool) -> Result<()> {
        let Some(link) = &self.link else {
            return Ok(());
        };

        let link_path = root.join(link);
        create_symlink(dir, &link_path, force)
    }

    /// Run the configured scripts in `dir`, in order.
    ///
    /// A non-zero exit is [`Error::ScriptFailure`] unless `force` is set, in
    /// which case the failure is reported and the remaining scripts run.
    pub fn run_scripts(&self, dir: &Path, force: bool, verbosity: Verbosity) -> Result<()> {
        for script in &self.scripts {
            output::debug(format!("running in {}: {}", dir.display(), script), verbosity);
            match shell::run_script(dir, script) {
                Ok(script_output) => {
                    if !script_output.is_empty() {
                        output::debug(script_output, verbosity);
                    }
                }
                Err(err) => {
                    if force {
                        output::warn(
                            format!("script failed in '{}': {}", self.name, err),
                            verbosity,
                        );
                    } else {
                        return Err(Error::ScriptFailure {
                            command: script.clone(),
                            output: err.output,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Report where the working tree at `dir` is and what it points at.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRepository`] if the directory is missing (unless
    ///   `allow_missing`) or is not a valid working tree
    /// - [`Error::UncommittedChanges`] if the tree is dirty and
    ///   `allow_dirty` is false
    pub fn identify(&self, dir: &Path, allow_dirty: bool, allow_missing: bool) -> Result<SourceStatus> {
        let driver = self.vcs.driver();

        if !dir.is_dir() {
            if allow_missing {
                return Ok(SourceStatus {
                    path: PATH_MISSING.to_string(),
                    url: REVISION_UNKNOWN.to_string(),
                    revision: REVISION_UNKNOWN.to_string(),
                });
            }
            return Err(Error::InvalidRepository {
                path: dir.to_path_buf(),
            });
        }

        if !driver.valid(dir) {
            return Err(Error::InvalidRepository {
                path: dir.to_path_buf(),
            });
        }

        let path = dir.display().to_string();
        let url = driver.get_url(dir)?;

        if driver.changes(dir, false) {
            if allow_dirty {
                return Ok(SourceStatus {
                    path,
                    url,
                    revision: REVISION_DIRTY.to_string(),
                });
            }
            return Err(Error::UncommittedChanges {
                message: format!("uncommitted changes in {}", dir.display()),
            });
        }

        Ok(SourceStatus {
            path,
            url,
            revision: driver.get_hash(dir)?,
        })
    }

    /// Return a new entry pinned to a concrete revision.
    ///
    /// With no `rev` given, the working tree at `dir` must exist and be
    /// clean - locking a dirty or missing dependency fails loudly. The
    /// original entry is never mutated.
    pub fn lock(&self, dir: &Path, rev: Option<String>) -> Result<SourceEntry> {
        let rev = match rev {
            Some(rev) => rev,
            None => self.identify(dir, false, false)?.revision,
        };

        Ok(SourceEntry {
            rev,
            ..self.clone()
        })
    }
}

impl PartialEq for SourceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SourceEntry {}

impl PartialOrd for SourceEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// Create a symlink at `link_path` pointing at `target` via a relative path.
///
/// The relative path is computed from the link's parent directory. An
/// occupied path is removed under `force`; otherwise it is a
/// preexisting-location conflict.
pub(crate) fn create_symlink(target: &Path, link_path: &Path, force: bool) -> Result<()> {
    if fs::symlink_metadata(link_path).is_ok() {
        if !force {
            return Err(Error::UncommittedChanges {
                message: format!("preexisting location at {}", link_path.display()),
            });
        }
        remove_path(link_path)
            .map_err(|err| Error::io(format!("removing {}", link_path.display()), err))?;
    }

    let parent = match link_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io(format!("creating {}", parent.display()), err))?;
            parent
        }
        _ => Path::new("."),
    };

    let relative = pathdiff::diff_paths(target, parent).unwrap_or_else(|| target.to_path_buf());
    symlink_dir(&relative, link_path)
        .map_err(|err| Error::io(format!("linking {}", link_path.display()), err))
}

pub(crate) fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.file_type().is_symlink() {
        #[cfg(windows)]
        {
            return fs::remove_dir(path).or_else(|_| fs::remove_file(path));
        }
        #[cfg(not(windows))]
        {
            return fs::remove_file(path);
        }
    }
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
