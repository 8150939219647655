//! git
//!
//! Single interface for all version-control operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to version control. Every repository
//! read and write the engine performs flows through the [`VcsDriver`] trait.
//! No other module launches `git` directly.
//!
//! The driver is selected once, from the [`VcsKind`] tag carried by each
//! source entry - never by string comparison at call sites. Git is the only
//! kind today; the tag exists so another kind can be added without touching
//! the engine.
//!
//! # Invariants
//!
//! - Every operation takes its working directory as an explicit parameter
//! - Query operations (`get_branch`, `get_tag`) yield `None` when not
//!   applicable (detached HEAD, untagged commit) instead of failing
//! - The process working directory is never changed

mod driver;

pub use driver::GitCli;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Supported version-control kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    /// Plain git, driven through the system `git` binary.
    #[default]
    Git,
}

impl VcsKind {
    /// The driver for this kind.
    pub fn driver(self) -> Box<dyn VcsDriver> {
        match self {
            VcsKind::Git => Box::new(GitCli::from_env()),
        }
    }

    /// Whether this is the default kind (used to omit it from saved
    /// manifests).
    pub fn is_default(&self) -> bool {
        *self == VcsKind::Git
    }
}

/// Stateless operations the resolution engine needs from a working tree.
///
/// Network and mutation operations return typed errors; the read-only
/// queries at the bottom tolerate "not applicable" by yielding an absent
/// result rather than failing the whole command.
pub trait VcsDriver {
    /// Materialize a new working tree for `repo` at `dir`.
    ///
    /// Uses a shared local mirror cache (when enabled) so sources with the
    /// same remote share network and disk cost, and restricts the checkout
    /// to `sparse_paths` when patterns are given. `rev` is a hint only; the
    /// caller checks out the exact revision afterwards.
    fn clone_repo(&self, repo: &str, dir: &Path, rev: &str, sparse_paths: &[String]) -> Result<()>;

    /// Repair an existing-but-invalid working tree in place: re-initialize
    /// it and re-point its `origin` remote at `repo`.
    fn rebuild(&self, dir: &Path, repo: &str) -> Result<()>;

    /// Update remote tracking refs.
    ///
    /// Full 40-character hashes and `@{...}` expressions cannot be fetched
    /// directly and are omitted from the command.
    fn fetch(&self, dir: &Path, repo: &str, rev: &str) -> Result<()>;

    /// Whether `dir` is inside a working tree *and* is its top level.
    fn valid(&self, dir: &Path) -> bool;

    /// Whether the tree has uncommitted (or, if requested, untracked)
    /// changes.
    fn changes(&self, dir: &Path, include_untracked: bool) -> bool;

    /// Move the working tree to `rev`: stash, optionally clean, check out
    /// the resolved revision by force, set upstream tracking, and optionally
    /// pull fast-forward-only.
    fn update(&self, dir: &Path, repo: &str, rev: &str, clean: bool, fetch: bool) -> Result<()>;

    /// The `origin` remote URL.
    fn get_url(&self, dir: &Path) -> Result<String>;

    /// The full hash of `HEAD`.
    fn get_hash(&self, dir: &Path) -> Result<String>;

    /// The current branch name, or `None` on a detached HEAD.
    fn get_branch(&self, dir: &Path) -> Option<String>;

    /// The tag pointing exactly at `HEAD`, or `None`.
    fn get_tag(&self, dir: &Path) -> Option<String>;
}
