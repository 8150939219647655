//! Shared fixtures for integration tests.
//!
//! Tests build real git repositories in temp directories by running the
//! `git` binary, then exercise the engine against manifests that point at
//! them via filesystem paths.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use gitman::core::manifest::Manifest;
use gitman::core::store;

/// Run git in `dir`, panicking on failure.
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// An upstream repository dependencies are cloned from.
pub struct UpstreamRepo {
    dir: TempDir,
}

impl UpstreamRepo {
    /// Create a repository on branch `main` with one initial commit.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        let repo = Self { dir };
        repo.commit_file("README.md", "# Upstream\n", "Initial commit");
        repo
    }

    /// The path clones use as the remote URL.
    pub fn url(&self) -> String {
        self.dir.path().display().to_string()
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file and commit it, returning the new HEAD hash.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        fs::write(self.dir.path().join(path), content).unwrap();
        run_git(self.dir.path(), &["add", path]);
        run_git(self.dir.path(), &["commit", "-m", message]);
        self.head()
    }

    /// The current HEAD hash.
    pub fn head(&self) -> String {
        run_git(self.dir.path(), &["rev-parse", "HEAD"])
    }

    /// Tag the current HEAD.
    pub fn tag(&self, name: &str) {
        run_git(self.dir.path(), &["tag", name]);
    }
}

/// A project directory holding a manifest under test.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        // Keep the shared mirror cache out of test runs.
        std::env::set_var("GITMAN_CACHE_DISABLE", "1");
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the manifest document verbatim.
    pub fn write_manifest(&self, yaml: &str) {
        fs::write(self.dir.path().join("gitman.yml"), yaml).unwrap();
    }

    /// Load the manifest back through the store.
    pub fn manifest(&self) -> Manifest {
        store::load(self.dir.path(), false)
            .expect("failed to load manifest")
            .expect("no manifest in project")
    }

    /// Path of an installed source in the default storage directory.
    pub fn source_dir(&self, name: &str) -> PathBuf {
        self.dir.path().join("gitman_sources").join(name)
    }
}

/// Whether `rev` looks like a full commit hash.
pub fn is_full_hash(rev: &str) -> bool {
    rev.len() == 40 && rev.chars().all(|c| c.is_ascii_hexdigit())
}
