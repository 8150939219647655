//! core::manifest
//!
//! The root aggregate: storage location, declared and locked source lists,
//! named groups, resolver mode - and the resolution engine that walks them.
//!
//! # Resolution engine
//!
//! [`Manifest::install_dependencies`] merges declared and locked sources,
//! filters them by requested names or groups, materializes each survivor,
//! and recurses into nested manifests discovered inside freshly installed
//! directories. Flat resolver modes funnel every level into one shared
//! storage directory and use the [`ResolutionContext`] to detect
//! irreconcilable version conflicts between same-named sources.
//!
//! [`Manifest::lock_dependencies`] records the revisions actually on disk
//! back into the locked list, replace-or-append by name.
//!
//! Failures unwind the whole recursive walk; partial progress already
//! written to disk stays in place.

use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};
use crate::core::resolver::{Registration, ResolutionContext, ResolverMode};
use crate::core::source::{self, SourceEntry, SourceStatus, UpdateOptions};
use crate::core::store;
use crate::ui::output::{self, Verbosity};

/// Default directory, under the manifest root, where sources land.
pub const DEFAULT_LOCATION: &str = "gitman_sources";

/// A named, reusable subset of source names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Selector name
    pub name: String,
    /// Source names this group expands to
    pub members: Vec<String>,
}

/// Which source list a resolution starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Only the locked list, verbatim (may be empty).
    Locked,
    /// Only the declared list.
    Declared,
    /// The locked list when non-empty, else the declared list.
    PreferLocked,
}

/// Flags for one install/update call.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Requested source or group names; empty selects the default group
    /// (or everything).
    pub names: Vec<String>,
    /// Maximum recursion depth; `None` is unbounded, `Some(0)` a no-op.
    pub depth: Option<usize>,
    /// Update run: prefer declared sources over locked ones.
    pub update: bool,
    /// Propagate update semantics into nested manifests.
    pub recurse: bool,
    /// Overwrite local changes and rebuild invalid trees.
    pub force: bool,
    /// Ask per dirty source instead of failing.
    pub force_interactive: bool,
    /// Always fetch, even when the tree already points at the revision.
    pub fetch: bool,
    /// Also remove untracked and ignored files.
    pub clean: bool,
    /// Leave dirty sources alone instead of failing.
    pub skip_changes: bool,
    /// Do not fall back to the default group when no names are given.
    pub skip_default_group: bool,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

impl Default for InstallOptions {
    fn default() -> Self {
        InstallOptions {
            names: Vec::new(),
            depth: None,
            update: false,
            recurse: false,
            force: false,
            force_interactive: false,
            fetch: false,
            clean: false,
            skip_changes: false,
            skip_default_group: false,
            verbosity: Verbosity::Normal,
        }
    }
}

impl InstallOptions {
    fn update_options(&self) -> UpdateOptions {
        UpdateOptions {
            force: self.force,
            force_interactive: self.force_interactive,
            fetch: self.fetch,
            clean: self.clean,
            skip_changes: self.skip_changes,
            verbosity: self.verbosity,
        }
    }
}

/// A project's dependency manifest, anchored at an absolute root.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Absolute path anchoring all relative paths.
    pub root: PathBuf,
    /// File name the manifest was loaded from (or will be saved to).
    pub filename: String,
    /// Directory under `root` where sources are materialized.
    pub location: String,
    /// Strategy for nested dependency trees.
    pub resolver: ResolverMode,
    /// Declared (desired) sources.
    pub sources: Vec<SourceEntry>,
    /// Last resolved (pinned) sources; `rev` is a concrete hash.
    pub sources_locked: Vec<SourceEntry>,
    /// Named subsets of source names.
    pub groups: Vec<Group>,
    /// Group implicitly selected when no names are requested.
    pub default_group: Option<String>,
}

impl Manifest {
    /// An empty manifest rooted at `root`.
    pub fn new(root: PathBuf, filename: impl Into<String>) -> Self {
        Manifest {
            root,
            filename: filename.into(),
            location: DEFAULT_LOCATION.to_string(),
            resolver: ResolverMode::default(),
            sources: Vec::new(),
            sources_locked: Vec::new(),
            groups: Vec::new(),
            default_group: None,
        }
    }

    /// Absolute path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.filename)
    }

    /// Absolute path of the storage directory.
    pub fn location_path(&self) -> PathBuf {
        self.root.join(&self.location)
    }

    /// Check manifest invariants.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for an empty repo, a missing name, a
    /// duplicated name, or a name shared between a source and a group.
    pub fn validate(&self) -> Result<()> {
        if self.location.is_empty() {
            return Err(Error::invalid_config("`location` must not be empty"));
        }

        for list in [&self.sources, &self.sources_locked] {
            let mut seen = BTreeSet::new();
            for entry in list {
                if entry.repo.is_empty() {
                    return Err(Error::invalid_config(format!(
                        "source '{}' has no repo",
                        entry.name
                    )));
                }
                if entry.name.is_empty() {
                    return Err(Error::invalid_config(format!(
                        "source for {} has no name",
                        entry.repo
                    )));
                }
                if !seen.insert(&entry.name) {
                    return Err(Error::invalid_config(format!(
                        "duplicate source name '{}'",
                        entry.name
                    )));
                }
            }
        }

        for group in &self.groups {
            let taken = self
                .sources
                .iter()
                .chain(&self.sources_locked)
                .any(|entry| entry.name == group.name);
            if taken {
                return Err(Error::invalid_config(format!(
                    "'{}' is both a source name and a group name",
                    group.name
                )));
            }
        }

        Ok(())
    }

    /// Merge the declared and locked source lists.
    ///
    /// In non-[`SourceMode::Locked`] modes, entries present in the other
    /// list but absent by name from the chosen one are appended as extras
    /// so nothing declared is silently dropped - unless suppressed, which
    /// the flat-recursion gather does to keep candidate sets minimal.
    pub fn merged_sources(&self, mode: SourceMode, include_extras: bool) -> Vec<SourceEntry> {
        let (chosen, other) = match mode {
            SourceMode::Locked => return self.sources_locked.clone(),
            SourceMode::Declared => (&self.sources, &self.sources_locked),
            SourceMode::PreferLocked => {
                if self.sources_locked.is_empty() {
                    (&self.sources, &self.sources_locked)
                } else {
                    (&self.sources_locked, &self.sources)
                }
            }
        };

        let mut merged = chosen.clone();
        if include_extras {
            for extra in other {
                if !merged.iter().any(|entry| entry.name == extra.name) {
                    merged.push(extra.clone());
                }
            }
        }
        merged
    }

    /// Build the selector set for a request.
    ///
    /// Explicit names are matched against groups (expanded to members) and
    /// sources; with no names, the default group applies unless skipped,
    /// and with nothing requested at all the selector covers every source.
    /// Names matching neither are returned separately - they force the
    /// overall count for the call to zero.
    fn source_filter(
        &self,
        names: &[String],
        sources: &[SourceEntry],
        skip_default_group: bool,
    ) -> (BTreeSet<String>, Vec<String>) {
        let mut requested: Vec<&str> = names.iter().map(String::as_str).collect();
        if requested.is_empty() && !skip_default_group {
            if let Some(group) = &self.default_group {
                requested.push(group);
            }
        }

        let mut selected = BTreeSet::new();
        let mut unmatched = Vec::new();

        for name in &requested {
            let mut matched = false;
            if let Some(group) = self.groups.iter().find(|group| group.name == *name) {
                selected.extend(group.members.iter().cloned());
                matched = true;
            }
            if sources.iter().any(|entry| entry.name == *name) {
                selected.insert((*name).to_string());
                matched = true;
            }
            if !matched {
                unmatched.push((*name).to_string());
            }
        }

        if requested.is_empty() {
            selected = sources.iter().map(|entry| entry.name.clone()).collect();
        }

        (selected, unmatched)
    }

    /// Materialize the requested sources, recursing into nested manifests.
    ///
    /// Returns the count of sources materialized in this call and all
    /// recursive sub-calls. Requested names that match nothing are reported
    /// and force a zero result, even if other sources were installed.
    pub fn install_dependencies(
        &self,
        ctx: &mut ResolutionContext,
        opts: &InstallOptions,
    ) -> Result<usize> {
        self.install_at(
            ctx,
            opts,
            &opts.names,
            opts.depth,
            self.resolver,
            None,
            opts.update,
            0,
        )
    }

    /// One level of the install walk.
    ///
    /// `mode` is the top-level manifest's resolver and governs the whole
    /// walk; `flat_dir` is the shared storage directory forced onto nested
    /// levels in flat modes; `update` carries update semantics, which only
    /// propagate downward when `recurse` was requested.
    #[allow(clippy::too_many_arguments)]
    fn install_at(
        &self,
        ctx: &mut ResolutionContext,
        opts: &InstallOptions,
        names: &[String],
        depth: Option<usize>,
        mode: ResolverMode,
        flat_dir: Option<&Path>,
        update: bool,
        indent: usize,
    ) -> Result<usize> {
        if depth == Some(0) {
            return Ok(0);
        }

        let source_mode = if update {
            SourceMode::Declared
        } else {
            SourceMode::PreferLocked
        };
        let sources = self.merged_sources(source_mode, true);
        if sources.is_empty() {
            return Ok(0);
        }

        let (mut selected, unmatched) =
            self.source_filter(names, &sources, opts.skip_default_group);

        let location = flat_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.location_path());

        if mode.is_flat() {
            let mut candidates = sources.clone();
            candidates.extend(self.gather_flat_candidates(&location, &sources)?);
            for candidate in &candidates {
                match ctx.register(candidate) {
                    Registration::New | Registration::Satisfied => {}
                    Registration::Conflict(winner) => {
                        if update {
                            return Err(Error::invalid_config(format!(
                                "conflicting versions for '{}': {} @ {} vs {} @ {}",
                                candidate.name,
                                winner.repo,
                                winner.rev,
                                candidate.repo,
                                candidate.rev
                            )));
                        }
                        // Install-from-lock: the first-registered occurrence
                        // wins and the duplicate is silently dropped.
                        selected.remove(&candidate.name);
                    }
                }
            }
        }

        let verb = if update { "Updating" } else { "Installing" };
        let mut count = 0;

        for entry in &sources {
            if !selected.contains(&entry.name) {
                continue;
            }
            if mode.is_flat() && ctx.is_processed(&entry.name) {
                continue;
            }

            let dir = location.join(&entry.name);
            output::message(
                format!("{} '{}' @ {}...", verb, entry.name, entry.rev),
                indent,
                opts.verbosity,
            );

            if !entry.update_files(&dir, &opts.update_options())? {
                continue;
            }
            entry.create_link(&self.root, &dir, opts.force)?;
            entry.run_scripts(&dir, opts.force, opts.verbosity)?;
            ctx.mark_processed(&entry.name);
            count += 1;

            if mode == ResolverMode::FlatWithNestedLinks {
                // Keep the per-level layout discoverable: the source's
                // original nested location points into the flattened copy.
                let home = self.location_path().join(&entry.name);
                if home != dir {
                    source::create_symlink(&dir, &home, true)?;
                }
            }

            let next_depth = depth.map(|d| d.saturating_sub(1));
            if next_depth != Some(0) {
                if let Some(nested) = store::load_single(&dir)? {
                    output::debug(
                        format!("found nested manifest in '{}'", entry.name),
                        opts.verbosity,
                    );
                    let nested_flat = mode.is_flat().then_some(location.as_path());
                    count += nested.install_at(
                        ctx,
                        opts,
                        &[],
                        next_depth,
                        mode,
                        nested_flat,
                        update && opts.recurse,
                        indent + 1,
                    )?;
                }
            }
        }

        if !unmatched.is_empty() {
            for name in &unmatched {
                output::error(format!("no such source or group: {}", name));
            }
            return Ok(0);
        }
        Ok(count)
    }

    /// Collect sources declared by nested manifests already present under
    /// `location`, without installing anything. Extras are suppressed so
    /// each nested manifest contributes exactly its resolved list.
    fn gather_flat_candidates(
        &self,
        location: &Path,
        seeds: &[SourceEntry],
    ) -> Result<Vec<SourceEntry>> {
        let mut queue: VecDeque<String> = seeds.iter().map(|entry| entry.name.clone()).collect();
        let mut visited = BTreeSet::new();
        let mut gathered = Vec::new();

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let dir = location.join(&name);
            if !dir.is_dir() {
                continue;
            }
            let Some(nested) = store::load_single(&dir)? else {
                continue;
            };
            for candidate in nested.merged_sources(SourceMode::PreferLocked, false) {
                queue.push_back(candidate.name.clone());
                gathered.push(candidate);
            }
        }

        Ok(gathered)
    }

    /// Record the revisions actually on disk into the locked list.
    ///
    /// Entries are replaced or appended by name. Returns the number of
    /// entries (re)locked.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRepository`] if the storage directory does not
    ///   exist at all, or a selected source was never installed
    /// - [`Error::UncommittedChanges`] for a dirty source without
    ///   `skip_changes`
    pub fn lock_dependencies(
        &mut self,
        names: &[String],
        obey_existing: bool,
        skip_changes: bool,
        verbosity: Verbosity,
    ) -> Result<usize> {
        let location = self.location_path();
        if !location.is_dir() {
            return Err(Error::InvalidRepository { path: location });
        }

        let source_mode = if obey_existing {
            SourceMode::PreferLocked
        } else {
            SourceMode::Declared
        };
        let mut sources = self.merged_sources(source_mode, true);

        if self.resolver.is_flat() {
            let gathered = self.gather_flat_candidates(&location, &sources)?;
            for candidate in gathered {
                if !sources.iter().any(|entry| entry.name == candidate.name) {
                    sources.push(candidate);
                }
            }
        }

        let (selected, unmatched) = self.source_filter(names, &sources, false);

        let mut count = 0;
        for entry in &sources {
            if !selected.contains(&entry.name) {
                continue;
            }

            let dir = location.join(&entry.name);
            let status = entry.identify(&dir, true, false)?;
            if status.revision == source::REVISION_DIRTY {
                if skip_changes {
                    output::warn(
                        format!("skipped locking '{}': uncommitted changes", entry.name),
                        verbosity,
                    );
                    continue;
                }
                return Err(Error::UncommittedChanges {
                    message: format!("uncommitted changes in {}", dir.display()),
                });
            }

            output::message(
                format!("Locking '{}' at {}", entry.name, status.revision),
                0,
                verbosity,
            );
            let locked = entry.lock(&dir, Some(status.revision))?;
            match self
                .sources_locked
                .iter()
                .position(|existing| existing.name == locked.name)
            {
                Some(index) => self.sources_locked[index] = locked,
                None => self.sources_locked.push(locked),
            }
            count += 1;
        }

        if !unmatched.is_empty() {
            for name in &unmatched {
                output::error(format!("no such source or group: {}", name));
            }
            return Ok(0);
        }
        Ok(count)
    }

    /// Report every dependency's working tree, depth-first.
    ///
    /// Missing directories yield marker statuses; dirty trees yield the
    /// dirty marker when `allow_dirty`, and an error otherwise.
    pub fn get_dependencies(
        &self,
        depth: Option<usize>,
        allow_dirty: bool,
    ) -> Result<Vec<SourceStatus>> {
        let mut statuses = Vec::new();
        self.dependencies_at(depth, allow_dirty, &mut statuses)?;
        Ok(statuses)
    }

    fn dependencies_at(
        &self,
        depth: Option<usize>,
        allow_dirty: bool,
        out: &mut Vec<SourceStatus>,
    ) -> Result<()> {
        if depth == Some(0) {
            return Ok(());
        }

        let location = self.location_path();
        for entry in self.merged_sources(SourceMode::PreferLocked, true) {
            let dir = location.join(&entry.name);
            out.push(entry.identify(&dir, allow_dirty, true)?);

            let next_depth = depth.map(|d| d.saturating_sub(1));
            if next_depth != Some(0) && dir.is_dir() {
                if let Some(nested) = store::load_single(&dir)? {
                    nested.dependencies_at(next_depth, allow_dirty, out)?;
                }
            }
        }
        Ok(())
    }

    /// Remove the storage directory (or, with `keep_location`, only its
    /// contents).
    ///
    /// # Errors
    ///
    /// [`Error::UncommittedChanges`] if any source is dirty and `force` was
    /// not given - uninstall never discards work silently.
    pub fn uninstall_dependencies(&self, force: bool, keep_location: bool) -> Result<()> {
        let location = self.location_path();
        if !location.exists() {
            return Ok(());
        }

        if !force {
            for entry in self.merged_sources(SourceMode::PreferLocked, true) {
                let dir = location.join(&entry.name);
                let driver = entry.vcs.driver();
                if dir.is_dir() && driver.valid(&dir) && driver.changes(&dir, false) {
                    return Err(Error::UncommittedChanges {
                        message: format!("uncommitted changes in {}", dir.display()),
                    });
                }
            }
        }

        if keep_location {
            self.clean_dependencies()
        } else {
            fs::remove_dir_all(&location)
                .map_err(|err| Error::io(format!("removing {}", location.display()), err))
        }
    }

    /// Remove the storage directory's top-level entries, leaving the
    /// container itself in place.
    pub fn clean_dependencies(&self) -> Result<()> {
        let location = self.location_path();
        if !location.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&location)
            .map_err(|err| Error::io(format!("reading {}", location.display()), err))?;
        for entry in entries {
            let entry = entry.map_err(|err| Error::io("reading storage directory", err))?;
            let path = entry.path();
            source::remove_path(&path)
                .map_err(|err| Error::io(format!("removing {}", path.display()), err))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, rev: &str) -> SourceEntry {
        SourceEntry::new(format!("https://example.com/org/{}", name), name, rev)
    }

    fn manifest(root: &Path) -> Manifest {
        Manifest::new(root.to_path_buf(), "gitman.yml")
    }

    mod merging {
        use super::*;

        #[test]
        fn prefer_locked_uses_declared_when_no_locks_exist() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];

            let merged = m.merged_sources(SourceMode::PreferLocked, true);
            assert_eq!(merged.len(), 1);
            assert_eq!(merged[0].rev, "main");
        }

        #[test]
        fn prefer_locked_uses_locks_when_present() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];
            m.sources_locked = vec![entry("a", "abc123")];

            let merged = m.merged_sources(SourceMode::PreferLocked, true);
            assert_eq!(merged.len(), 1);
            assert_eq!(merged[0].rev, "abc123");
        }

        #[test]
        fn extras_from_the_other_list_are_appended() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main"), entry("b", "main")];
            m.sources_locked = vec![entry("a", "abc123")];

            // locked wins, but the never-locked 'b' is not dropped
            let merged = m.merged_sources(SourceMode::PreferLocked, true);
            let names: Vec<_> = merged.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, ["a", "b"]);
            assert_eq!(merged[0].rev, "abc123");

            // suppressing extras keeps exactly the chosen list
            let merged = m.merged_sources(SourceMode::PreferLocked, false);
            assert_eq!(merged.len(), 1);
        }

        #[test]
        fn locked_mode_is_verbatim_even_when_empty() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];

            assert!(m.merged_sources(SourceMode::Locked, true).is_empty());
        }

        #[test]
        fn declared_mode_ignores_locked_revisions() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];
            m.sources_locked = vec![entry("a", "abc123"), entry("old", "def456")];

            let merged = m.merged_sources(SourceMode::Declared, true);
            assert_eq!(merged[0].rev, "main");
            // the stale lock entry still shows up as an extra
            assert_eq!(merged[1].name, "old");
        }
    }

    mod filtering {
        use super::*;

        fn fixture(root: &Path) -> Manifest {
            let mut m = manifest(root);
            m.sources = vec![entry("a", "main"), entry("b", "main"), entry("c", "main")];
            m.groups = vec![Group {
                name: "backend".to_string(),
                members: vec!["a".to_string(), "b".to_string()],
            }];
            m
        }

        #[test]
        fn no_names_selects_everything() {
            let temp = TempDir::new().unwrap();
            let m = fixture(temp.path());
            let sources = m.merged_sources(SourceMode::Declared, true);

            let (selected, unmatched) = m.source_filter(&[], &sources, false);
            assert_eq!(selected.len(), 3);
            assert!(unmatched.is_empty());
        }

        #[test]
        fn group_names_expand_to_members() {
            let temp = TempDir::new().unwrap();
            let m = fixture(temp.path());
            let sources = m.merged_sources(SourceMode::Declared, true);

            let (selected, unmatched) =
                m.source_filter(&["backend".to_string()], &sources, false);
            let names: Vec<_> = selected.iter().map(String::as_str).collect();
            assert_eq!(names, ["a", "b"]);
            assert!(unmatched.is_empty());
        }

        #[test]
        fn default_group_applies_only_without_names() {
            let temp = TempDir::new().unwrap();
            let mut m = fixture(temp.path());
            m.default_group = Some("backend".to_string());
            let sources = m.merged_sources(SourceMode::Declared, true);

            let (selected, _) = m.source_filter(&[], &sources, false);
            assert_eq!(selected.len(), 2);

            let (selected, _) = m.source_filter(&["c".to_string()], &sources, false);
            let names: Vec<_> = selected.iter().map(String::as_str).collect();
            assert_eq!(names, ["c"]);

            // explicitly skipping the default group selects everything
            let (selected, _) = m.source_filter(&[], &sources, true);
            assert_eq!(selected.len(), 3);
        }

        #[test]
        fn unknown_names_are_reported() {
            let temp = TempDir::new().unwrap();
            let m = fixture(temp.path());
            let sources = m.merged_sources(SourceMode::Declared, true);

            let (selected, unmatched) =
                m.source_filter(&["a".to_string(), "nope".to_string()], &sources, false);
            let names: Vec<_> = selected.iter().map(String::as_str).collect();
            assert_eq!(names, ["a"]);
            assert_eq!(unmatched, vec!["nope".to_string()]);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn source_and_group_may_not_share_a_name() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];
            m.groups = vec![Group {
                name: "a".to_string(),
                members: vec!["a".to_string()],
            }];

            let err = m.validate().unwrap_err();
            assert!(err.to_string().contains("both a source name and a group name"));
        }

        #[test]
        fn duplicate_source_names_are_rejected() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main"), entry("a", "v1.0")];

            assert!(m.validate().is_err());
        }

        #[test]
        fn sources_need_a_repo() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![SourceEntry::new("", "a", "main")];

            assert!(m.validate().is_err());
        }

        #[test]
        fn a_well_formed_manifest_passes() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];
            m.groups = vec![Group {
                name: "all".to_string(),
                members: vec!["a".to_string()],
            }];

            m.validate().unwrap();
        }
    }

    mod walking {
        use super::*;
        use crate::core::resolver::ResolutionContext;

        #[test]
        fn depth_zero_is_a_guarded_no_op() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];

            let mut ctx = ResolutionContext::new();
            let opts = InstallOptions {
                depth: Some(0),
                verbosity: Verbosity::Quiet,
                ..InstallOptions::default()
            };

            let count = m.install_dependencies(&mut ctx, &opts).unwrap();
            assert_eq!(count, 0);
            // no storage directory was created
            assert!(!m.location_path().exists());
        }

        #[test]
        fn unmatched_names_force_a_zero_count() {
            let temp = TempDir::new().unwrap();
            let mut m = manifest(temp.path());
            m.sources = vec![entry("a", "main")];

            let mut ctx = ResolutionContext::new();
            let opts = InstallOptions {
                names: vec!["nope".to_string()],
                verbosity: Verbosity::Quiet,
                ..InstallOptions::default()
            };

            let count = m.install_dependencies(&mut ctx, &opts).unwrap();
            assert_eq!(count, 0);
        }

        #[test]
        fn an_empty_manifest_installs_nothing() {
            let temp = TempDir::new().unwrap();
            let m = manifest(temp.path());

            let mut ctx = ResolutionContext::new();
            let opts = InstallOptions {
                verbosity: Verbosity::Quiet,
                ..InstallOptions::default()
            };

            assert_eq!(m.install_dependencies(&mut ctx, &opts).unwrap(), 0);
        }
    }

    mod removal {
        use super::*;

        #[test]
        fn uninstall_removes_the_whole_storage_directory() {
            let temp = TempDir::new().unwrap();
            let m = manifest(temp.path());
            let location = m.location_path();
            fs::create_dir_all(location.join("a")).unwrap();
            fs::write(location.join("a/file.txt"), "x").unwrap();

            m.uninstall_dependencies(true, false).unwrap();
            assert!(!location.exists());
        }

        #[test]
        fn clean_keeps_the_container() {
            let temp = TempDir::new().unwrap();
            let m = manifest(temp.path());
            let location = m.location_path();
            fs::create_dir_all(location.join("a")).unwrap();
            fs::write(location.join("stray.txt"), "x").unwrap();

            m.uninstall_dependencies(true, true).unwrap();
            assert!(location.exists());
            assert_eq!(fs::read_dir(&location).unwrap().count(), 0);
        }

        #[test]
        fn uninstall_of_nothing_is_fine() {
            let temp = TempDir::new().unwrap();
            let m = manifest(temp.path());
            m.uninstall_dependencies(false, false).unwrap();
        }
    }

    #[test]
    fn lock_fails_without_a_storage_directory() {
        let temp = TempDir::new().unwrap();
        let mut m = manifest(temp.path());
        m.sources = vec![entry("a", "main")];

        let err = m
            .lock_dependencies(&[], false, false, Verbosity::Quiet)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRepository { .. }));
    }
}
