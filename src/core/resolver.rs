//! core::resolver
//!
//! Resolution strategy and per-run bookkeeping.
//!
//! # Resolver modes
//!
//! [`ResolverMode`] governs whether nested manifests install into their own
//! sub-directory beneath their parent (nested) or are flattened into the
//! top-level storage directory (flat variants).
//!
//! # Resolution context
//!
//! [`ResolutionContext`] holds the state of exactly one top-level engine
//! call: which source names have been registered with which identity
//! (conflict detection) and which have already been materialized (dedup).
//! It is owned by the top-level call and passed by mutable reference into
//! every recursive call - never stored on the manifest, never persisted.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::errors::{Error, Result};
use crate::core::source::SourceEntry;

/// Strategy for placing nested dependency trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverMode {
    /// Each nested manifest installs into its own sub-directory.
    #[default]
    Nested,
    /// Every source, at any depth, lands in the top-level storage
    /// directory; duplicate names must agree on repo and rev.
    Flat,
    /// Flat placement, plus a symlink at each source's original nested
    /// location pointing back into the flattened copy.
    FlatWithNestedLinks,
}

impl ResolverMode {
    /// Parse a manifest `resolver` value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] for anything but the known mode names.
    pub fn parse(text: &str) -> Result<Self> {
        match text {
            "" | "nested" => Ok(ResolverMode::Nested),
            "flat" => Ok(ResolverMode::Flat),
            "flat-with-nested-links" => Ok(ResolverMode::FlatWithNestedLinks),
            other => Err(Error::invalid_config(format!(
                "unknown resolver mode `{}` (expected `nested`, `flat`, or `flat-with-nested-links`)",
                other
            ))),
        }
    }

    /// The manifest document spelling of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ResolverMode::Nested => "nested",
            ResolverMode::Flat => "flat",
            ResolverMode::FlatWithNestedLinks => "flat-with-nested-links",
        }
    }

    /// Whether sources from every depth share one storage directory.
    pub fn is_flat(self) -> bool {
        !matches!(self, ResolverMode::Nested)
    }
}

/// The repo/rev pair a source name was first registered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    /// Remote repository identifier
    pub repo: String,
    /// Revision spec
    pub rev: String,
}

/// Outcome of registering one source occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First occurrence of this name in the run.
    New,
    /// Same name, identical repo and rev - already satisfied.
    Satisfied,
    /// Same name, different repo or rev; carries the winning identity.
    Conflict(SourceIdentity),
}

/// Bookkeeping for one top-level install/update/lock call.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    registered: BTreeMap<String, SourceIdentity>,
    processed: BTreeSet<String>,
}

impl ResolutionContext {
    /// Fresh context for one engine call.
    pub fn new() -> Self {
        ResolutionContext::default()
    }

    /// Register an occurrence of `source`, detecting identity conflicts.
    ///
    /// The first occurrence of a name becomes the canonical version for the
    /// whole run; later occurrences either match it exactly or conflict.
    pub fn register(&mut self, source: &SourceEntry) -> Registration {
        match self.registered.get(&source.name) {
            None => {
                self.registered.insert(
                    source.name.clone(),
                    SourceIdentity {
                        repo: source.repo.clone(),
                        rev: source.rev.clone(),
                    },
                );
                Registration::New
            }
            Some(existing) if existing.repo == source.repo && existing.rev == source.rev => {
                Registration::Satisfied
            }
            Some(existing) => Registration::Conflict(existing.clone()),
        }
    }

    /// Whether `name` was already materialized during this run.
    pub fn is_processed(&self, name: &str) -> bool {
        self.processed.contains(name)
    }

    /// Record that `name` was materialized during this run.
    pub fn mark_processed(&mut self, name: &str) {
        self.processed.insert(name.to_string());
    }
}
