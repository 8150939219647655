//! Gitman - a language-agnostic dependency manager for git repositories
//!
//! Gitman materializes a declarative manifest of named git sources into a
//! version-pinned directory tree, recursing into manifests discovered inside
//! already-installed dependencies, and re-locks the resolved state so an
//! installation can be reproduced exactly.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Manifest, source entries, and the resolution engine
//! - [`git`] - Single interface for all version-control operations
//! - [`shell`] - External command execution with explicit working directories
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! Gitman maintains the following invariants:
//!
//! 1. Resolution state (registered and processed sources) is scoped to one
//!    top-level engine call and threaded explicitly through recursion
//! 2. Every driver and shell operation takes its working directory as an
//!    explicit parameter; the process working directory is never mutated
//! 3. Locking never mutates a source entry in place
//! 4. Local work is never discarded without an explicit force flag

pub mod cli;
pub mod core;
pub mod git;
pub mod shell;
pub mod ui;
