//! core::errors
//!
//! Error taxonomy for manifest resolution and source materialization.
//!
//! # Categories
//!
//! - [`Error::InvalidConfig`]: malformed or self-contradictory manifest -
//!   always fatal, never retried
//! - [`Error::InvalidRepository`]: a directory that should hold a valid
//!   working tree does not - fatal unless the caller forces a rebuild
//! - [`Error::UncommittedChanges`]: local work would be overwritten -
//!   recoverable by re-running with a force flag
//! - [`Error::ScriptFailure`]: a post-install script exited non-zero -
//!   recoverable the same way
//! - [`Error::Shell`]: any other external command failure
//!
//! The resolution engine never catches these; they unwind the whole
//! recursive call stack and are rendered once at the command boundary,
//! together with the remediation hint from [`Error::hint`].

use std::path::PathBuf;

use thiserror::Error;

use crate::shell::ShellError;

/// Errors from manifest resolution and source materialization.
#[derive(Debug, Error)]
pub enum Error {
    /// The manifest is malformed or self-contradictory.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the manifest
        message: String,
    },

    /// A required working tree is missing or not a valid repository.
    #[error("not a valid repository: {}", path.display())]
    InvalidRepository {
        /// The directory that was checked
        path: PathBuf,
    },

    /// Local work would be overwritten.
    #[error("uncommitted changes: {message}")]
    UncommittedChanges {
        /// What is dirty or occupied
        message: String,
    },

    /// A post-install script exited non-zero.
    #[error("script failed: `{command}`\n{output}")]
    ScriptFailure {
        /// The script string as configured
        command: String,
        /// Captured combined output
        output: String,
    },

    /// An external command failed for a reason not otherwise classified.
    #[error(transparent)]
    Shell(#[from] ShellError),

    /// A filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted
        context: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build an [`Error::InvalidConfig`] from anything displayable.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// Build an [`Error::Io`] with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// The flag that would let the failed command succeed, if one exists.
    ///
    /// Shown to the user once, at the outermost command boundary.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::InvalidConfig { .. } => None,
            Error::InvalidRepository { .. } => {
                Some("run again with --force to rebuild the working tree")
            }
            Error::UncommittedChanges { .. } => {
                Some("run again with --force to overwrite local changes, or --skip-changes to leave them alone")
            }
            Error::ScriptFailure { .. } => Some("run again with --force to ignore script failures"),
            Error::Shell(_) | Error::Io { .. } => None,
        }
    }
}

/// Result alias used throughout the core and git layers.
pub type Result<T> = std::result::Result<T, Error>;
