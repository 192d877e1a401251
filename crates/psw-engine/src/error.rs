//! Error types for the filesystem engine
//!
//! Two deliberately small taxonomies:
//! - `ScanError`: the only fatal scan outcome (the walk itself failed);
//!   per-file problems are logged and skipped, never escalated
//! - `TransitionError`: one marker move failing, always contained to its
//!   batch item

use std::path::PathBuf;

/// Fatal scanner failure
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Enumerating candidate descriptor files failed
    #[error("failed to enumerate scenario tree under {root:?}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// One marker-directory move failing
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// Destination parent directory could not be created
    #[error("failed to prepare destination parent {path:?}")]
    CreateParent {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An already-present destination could not be replaced
    #[error("failed to replace existing destination {path:?}")]
    ReplaceDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The move itself failed
    #[error("failed to move marker from {from:?} to {to:?}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
