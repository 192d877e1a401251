//! Error types for the control side

use std::path::PathBuf;

/// Control loop failure
///
/// Per-cycle problems (scan failures, per-item apply errors) are protocol
/// payloads, not errors of the loop itself; the loop only fails when its
/// counterpart goes away.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// The presentation side dropped its event channel
    #[error("presentation side disconnected")]
    PresentationDisconnected,
}

/// Configuration problems
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Marker segment is empty or not a single path segment
    #[error("marker segment must be a single non-empty path segment")]
    InvalidMarkerSegment,

    /// Descriptor extension is empty or carries a leading dot
    #[error("descriptor extension must be non-empty, without a leading dot")]
    InvalidDescriptorExtension,

    /// The two root trees point at the same directory
    #[error("enabled and disabled roots must differ")]
    IdenticalRoots,
}
