//! PSW Mirror - the presentation side's view of scenario state
//!
//! Keeps three maps per scenario: `initial` (state at last sync),
//! `current` (live user edits) and `defaults` (declared defaults), and
//! derives everything the UI needs from them: dirty count, a pending
//! change summary, and the bulk toggle operations.
//!
//! `current` is only ever mutated by explicit user action or by a full
//! re-sync; a fresh snapshot always replaces the baseline wholesale and
//! reinitializes `current` from it.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod mirror;

// Re-exports for convenience
pub use mirror::{PendingSummary, StateMirror};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
