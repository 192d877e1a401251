//! PSW Protocol - the contract between Control and Presentation
//!
//! Two closed message sets, one per direction:
//! - [`UiRequest`]: Presentation asks Control for state, applies edits, or
//!   opens a scenario
//! - [`ControlEvent`]: Control pushes full state snapshots and advisory
//!   status updates
//!
//! Messages cross a process boundary as JSON strings; the typed enums and
//! the wire helpers here are the entire vocabulary. There is no free-form
//! payload.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod messages;
pub mod snapshot;
pub mod wire;

// Re-exports for convenience
pub use messages::{ControlEvent, UiRequest};
pub use snapshot::{PhaseGroup, ScenarioSummary, SettingsSnapshot, StateSnapshot};
pub use wire::{decode_event, decode_request, encode_event, encode_request, ProtocolError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
