//! PSW Scenario - data model for the scenario index
//!
//! Defines the types shared by the scanning/state subsystem:
//! - Scenario records and the per-scan index
//! - Tri-state enablement derived from marker probes
//! - Scan warnings surfaced to the presentation side
//! - The tagged-line descriptor reader
//!
//! This crate is pure: it never touches the filesystem. Reading descriptor
//! text and probing marker directories belong to `psw-engine`.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod descriptor;
pub mod types;

// Re-exports for convenience
pub use descriptor::{classify_line, DescriptorLine, DescriptorScan};
pub use types::{EnablementState, ScanWarning, ScenarioIndex, ScenarioRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
