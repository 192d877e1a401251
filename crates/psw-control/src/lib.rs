//! PSW Control - the authoritative side of the switcher
//!
//! Owns the scanner, resolver and transition engine, and runs the
//! synchronization protocol against a presentation surface:
//! - at most one scan or apply cycle in flight, guarded by an explicit
//!   `Idle | Scanning | Applying` state
//! - exactly one state snapshot per completed scan cycle
//! - apply always composes with a forced re-scan, so the UI observes
//!   ground truth rather than its own optimistic edits
//!
//! # Example
//!
//! ```rust,ignore
//! use psw_control::{Controller, LoggingOpener, SwitcherConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SwitcherConfig::new("/w/scenarios", "/w/on", "/w/off");
//! config.validate()?;
//! let (controller, channels) = Controller::new(config, LoggingOpener);
//! tokio::spawn(controller.run());
//! // channels.requests / channels.events now speak the wire protocol
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod opener;

// Re-exports for convenience
pub use config::{FeatureToggles, SwitcherConfig};
pub use controller::{ControlChannels, Controller, CyclePhase};
pub use error::{ConfigError, ControlError};
pub use opener::{LoggingOpener, ScenarioOpener};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
