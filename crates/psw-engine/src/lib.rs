//! PSW Engine - the filesystem side of the phase switcher
//!
//! Three cooperating pieces:
//! - Scanner: walks the scan root, reads descriptor files, builds a fresh
//!   [`psw_scenario::ScenarioIndex`]
//! - Resolver: probes the two parallel root trees to classify each
//!   scenario's enablement, concurrently
//! - Transition engine: moves marker directories between the trees,
//!   tolerating per-item failures without aborting the batch
//!
//! The engine assumes it is the sole writer of the two root trees for the
//! lifetime of the process; concurrent external modification surfaces as
//! ordinary per-item move errors.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod layout;
pub mod resolver;
pub mod scanner;
pub mod transition;

// Re-exports for convenience
pub use error::{ScanError, TransitionError};
pub use layout::TreeLayout;
pub use resolver::{resolve_record, resolve_states};
pub use scanner::scan_scenarios;
pub use transition::{apply_desired_state, BatchResult, ItemFailure};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
