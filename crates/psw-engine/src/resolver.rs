//! Enablement state resolution
//!
//! Per record, the resolver probes the enabled-side marker first, then the
//! disabled-side marker. A missing path is the expected case for half the
//! records and never an error. Resolutions for different records run
//! concurrently; they touch disjoint keys of the output map.

use crate::layout::TreeLayout;
use futures::future;
use psw_scenario::{EnablementState, ScenarioIndex, ScenarioRecord};
use std::collections::BTreeMap;
use std::path::Path;

/// Resolve the enablement state of every indexed scenario
pub async fn resolve_states(
    index: &ScenarioIndex,
    layout: &TreeLayout,
) -> BTreeMap<String, EnablementState> {
    let probes = index.records().map(|record| async move {
        let state = resolve_record(record, layout).await;
        (record.name.clone(), state)
    });
    future::join_all(probes).await.into_iter().collect()
}

/// Resolve one scenario's state with a fresh pair of probes
pub async fn resolve_record(record: &ScenarioRecord, layout: &TreeLayout) -> EnablementState {
    let enabled = path_exists(&layout.enabled_marker(record)).await;
    let disabled = path_exists(&layout.disabled_marker(record)).await;
    match (enabled, disabled) {
        (true, true) => {
            // Corrupt or partially-applied state; the enabled side wins
            // because it probes first
            tracing::warn!(
                scenario = %record.name,
                "markers present on both sides, preferring enabled"
            );
            EnablementState::Enabled
        }
        (true, false) => EnablementState::Enabled,
        (false, true) => EnablementState::Disabled,
        (false, false) => EnablementState::Indeterminate,
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
