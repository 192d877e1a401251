//! Message variants for each direction of the channel

use crate::snapshot::StateSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Presentation → Control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UiRequest {
    /// Trigger a full Scan + Resolve + Push cycle
    RequestInitialState,
    /// Apply accumulated edits, then re-sync from ground truth
    ApplyChanges {
        /// Desired enablement per scenario name
        desired: BTreeMap<String, bool>,
    },
    /// Reveal one scenario's descriptor via the host collaborator
    OpenScenario { name: String },
}

/// Control → Presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ControlEvent {
    /// Full replace of the presentation baseline; exactly one per
    /// completed scan cycle
    StateSnapshot(StateSnapshot),
    /// Advisory progress line; `enable_controls` is a hint the UI
    /// intersects with its own visibility settings
    #[serde(rename_all = "camelCase")]
    StatusUpdate {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enable_controls: Option<bool>,
    },
}
