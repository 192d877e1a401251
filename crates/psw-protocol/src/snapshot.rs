//! Full-state snapshot payloads
//!
//! A snapshot is the sole authority for rebuilding the presentation side's
//! baseline: phase-grouped scenario summaries, resolved states by name,
//! the settings relevant to visibility, accumulated scan warnings, and an
//! optional fatal-scan error.

use psw_scenario::EnablementState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Projected summary of one scenario
///
/// Presentation never receives raw records; placement and source paths
/// stay on the control side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    /// Scenario name, the identity key
    pub name: String,
    /// Declared default state
    pub default_enabled: bool,
    /// Declared ordering within the phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

/// One phase's scenarios, already sorted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseGroup {
    /// Phase name
    pub name: String,
    /// Scenarios in declared order (absent order last, name breaks ties)
    pub scenarios: Vec<ScenarioSummary>,
}

/// Feature-visibility settings relevant to the presentation side
///
/// Control always computes and pushes full state; these flags only gate
/// which UI sections are interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    /// Whether the phase-switching section is interactive
    pub phase_feature_enabled: bool,
    /// Whether the assembly section is interactive
    pub assembly_feature_enabled: bool,
}

impl Default for SettingsSnapshot {
    fn default() -> Self {
        Self {
            phase_feature_enabled: true,
            assembly_feature_enabled: false,
        }
    }
}

/// Full replace of Presentation's baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Scenario summaries grouped by phase, phases in name order
    pub phases: Vec<PhaseGroup>,
    /// Resolved tri-state per scenario name
    pub states: BTreeMap<String, EnablementState>,
    /// Visibility settings
    pub settings: SettingsSnapshot,
    /// Human-readable scan warnings (duplicates, placement fallbacks)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Set when the scan itself failed; the rest of the snapshot is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StateSnapshot {
    /// Snapshot for a failed scan cycle
    #[must_use]
    pub fn failed(settings: SettingsSnapshot, error: impl Into<String>) -> Self {
        Self {
            phases: Vec::new(),
            states: BTreeMap::new(),
            settings,
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Total number of scenarios across all phases
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.phases.iter().map(|p| p.scenarios.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_snapshot_is_empty_apart_from_error() {
        let snapshot = StateSnapshot::failed(SettingsSnapshot::default(), "walk failed");

        assert!(snapshot.phases.is_empty());
        assert!(snapshot.states.is_empty());
        assert_eq!(snapshot.error.as_deref(), Some("walk failed"));
        assert_eq!(snapshot.scenario_count(), 0);
    }

    #[test]
    fn scenario_count_sums_phases() {
        let snapshot = StateSnapshot {
            phases: vec![
                PhaseGroup {
                    name: "Phase 1".to_string(),
                    scenarios: vec![
                        ScenarioSummary {
                            name: "A".to_string(),
                            default_enabled: true,
                            sort_order: Some(1),
                        },
                        ScenarioSummary {
                            name: "B".to_string(),
                            default_enabled: false,
                            sort_order: None,
                        },
                    ],
                },
                PhaseGroup {
                    name: "Phase 2".to_string(),
                    scenarios: vec![ScenarioSummary {
                        name: "C".to_string(),
                        default_enabled: false,
                        sort_order: None,
                    }],
                },
            ],
            states: BTreeMap::new(),
            settings: SettingsSnapshot::default(),
            warnings: Vec::new(),
            error: None,
        };

        assert_eq!(snapshot.scenario_count(), 3);
    }
}
