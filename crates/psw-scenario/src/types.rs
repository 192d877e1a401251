//! Core types for the scenario index
//!
//! Defines the fundamental types of the discovery subsystem:
//! - Scenario records and their placement metadata
//! - The name-keyed index built fresh on every scan
//! - Tri-state enablement
//! - Non-fatal scan warnings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One discovered scenario
///
/// Built by the scanner from a single descriptor file. The record is
/// ephemeral: it lives for one scan cycle and is replaced wholesale by the
/// next scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRecord {
    /// Unique identity key, from the descriptor's name line
    pub name: String,
    /// Phase (UI tab) this scenario is grouped under
    pub phase_name: String,
    /// Declared default state; false when the marker is absent
    pub default_enabled: bool,
    /// Declared ordering within a phase; `None` sorts last
    pub sort_order: Option<i64>,
    /// Descriptor file this record was scraped from; read-only here
    pub source_location: PathBuf,
    /// Containing folder relative to the scan root; the key for all
    /// marker-directory moves
    pub relative_placement: PathBuf,
}

impl ScenarioRecord {
    /// Create a record with the two required identity fields and placement
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        phase_name: impl Into<String>,
        source_location: impl Into<PathBuf>,
        relative_placement: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            phase_name: phase_name.into(),
            default_enabled: false,
            sort_order: None,
            source_location: source_location.into(),
            relative_placement: relative_placement.into(),
        }
    }

    /// With declared default state
    #[inline]
    #[must_use]
    pub fn with_default_enabled(mut self, default_enabled: bool) -> Self {
        self.default_enabled = default_enabled;
        self
    }

    /// With declared ordering within the phase
    #[inline]
    #[must_use]
    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Ordering key within a phase: declared order first (absent order
    /// sorts last), name breaks ties
    #[inline]
    #[must_use]
    pub fn phase_sort_key(&self) -> (i64, &str) {
        (self.sort_order.unwrap_or(i64::MAX), &self.name)
    }
}

/// Tri-state enablement of one scenario
///
/// Derived, never stored: computed by probing the enabled-side and
/// disabled-side marker paths. `Indeterminate` means neither marker exists;
/// the UI treats it as unavailable but logs distinguish it from `Disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnablementState {
    /// Marker present under the enabled root
    Enabled,
    /// Marker present under the disabled root
    Disabled,
    /// Neither marker exists
    Indeterminate,
}

impl EnablementState {
    /// Whether the scenario can be toggled at all
    #[inline]
    #[must_use]
    pub fn is_available(self) -> bool {
        !matches!(self, Self::Indeterminate)
    }

    /// Collapse to a boolean; `None` for `Indeterminate`
    #[inline]
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Enabled => Some(true),
            Self::Disabled => Some(false),
            Self::Indeterminate => None,
        }
    }
}

/// Non-fatal finding from a scan
///
/// Warnings ride on the index and are serialized into the state snapshot,
/// so the presentation side sees them rather than only the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScanWarning {
    /// Two descriptor files declared the same scenario name; the later
    /// discovery won
    DuplicateName {
        name: String,
        kept: PathBuf,
        replaced: PathBuf,
    },
    /// Descriptor lies outside the scan root; placement fell back to a
    /// workspace-relative path
    PlacementOutsideRoot { name: String, placement: PathBuf },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName {
                name,
                kept,
                replaced,
            } => write!(
                f,
                "duplicate scenario name \"{}\": {} replaces {}",
                name,
                kept.display(),
                replaced.display()
            ),
            Self::PlacementOutsideRoot { name, placement } => write!(
                f,
                "scenario \"{}\" lies outside the scan root; using placement {}",
                name,
                placement.display()
            ),
        }
    }
}

/// Mapping from scenario name to record, built fresh on every scan
///
/// The previous index is discarded wholesale; there is no incremental
/// merge. Owned exclusively by the control side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioIndex {
    records: BTreeMap<String, ScenarioRecord>,
    warnings: Vec<ScanWarning>,
}

impl ScenarioIndex {
    /// Create an empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, last write wins
    ///
    /// A duplicate name is recorded as a [`ScanWarning::DuplicateName`] and
    /// the previous record is returned.
    pub fn insert(&mut self, record: ScenarioRecord) -> Option<ScenarioRecord> {
        let kept = record.source_location.clone();
        let name = record.name.clone();
        let previous = self.records.insert(record.name.clone(), record);
        if let Some(ref prev) = previous {
            self.warnings.push(ScanWarning::DuplicateName {
                name,
                kept,
                replaced: prev.source_location.clone(),
            });
        }
        previous
    }

    /// Look up a record by scenario name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScenarioRecord> {
        self.records.get(name)
    }

    /// Whether a scenario name is present
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of indexed scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in name order
    pub fn records(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.values()
    }

    /// Warnings accumulated while building this index
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Attach a warning produced outside `insert`
    #[inline]
    pub fn push_warning(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }

    /// Group records by phase name
    ///
    /// Phases come out in name order; within a phase, records are sorted by
    /// declared order (absent order last), then by name.
    #[must_use]
    pub fn by_phase(&self) -> BTreeMap<&str, Vec<&ScenarioRecord>> {
        let mut phases: BTreeMap<&str, Vec<&ScenarioRecord>> = BTreeMap::new();
        for record in self.records.values() {
            phases.entry(&record.phase_name).or_default().push(record);
        }
        for group in phases.values_mut() {
            group.sort_by_key(|r| r.phase_sort_key());
        }
        phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, phase: &str) -> ScenarioRecord {
        ScenarioRecord::new(
            name,
            phase,
            format!("/work/scenarios/{name}/scenario.yaml"),
            name,
        )
    }

    #[test]
    fn enablement_state_as_bool() {
        assert_eq!(EnablementState::Enabled.as_bool(), Some(true));
        assert_eq!(EnablementState::Disabled.as_bool(), Some(false));
        assert_eq!(EnablementState::Indeterminate.as_bool(), None);
    }

    #[test]
    fn enablement_state_availability() {
        assert!(EnablementState::Enabled.is_available());
        assert!(EnablementState::Disabled.is_available());
        assert!(!EnablementState::Indeterminate.is_available());
    }

    #[test]
    fn index_insert_and_lookup() {
        let mut index = ScenarioIndex::new();
        index.insert(record("Smoke", "Phase 1"));

        assert_eq!(index.len(), 1);
        assert!(index.contains("Smoke"));
        assert!(index.get("Missing").is_none());
        assert_eq!(index.get("Smoke").map(|r| r.phase_name.as_str()), Some("Phase 1"));
    }

    #[test]
    fn index_duplicate_name_keeps_last_and_warns() {
        let mut index = ScenarioIndex::new();
        let first = ScenarioRecord::new("Smoke", "Phase 1", "/a/scenario.yaml", "a");
        let second = ScenarioRecord::new("Smoke", "Phase 2", "/b/scenario.yaml", "b");

        assert!(index.insert(first).is_none());
        let replaced = index.insert(second).expect("duplicate returns previous");

        assert_eq!(replaced.phase_name, "Phase 1");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Smoke").map(|r| r.phase_name.as_str()), Some("Phase 2"));
        assert_eq!(index.warnings().len(), 1);
        assert!(matches!(
            &index.warnings()[0],
            ScanWarning::DuplicateName { name, .. } if name == "Smoke"
        ));
    }

    #[test]
    fn phase_sort_key_orders_missing_order_last() {
        let with_order = record("B", "P").with_sort_order(5);
        let without_order = record("A", "P");

        assert!(with_order.phase_sort_key() < without_order.phase_sort_key());
    }

    #[test]
    fn by_phase_groups_and_sorts() {
        let mut index = ScenarioIndex::new();
        index.insert(record("Zeta", "Phase 2"));
        index.insert(record("Late", "Phase 1"));
        index.insert(record("Early", "Phase 1").with_sort_order(1));
        index.insert(record("Middle", "Phase 1").with_sort_order(2));

        let phases = index.by_phase();
        let names: Vec<&str> = phases["Phase 1"].iter().map(|r| r.name.as_str()).collect();

        assert_eq!(phases.len(), 2);
        assert_eq!(names, vec!["Early", "Middle", "Late"]);
        assert_eq!(phases["Phase 2"].len(), 1);
    }

    #[test]
    fn scan_warning_display_is_human_readable() {
        let warning = ScanWarning::DuplicateName {
            name: "Smoke".to_string(),
            kept: PathBuf::from("/b/scenario.yaml"),
            replaced: PathBuf::from("/a/scenario.yaml"),
        };

        let text = warning.to_string();
        assert!(text.contains("duplicate scenario name"));
        assert!(text.contains("Smoke"));
    }
}
