//! The state mirror and its bulk operations

use psw_protocol::{ControlEvent, PhaseGroup, SettingsSnapshot, StateSnapshot};
use psw_scenario::EnablementState;
use std::collections::BTreeMap;

/// Counts of pending edits, split by direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingSummary {
    /// Items currently off that the user wants on
    pub to_enable: usize,
    /// Items currently on that the user wants off
    pub to_disable: usize,
}

impl PendingSummary {
    /// Total number of dirty items
    #[inline]
    #[must_use]
    pub fn total(self) -> usize {
        self.to_enable + self.to_disable
    }
}

impl std::fmt::Display for PendingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to enable, {} to disable", self.to_enable, self.to_disable)
    }
}

/// Presentation-side cache of initial vs. edited vs. default state
///
/// Unavailable items (indeterminate at sync time) are kept in `initial`
/// for rendering but excluded from `current`, so no edit or bulk
/// operation can ever touch them.
#[derive(Debug, Clone, Default)]
pub struct StateMirror {
    phases: Vec<PhaseGroup>,
    initial: BTreeMap<String, EnablementState>,
    current: BTreeMap<String, bool>,
    defaults: BTreeMap<String, bool>,
    settings: SettingsSnapshot,
    warnings: Vec<String>,
    last_error: Option<String>,
    last_status: String,
    controls_hint: bool,
}

impl StateMirror {
    /// Create an empty mirror awaiting its first snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one control event into the mirror
    pub fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::StateSnapshot(snapshot) => self.load_snapshot(snapshot),
            ControlEvent::StatusUpdate {
                text,
                enable_controls,
            } => {
                self.last_status = text;
                if let Some(hint) = enable_controls {
                    self.controls_hint = hint;
                }
            }
        }
    }

    /// Replace the baseline with a fresh snapshot
    ///
    /// Unconfirmed edits are discarded: after apply-changes the user has
    /// already committed them, and the snapshot is ground truth.
    pub fn load_snapshot(&mut self, snapshot: StateSnapshot) {
        if !self.current.is_empty() && self.dirty_count() > 0 {
            tracing::debug!(
                dropped_edits = self.dirty_count(),
                "snapshot replaces baseline, discarding unconfirmed edits"
            );
        }
        self.defaults = snapshot
            .phases
            .iter()
            .flat_map(|phase| &phase.scenarios)
            .map(|s| (s.name.clone(), s.default_enabled))
            .collect();
        self.current = snapshot
            .states
            .iter()
            .filter_map(|(name, state)| state.as_bool().map(|on| (name.clone(), on)))
            .collect();
        self.initial = snapshot.states;
        self.phases = snapshot.phases;
        self.settings = snapshot.settings;
        self.warnings = snapshot.warnings;
        self.last_error = snapshot.error;
    }

    /// Whether an item exists and can be toggled
    #[must_use]
    pub fn is_eligible(&self, name: &str) -> bool {
        self.initial
            .get(name)
            .is_some_and(|state| state.is_available())
    }

    /// Record one user edit; refused for unavailable items
    pub fn set_desired(&mut self, name: &str, enabled: bool) -> bool {
        if !self.is_eligible(name) {
            tracing::debug!(scenario = %name, "edit ignored for unavailable scenario");
            return false;
        }
        self.current.insert(name.to_string(), enabled);
        true
    }

    /// Current desired value of one item
    #[must_use]
    pub fn current(&self, name: &str) -> Option<bool> {
        self.current.get(name).copied()
    }

    /// Number of items whose desired state differs from the baseline
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty().count()
    }

    /// Pending edits split by direction
    #[must_use]
    pub fn pending_summary(&self) -> PendingSummary {
        let mut summary = PendingSummary::default();
        for (_, enabled) in self.dirty() {
            if enabled {
                summary.to_enable += 1;
            } else {
                summary.to_disable += 1;
            }
        }
        summary
    }

    /// The dirty subset, ready to send as a desired-state map
    #[must_use]
    pub fn desired_changes(&self) -> BTreeMap<String, bool> {
        self.dirty()
            .map(|(name, enabled)| (name.to_string(), enabled))
            .collect()
    }

    /// Flip every eligible item: if any is currently off, all go on;
    /// otherwise all go off
    pub fn toggle_all(&mut self) {
        let names: Vec<String> = self.current.keys().cloned().collect();
        self.bulk_toggle(names);
    }

    /// Same rule, restricted to one displayed phase group
    pub fn toggle_phase(&mut self, phase: &str) {
        let names: Vec<String> = self
            .phases
            .iter()
            .filter(|group| group.name == phase)
            .flat_map(|group| &group.scenarios)
            .filter(|s| self.current.contains_key(&s.name))
            .map(|s| s.name.clone())
            .collect();
        self.bulk_toggle(names);
    }

    /// Copy declared defaults into the desired state of eligible items
    pub fn reset_to_defaults(&mut self) {
        let updates: Vec<(String, bool)> = self
            .current
            .keys()
            .filter_map(|name| self.defaults.get(name).map(|&d| (name.clone(), d)))
            .collect();
        for (name, enabled) in updates {
            self.current.insert(name, enabled);
        }
    }

    /// The UI's own enablement policy: the control hint intersected with
    /// feature visibility
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        self.controls_hint && self.settings.phase_feature_enabled
    }

    /// Phase groups as pushed by the last snapshot
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &[PhaseGroup] {
        &self.phases
    }

    /// Settings as pushed by the last snapshot
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SettingsSnapshot {
        &self.settings
    }

    /// Warnings carried by the last snapshot
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Fatal-scan error carried by the last snapshot, if any
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Latest advisory status line
    #[inline]
    #[must_use]
    pub fn last_status(&self) -> &str {
        &self.last_status
    }

    fn dirty(&self) -> impl Iterator<Item = (&str, bool)> {
        self.current.iter().filter_map(|(name, &enabled)| {
            let baseline = self.initial.get(name).and_then(|s| s.as_bool());
            (baseline != Some(enabled)).then_some((name.as_str(), enabled))
        })
    }

    fn bulk_toggle(&mut self, names: Vec<String>) {
        // Single pass over the majority rule: any off means the bulk
        // target is on
        let target = names
            .iter()
            .any(|name| self.current.get(name) == Some(&false));
        for name in names {
            self.current.insert(name, target);
        }
    }
}
