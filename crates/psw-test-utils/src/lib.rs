//! Testing utilities for the PSW workspace
//!
//! Builds scenario trees on a tempdir: descriptor files under a scan root
//! plus marker directories under the enabled/disabled roots.

#![allow(missing_docs)]

use psw_engine::TreeLayout;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Which side of the parallel trees a fixture scenario's marker sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSide {
    Enabled,
    Disabled,
    /// No marker on either side (resolves as indeterminate)
    Missing,
}

/// One scenario to materialize in a fixture tree
#[derive(Debug, Clone)]
pub struct FixtureScenario {
    pub name: String,
    pub phase: String,
    pub placement: String,
    pub default_enabled: bool,
    pub order: Option<i64>,
    pub side: FixtureSide,
}

impl FixtureScenario {
    pub fn new(name: &str, phase: &str) -> Self {
        Self {
            name: name.to_string(),
            phase: phase.to_string(),
            placement: name.to_string(),
            default_enabled: false,
            order: None,
            side: FixtureSide::Missing,
        }
    }

    pub fn with_placement(mut self, placement: &str) -> Self {
        self.placement = placement.to_string();
        self
    }

    pub fn with_default_enabled(mut self, default_enabled: bool) -> Self {
        self.default_enabled = default_enabled;
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn enabled(mut self) -> Self {
        self.side = FixtureSide::Enabled;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.side = FixtureSide::Disabled;
        self
    }
}

/// Descriptor text in the contracted tagged-line shape
pub fn descriptor_text(scenario: &FixtureScenario) -> String {
    let mut text = String::new();
    text.push_str(&format!("# PhaseSwitcher_Tab: {}\n", scenario.phase));
    text.push_str(&format!(
        "# PhaseSwitcher_Default: {}\n",
        scenario.default_enabled
    ));
    if let Some(order) = scenario.order {
        text.push_str(&format!("# PhaseSwitcher_OrderOnTab: {order}\n"));
    }
    text.push_str(&format!("Имя: \"{}\"\n", scenario.name));
    text.push_str("steps:\n  - пусть будет шаг\n");
    text
}

/// A materialized scenario tree on a tempdir
///
/// `scenarios/` holds descriptors, `enabled/` and `disabled/` are the two
/// parallel marker trees. Dropping the value removes everything.
#[derive(Debug)]
pub struct ScenarioTree {
    root: TempDir,
    pub layout: TreeLayout,
}

impl ScenarioTree {
    /// Build a tree containing the given scenarios
    pub fn build(scenarios: &[FixtureScenario]) -> Self {
        let root = TempDir::new().expect("create fixture tempdir");
        let scan_root = root.path().join("scenarios");
        let enabled_root = root.path().join("enabled");
        let disabled_root = root.path().join("disabled");
        for dir in [&scan_root, &enabled_root, &disabled_root] {
            fs::create_dir_all(dir).expect("create fixture roots");
        }
        let layout = TreeLayout::new(&scan_root, &enabled_root, &disabled_root)
            .with_workspace_root(root.path());

        let tree = Self { root, layout };
        for scenario in scenarios {
            tree.add_scenario(scenario);
        }
        tree
    }

    /// Add one more scenario to an existing tree
    pub fn add_scenario(&self, scenario: &FixtureScenario) {
        let folder = self.layout.scan_root.join(&scenario.placement);
        fs::create_dir_all(&folder).expect("create scenario folder");
        fs::write(
            folder.join("scenario.yaml"),
            descriptor_text(scenario),
        )
        .expect("write descriptor");

        let marker_root = match scenario.side {
            FixtureSide::Enabled => &self.layout.enabled_root,
            FixtureSide::Disabled => &self.layout.disabled_root,
            FixtureSide::Missing => return,
        };
        let marker = marker_root
            .join(&scenario.placement)
            .join(&self.layout.marker_segment);
        fs::create_dir_all(&marker).expect("create marker dir");
        // A marker dir is never empty in the wild
        fs::write(marker.join("case.txt"), "payload\n").expect("write marker payload");
    }

    /// Write an arbitrary file relative to the scan root
    pub fn write_raw(&self, relative: &str, content: &[u8]) {
        let path = self.layout.scan_root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create raw file parent");
        }
        fs::write(path, content).expect("write raw file");
    }

    /// Enabled-side marker path for a placement
    pub fn enabled_marker(&self, placement: &str) -> PathBuf {
        self.layout
            .enabled_root
            .join(placement)
            .join(&self.layout.marker_segment)
    }

    /// Disabled-side marker path for a placement
    pub fn disabled_marker(&self, placement: &str) -> PathBuf {
        self.layout
            .disabled_root
            .join(placement)
            .join(&self.layout.marker_segment)
    }

    /// Tempdir root holding all three trees
    pub fn path(&self) -> &Path {
        self.root.path()
    }
}
