//! Directory layout the engine operates over
//!
//! Two independently configurable parallel root trees encode enablement:
//! under each root, `relative_placement/<marker segment>` is the unit that
//! moves. The scan root is where descriptor files live.

use psw_scenario::ScenarioRecord;
use std::path::{Path, PathBuf};

/// Filesystem layout for one switcher instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    /// Root of the descriptor tree the scanner walks
    pub scan_root: PathBuf,
    /// Fallback base for descriptors found outside the scan root
    pub workspace_root: PathBuf,
    /// Root tree whose markers mean "enabled"
    pub enabled_root: PathBuf,
    /// Root tree whose markers mean "disabled"
    pub disabled_root: PathBuf,
    /// Fixed name of the marker subdirectory
    pub marker_segment: String,
    /// File extension selecting descriptor candidates
    pub descriptor_extension: String,
}

impl TreeLayout {
    /// Create a layout with the default marker segment (`test`) and
    /// descriptor extension (`yaml`)
    #[must_use]
    pub fn new(
        scan_root: impl Into<PathBuf>,
        enabled_root: impl Into<PathBuf>,
        disabled_root: impl Into<PathBuf>,
    ) -> Self {
        let scan_root = scan_root.into();
        Self {
            workspace_root: scan_root.clone(),
            scan_root,
            enabled_root: enabled_root.into(),
            disabled_root: disabled_root.into(),
            marker_segment: "test".to_string(),
            descriptor_extension: "yaml".to_string(),
        }
    }

    /// With a workspace root distinct from the scan root
    #[inline]
    #[must_use]
    pub fn with_workspace_root(mut self, workspace_root: impl Into<PathBuf>) -> Self {
        self.workspace_root = workspace_root.into();
        self
    }

    /// With a custom marker segment
    #[inline]
    #[must_use]
    pub fn with_marker_segment(mut self, segment: impl Into<String>) -> Self {
        self.marker_segment = segment.into();
        self
    }

    /// With a custom descriptor extension
    #[inline]
    #[must_use]
    pub fn with_descriptor_extension(mut self, extension: impl Into<String>) -> Self {
        self.descriptor_extension = extension.into();
        self
    }

    /// Enabled-side marker path for one record
    #[must_use]
    pub fn enabled_marker(&self, record: &ScenarioRecord) -> PathBuf {
        self.marker_under(&self.enabled_root, record)
    }

    /// Disabled-side marker path for one record
    #[must_use]
    pub fn disabled_marker(&self, record: &ScenarioRecord) -> PathBuf {
        self.marker_under(&self.disabled_root, record)
    }

    fn marker_under(&self, root: &Path, record: &ScenarioRecord) -> PathBuf {
        root.join(&record.relative_placement)
            .join(&self.marker_segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn marker_paths_compose_root_placement_segment() {
        let layout = TreeLayout::new("/w/scenarios", "/w/on", "/w/off");
        let record = ScenarioRecord::new("S", "P", "/w/scenarios/sales/s.yaml", "sales");

        assert_eq!(
            layout.enabled_marker(&record),
            PathBuf::from("/w/on/sales/test")
        );
        assert_eq!(
            layout.disabled_marker(&record),
            PathBuf::from("/w/off/sales/test")
        );
    }

    #[test]
    fn builders_override_defaults() {
        let layout = TreeLayout::new("/w/s", "/w/on", "/w/off")
            .with_marker_segment("cases")
            .with_descriptor_extension("feature")
            .with_workspace_root("/w");

        assert_eq!(layout.marker_segment, "cases");
        assert_eq!(layout.descriptor_extension, "feature");
        assert_eq!(layout.workspace_root, PathBuf::from("/w"));
    }
}
