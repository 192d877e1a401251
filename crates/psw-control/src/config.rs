//! Switcher configuration
//!
//! Paths of the three trees, the marker segment, the descriptor selector
//! and the feature-visibility toggles. Loadable from TOML; validation is
//! explicit and separate from construction.

use crate::error::ConfigError;
use psw_engine::TreeLayout;
use psw_protocol::SettingsSnapshot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Feature-visibility toggles
///
/// These gate which protocol-driven UI sections are interactive. State is
/// computed and pushed regardless; visibility is a presentation concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggles {
    /// Phase-switching section
    #[serde(default = "default_true")]
    pub phase_feature_enabled: bool,
    /// Assembly section
    #[serde(default)]
    pub assembly_feature_enabled: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            phase_feature_enabled: true,
            assembly_feature_enabled: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_marker_segment() -> String {
    "test".to_string()
}

fn default_descriptor_extension() -> String {
    "yaml".to_string()
}

/// Configuration of one switcher instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitcherConfig {
    /// Root of the descriptor tree the scanner walks
    pub scan_root: PathBuf,
    /// Fallback base for descriptors outside the scan root; defaults to
    /// the scan root itself
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,
    /// Root tree whose markers mean "enabled"
    pub enabled_root: PathBuf,
    /// Root tree whose markers mean "disabled"
    pub disabled_root: PathBuf,
    /// Fixed name of the marker subdirectory
    #[serde(default = "default_marker_segment")]
    pub marker_segment: String,
    /// File extension selecting descriptor candidates
    #[serde(default = "default_descriptor_extension")]
    pub descriptor_extension: String,
    /// Feature-visibility toggles
    #[serde(default)]
    pub features: FeatureToggles,
}

impl SwitcherConfig {
    /// Create a configuration with default marker segment and extension
    #[must_use]
    pub fn new(
        scan_root: impl Into<PathBuf>,
        enabled_root: impl Into<PathBuf>,
        disabled_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scan_root: scan_root.into(),
            workspace_root: None,
            enabled_root: enabled_root.into(),
            disabled_root: disabled_root.into(),
            marker_segment: default_marker_segment(),
            descriptor_extension: default_descriptor_extension(),
            features: FeatureToggles::default(),
        }
    }

    /// With an explicit workspace root
    #[inline]
    #[must_use]
    pub fn with_workspace_root(mut self, workspace_root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(workspace_root.into());
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

    /// With feature toggles
    #[inline]
    #[must_use]
    pub fn with_features(mut self, features: FeatureToggles) -> Self {
        self.features = features;
        self
    }

    /// Check structural invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let segment_ok = !self.marker_segment.is_empty()
            && !self.marker_segment.contains(['/', '\\']);
        if !segment_ok {
            return Err(ConfigError::InvalidMarkerSegment);
        }
        if self.descriptor_extension.is_empty() || self.descriptor_extension.starts_with('.') {
            return Err(ConfigError::InvalidDescriptorExtension);
        }
        if self.enabled_root == self.disabled_root {
            return Err(ConfigError::IdenticalRoots);
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Derive the engine-facing directory layout
    #[must_use]
    pub fn layout(&self) -> TreeLayout {
        let mut layout = TreeLayout::new(&self.scan_root, &self.enabled_root, &self.disabled_root)
            .with_marker_segment(&self.marker_segment)
            .with_descriptor_extension(&self.descriptor_extension);
        if let Some(ref workspace_root) = self.workspace_root {
            layout = layout.with_workspace_root(workspace_root);
        }
        layout
    }

    /// Settings as pushed to the presentation side
    #[must_use]
    pub fn settings_snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            phase_feature_enabled: self.features.phase_feature_enabled,
            assembly_feature_enabled: self.features.assembly_feature_enabled,
        }
    }
}
