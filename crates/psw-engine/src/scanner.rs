//! Scenario discovery
//!
//! Walks the scan root for descriptor files, scrapes each one with the
//! tagged-line reader, and builds a fresh index. A failure of the walk
//! itself is fatal; everything below that (unreadable file, inadmissible
//! descriptor) skips the one candidate and moves on.

use crate::error::ScanError;
use crate::layout::TreeLayout;
use psw_scenario::{DescriptorScan, ScanWarning, ScenarioIndex, ScenarioRecord};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scan the descriptor tree and build a fresh [`ScenarioIndex`]
///
/// Absence of any matching descriptor yields an empty index, not an error.
/// Pure read: no filesystem state is touched.
pub async fn scan_scenarios(layout: &TreeLayout) -> Result<ScenarioIndex, ScanError> {
    let candidates = collect_candidates(layout)?;
    let mut index = ScenarioIndex::new();

    for path in candidates {
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "skipping unreadable descriptor"
                );
                continue;
            }
        };

        let scan = DescriptorScan::of_text(&text);
        if !scan.is_admissible() {
            // Name-only helper files and unrelated text land here
            tracing::debug!(path = %path.display(), "descriptor is not phase-bound, skipping");
            continue;
        }
        let (name, phase_name) = match (scan.name, scan.phase_name) {
            (Some(name), Some(phase_name)) => (name, phase_name),
            _ => continue,
        };

        let (placement, outside_root) = relative_placement(&path, layout);
        if outside_root {
            tracing::warn!(
                scenario = %name,
                path = %path.display(),
                "descriptor lies outside the scan root"
            );
            index.push_warning(ScanWarning::PlacementOutsideRoot {
                name: name.clone(),
                placement: placement.clone(),
            });
        }

        let mut record = ScenarioRecord::new(name, phase_name, path, placement)
            .with_default_enabled(scan.default_enabled);
        if let Some(order) = scan.sort_order {
            record = record.with_sort_order(order);
        }
        index.insert(record);
    }

    tracing::debug!(
        scenarios = index.len(),
        warnings = index.warnings().len(),
        "scan complete"
    );
    Ok(index)
}

/// Enumerate candidate descriptor files under the scan root
///
/// Sorted by file name so repeated scans of an unchanged tree visit
/// candidates in the same order.
fn collect_candidates(layout: &TreeLayout) -> Result<Vec<PathBuf>, ScanError> {
    let mut candidates = Vec::new();
    let walk = WalkDir::new(&layout.scan_root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walk {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: layout.scan_root.clone(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == layout.descriptor_extension.as_str());
        if matches {
            candidates.push(entry.into_path());
        }
    }
    Ok(candidates)
}

/// Containing directory of a descriptor, relative to the scan root
///
/// Falls back to a workspace-relative path (and reports it) when the
/// descriptor somehow lies outside the scan root. Not expected in normal
/// operation.
fn relative_placement(descriptor: &Path, layout: &TreeLayout) -> (PathBuf, bool) {
    let parent = descriptor.parent().unwrap_or(descriptor);
    if let Ok(relative) = parent.strip_prefix(&layout.scan_root) {
        return (relative.to_path_buf(), false);
    }
    let fallback = parent
        .strip_prefix(&layout.workspace_root)
        .map_or_else(|_| parent.to_path_buf(), Path::to_path_buf);
    (fallback, true)
}
