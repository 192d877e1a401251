//! Transition engine
//!
//! Applies a desired-state map by moving marker directories between the
//! enabled and disabled trees. Batches are best effort and fully itemized:
//! one item failing (unknown name, I/O error, external interference) is
//! counted and reported, and the remaining items still run. Nothing rolls
//! back.

use crate::error::TransitionError;
use crate::layout::TreeLayout;
use crate::resolver::resolve_record;
use psw_scenario::{EnablementState, ScenarioIndex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Itemized outcome of one apply batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Markers moved into the enabled tree
    pub moved_to_enabled: usize,
    /// Markers moved into the disabled tree
    pub moved_to_disabled: usize,
    /// Items whose state already matched, or was indeterminate
    pub skipped: usize,
    /// Items that failed
    pub errored: usize,
    /// What failed, per item
    pub failures: Vec<ItemFailure>,
}

impl BatchResult {
    /// Whether any item failed
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }

    /// One-line operator summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} enabled, {} disabled, {} skipped, {} errored",
            self.moved_to_enabled, self.moved_to_disabled, self.skipped, self.errored
        )
    }

    fn record_failure(&mut self, name: &str, reason: impl Into<String>) {
        self.errored += 1;
        self.failures.push(ItemFailure {
            name: name.to_string(),
            reason: reason.into(),
        });
    }
}

/// One failed batch item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Scenario name the failure belongs to
    pub name: String,
    /// Human-readable reason
    pub reason: String,
}

/// Apply a desired-state map against the current trees
///
/// Every entry is processed independently. The current state of each item
/// is re-probed here rather than reused from an earlier resolver pass, so
/// moves made by earlier items of the same batch cannot go stale.
pub async fn apply_desired_state(
    desired: &BTreeMap<String, bool>,
    index: &ScenarioIndex,
    layout: &TreeLayout,
) -> BatchResult {
    let mut result = BatchResult::default();

    for (name, &want_enabled) in desired {
        let Some(record) = index.get(name) else {
            tracing::warn!(scenario = %name, "desired state names an unknown scenario");
            result.record_failure(name, "not present in the scenario index");
            continue;
        };

        let current = resolve_record(record, layout).await;
        let movement = match (current, want_enabled) {
            (EnablementState::Disabled, true) => Some((
                layout.disabled_marker(record),
                layout.enabled_marker(record),
                Movement::ToEnabled,
            )),
            (EnablementState::Enabled, false) => Some((
                layout.enabled_marker(record),
                layout.disabled_marker(record),
                Movement::ToDisabled,
            )),
            _ => None,
        };

        match movement {
            None => result.skipped += 1,
            Some((from, to, direction)) => match move_marker(&from, &to).await {
                Ok(()) => match direction {
                    Movement::ToEnabled => result.moved_to_enabled += 1,
                    Movement::ToDisabled => result.moved_to_disabled += 1,
                },
                Err(error) => {
                    tracing::warn!(scenario = %name, %error, "marker move failed");
                    result.record_failure(name, error.to_string());
                }
            },
        }
    }

    result
}

#[derive(Debug, Clone, Copy)]
enum Movement {
    ToEnabled,
    ToDisabled,
}

/// Move one marker directory, replacing the destination if one exists
async fn move_marker(from: &Path, to: &Path) -> Result<(), TransitionError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| TransitionError::CreateParent {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    if fs::try_exists(to).await.unwrap_or(false) {
        fs::remove_dir_all(to)
            .await
            .map_err(|source| TransitionError::ReplaceDestination {
                path: to.to_path_buf(),
                source,
            })?;
    }
    fs::rename(from, to)
        .await
        .map_err(|source| TransitionError::Move {
            from: PathBuf::from(from),
            to: PathBuf::from(to),
            source,
        })
}
