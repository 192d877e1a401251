//! Host-editor seam
//!
//! Opening a scenario in an editor is the host's business; Control only
//! signals "open this one" through this trait. Lookup failures stay on the
//! control side, open failures come back as ordinary errors.

use async_trait::async_trait;
use psw_scenario::ScenarioRecord;

/// External collaborator that can reveal a scenario to the user
#[async_trait]
pub trait ScenarioOpener: Send + Sync + 'static {
    /// Open the scenario's descriptor
    async fn open(&self, record: &ScenarioRecord) -> anyhow::Result<()>;
}

/// Default collaborator: logs the request and does nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOpener;

#[async_trait]
impl ScenarioOpener for LoggingOpener {
    async fn open(&self, record: &ScenarioRecord) -> anyhow::Result<()> {
        tracing::info!(
            scenario = %record.name,
            path = %record.source_location.display(),
            "open scenario requested"
        );
        Ok(())
    }
}
