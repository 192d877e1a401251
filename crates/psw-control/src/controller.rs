//! Control-side message loop and cycle state machine
//!
//! The controller owns the authoritative index and a single explicit cycle
//! state. Requests arrive as raw wire strings; cycles run as spawned tasks
//! and report back through an internal outcome channel, so the loop stays
//! responsive and can reject overlapping starts with a status message
//! instead of queueing them.

use crate::config::SwitcherConfig;
use crate::error::ControlError;
use crate::opener::ScenarioOpener;
use psw_engine::{
    apply_desired_state, resolve_states, scan_scenarios, BatchResult, ScanError, TreeLayout,
};
use psw_protocol::{
    decode_request, ControlEvent, PhaseGroup, ScenarioSummary, StateSnapshot, UiRequest,
};
use psw_scenario::{EnablementState, ScenarioIndex};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

const REQUEST_BUFFER: usize = 16;
// Large enough to absorb every event of one full cycle without the UI
// draining in lockstep
const EVENT_BUFFER: usize = 64;

/// Cycle state on the control side
///
/// At most one of `Scanning`/`Applying` is active at a time; a request
/// arriving while busy is rejected with a status message, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Nothing in flight
    Idle,
    /// A scan cycle (scan + resolve + push) is running
    Scanning,
    /// An apply batch is running; always followed by `Scanning`
    Applying,
}

impl CyclePhase {
    /// Whether a new cycle may start
    #[inline]
    #[must_use]
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Transitions this state may take
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [CyclePhase] {
        match self {
            Self::Idle => &[Self::Scanning, Self::Applying],
            Self::Scanning => &[Self::Idle],
            Self::Applying => &[Self::Scanning],
        }
    }

    fn allows(self, to: Self) -> bool {
        self.allowed_transitions().contains(&to)
    }
}

/// Result of one spawned cycle stage
#[derive(Debug)]
enum CycleOutcome {
    ScanFinished(Result<(ScenarioIndex, BTreeMap<String, EnablementState>), ScanError>),
    ApplyFinished(BatchResult),
}

/// Presentation-facing endpoints of a controller
#[derive(Debug)]
pub struct ControlChannels {
    /// Wire-form requests into the controller
    pub requests: mpsc::Sender<String>,
    /// Events out of the controller
    pub events: mpsc::Receiver<ControlEvent>,
}

/// The control side of the synchronization protocol
#[derive(Debug)]
pub struct Controller<O> {
    config: SwitcherConfig,
    phase: CyclePhase,
    /// Index from the last completed scan; serves open-scenario lookups
    /// and apply batches
    index: Option<ScenarioIndex>,
    requests: mpsc::Receiver<String>,
    events: mpsc::Sender<ControlEvent>,
    outcome_tx: mpsc::Sender<CycleOutcome>,
    outcome_rx: mpsc::Receiver<CycleOutcome>,
    opener: O,
}

impl<O: ScenarioOpener> Controller<O> {
    /// Create a controller and the channel pair its presentation side
    /// talks through
    #[must_use]
    pub fn new(config: SwitcherConfig, opener: O) -> (Self, ControlChannels) {
        let (request_tx, request_rx) = mpsc::channel(REQUEST_BUFFER);
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (outcome_tx, outcome_rx) = mpsc::channel(4);
        let controller = Self {
            config,
            phase: CyclePhase::Idle,
            index: None,
            requests: request_rx,
            events: event_tx,
            outcome_tx,
            outcome_rx,
            opener,
        };
        let channels = ControlChannels {
            requests: request_tx,
            events: event_rx,
        };
        (controller, channels)
    }

    /// Current cycle phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Run the message loop until the request channel closes and all
    /// in-flight work has drained
    pub async fn run(mut self) -> Result<(), ControlError> {
        let mut requests_open = true;
        loop {
            tokio::select! {
                // Requests win ties so a request racing a finishing cycle
                // still observes the busy guard
                biased;
                raw = self.requests.recv(), if requests_open => match raw {
                    Some(raw) => self.handle_raw_request(&raw).await?,
                    None => requests_open = false,
                },
                outcome = self.outcome_rx.recv() => match outcome {
                    Some(outcome) => self.handle_outcome(outcome).await?,
                    // Unreachable while we hold outcome_tx
                    None => break,
                },
            }
            if !requests_open && !self.phase.is_busy() {
                break;
            }
        }
        Ok(())
    }

    async fn handle_raw_request(&mut self, raw: &str) -> Result<(), ControlError> {
        let request = match decode_request(raw) {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(%error, "rejecting malformed request");
                return self
                    .status(format!("Request rejected: {error}"), Some(true))
                    .await;
            }
        };
        match request {
            UiRequest::RequestInitialState => self.start_scan_cycle().await,
            UiRequest::ApplyChanges { desired } => self.start_apply_cycle(desired).await,
            UiRequest::OpenScenario { name } => self.open_scenario(&name).await,
        }
    }

    async fn start_scan_cycle(&mut self) -> Result<(), ControlError> {
        if self.phase.is_busy() {
            tracing::debug!(phase = ?self.phase, "scan requested while busy");
            return self.status("Scan already in progress", None).await;
        }
        self.advance(CyclePhase::Scanning);
        self.status("Scanning scenarios...", Some(false)).await?;

        let layout = self.config.layout();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = CycleOutcome::ScanFinished(scan_and_resolve(&layout).await);
            let _ = outcome_tx.send(outcome).await;
        });
        Ok(())
    }

    async fn start_apply_cycle(
        &mut self,
        desired: BTreeMap<String, bool>,
    ) -> Result<(), ControlError> {
        if self.phase.is_busy() {
            tracing::debug!(phase = ?self.phase, "apply requested while busy");
            return self
                .status("Another sync cycle is already in progress", None)
                .await;
        }
        let Some(index) = self.index.clone() else {
            return self
                .status("No scenario state loaded yet, request state first", Some(true))
                .await;
        };

        self.advance(CyclePhase::Applying);
        self.status("Applying scenario changes...", Some(false))
            .await?;

        let layout = self.config.layout();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let (batch, resync) = apply_then_resync(&desired, &index, &layout).await;
            let _ = outcome_tx.send(CycleOutcome::ApplyFinished(batch)).await;
            let _ = outcome_tx.send(CycleOutcome::ScanFinished(resync)).await;
        });
        Ok(())
    }

    async fn handle_outcome(&mut self, outcome: CycleOutcome) -> Result<(), ControlError> {
        match outcome {
            CycleOutcome::ScanFinished(Ok((index, states))) => {
                let snapshot = self.build_snapshot(&index, states);
                let scenario_count = index.len();
                let phase_count = snapshot.phases.len();
                self.index = Some(index);
                self.advance(CyclePhase::Idle);
                self.send(ControlEvent::StateSnapshot(snapshot)).await?;
                self.status(
                    format!("Scan complete: {scenario_count} scenarios in {phase_count} phases"),
                    Some(true),
                )
                .await
            }
            CycleOutcome::ScanFinished(Err(error)) => {
                tracing::error!(%error, "scan cycle failed");
                self.advance(CyclePhase::Idle);
                let snapshot =
                    StateSnapshot::failed(self.config.settings_snapshot(), error.to_string());
                self.send(ControlEvent::StateSnapshot(snapshot)).await?;
                self.status(format!("Scan failed: {error}"), Some(true))
                    .await
            }
            CycleOutcome::ApplyFinished(batch) => {
                let text = if batch.has_errors() {
                    tracing::warn!(summary = %batch.summary(), "apply finished with item errors");
                    format!("Scenario changes applied with errors: {}", batch.summary())
                } else {
                    tracing::info!(summary = %batch.summary(), "apply finished");
                    format!("Scenario changes applied: {}", batch.summary())
                };
                self.status(text, None).await?;
                // The forced re-scan of apply_then_resync is already under
                // way; account for it before its outcome lands
                self.advance(CyclePhase::Scanning);
                self.status("Refreshing scenario state...", Some(false))
                    .await
            }
        }
    }

    async fn open_scenario(&mut self, name: &str) -> Result<(), ControlError> {
        let record = self.index.as_ref().and_then(|index| index.get(name));
        let Some(record) = record else {
            tracing::warn!(scenario = %name, "open requested for unknown scenario");
            return self
                .status(format!("Scenario \"{name}\" is not in the current index"), None)
                .await;
        };
        if let Err(error) = self.opener.open(record).await {
            tracing::warn!(scenario = %name, %error, "opener failed");
            return self
                .status(format!("Could not open scenario \"{name}\": {error}"), None)
                .await;
        }
        Ok(())
    }

    fn build_snapshot(
        &self,
        index: &ScenarioIndex,
        states: BTreeMap<String, EnablementState>,
    ) -> StateSnapshot {
        let phases = index
            .by_phase()
            .into_iter()
            .map(|(name, records)| PhaseGroup {
                name: name.to_string(),
                scenarios: records
                    .into_iter()
                    .map(|record| ScenarioSummary {
                        name: record.name.clone(),
                        default_enabled: record.default_enabled,
                        sort_order: record.sort_order,
                    })
                    .collect(),
            })
            .collect();
        StateSnapshot {
            phases,
            states,
            settings: self.config.settings_snapshot(),
            warnings: index.warnings().iter().map(ToString::to_string).collect(),
            error: None,
        }
    }

    fn advance(&mut self, next: CyclePhase) {
        debug_assert!(
            self.phase.allows(next),
            "illegal cycle transition {:?} -> {next:?}",
            self.phase
        );
        self.phase = next;
    }

    async fn send(&self, event: ControlEvent) -> Result<(), ControlError> {
        self.events
            .send(event)
            .await
            .map_err(|_| ControlError::PresentationDisconnected)
    }

    async fn status(
        &self,
        text: impl Into<String>,
        enable_controls: Option<bool>,
    ) -> Result<(), ControlError> {
        self.send(ControlEvent::StatusUpdate {
            text: text.into(),
            enable_controls,
        })
        .await
    }
}

/// One scan cycle's work: fresh index plus resolved states
async fn scan_and_resolve(
    layout: &TreeLayout,
) -> Result<(ScenarioIndex, BTreeMap<String, EnablementState>), ScanError> {
    let index = scan_scenarios(layout).await?;
    let states = resolve_states(&index, layout).await;
    Ok((index, states))
}

/// Control-side pipeline: apply the batch, then force a fresh scan so the
/// presentation side observes ground truth rather than its own edits
async fn apply_then_resync(
    desired: &BTreeMap<String, bool>,
    index: &ScenarioIndex,
    layout: &TreeLayout,
) -> (
    BatchResult,
    Result<(ScenarioIndex, BTreeMap<String, EnablementState>), ScanError>,
) {
    let batch = apply_desired_state(desired, index, layout).await;
    let resync = scan_and_resolve(layout).await;
    (batch, resync)
}
