//! Functional tests for the synchronization protocol.
//!
//! These drive a controller end to end over its wire channels:
//! - a request-state cycle pushes exactly one snapshot, bracketed by
//!   status updates
//! - overlapping cycle starts are rejected with a status, never queued
//! - apply composes with a forced re-sync and the snapshot reflects
//!   ground truth
//! - malformed payloads and unknown names degrade to status updates

use async_trait::async_trait;
use psw_control::{Controller, ControlError, LoggingOpener, ScenarioOpener, SwitcherConfig};
use psw_protocol::{encode_request, ControlEvent, StateSnapshot, UiRequest};
use psw_scenario::{EnablementState, ScenarioRecord};
use psw_test_utils::{FixtureScenario, ScenarioTree};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A controller session under test
struct Session {
    requests: mpsc::Sender<String>,
    events: mpsc::Receiver<ControlEvent>,
    task: JoinHandle<Result<(), ControlError>>,
}

impl Session {
    fn start(config: SwitcherConfig) -> Self {
        Self::start_with(config, LoggingOpener)
    }

    fn start_with<O: ScenarioOpener>(config: SwitcherConfig, opener: O) -> Self {
        let (controller, channels) = Controller::new(config, opener);
        Self {
            requests: channels.requests,
            events: channels.events,
            task: tokio::spawn(controller.run()),
        }
    }

    async fn send(&self, request: &UiRequest) {
        self.send_raw(&encode_request(request).expect("encode request"))
            .await;
    }

    async fn send_raw(&self, raw: &str) {
        self.requests
            .send(raw.to_string())
            .await
            .expect("controller accepts requests");
    }

    async fn next_event(&mut self) -> ControlEvent {
        self.events.recv().await.expect("controller still running")
    }

    /// Skip status updates until the next snapshot
    async fn next_snapshot(&mut self) -> StateSnapshot {
        loop {
            if let ControlEvent::StateSnapshot(snapshot) = self.next_event().await {
                return snapshot;
            }
        }
    }

    /// Close the request channel, collect every remaining event and join
    /// the controller
    async fn finish(self) -> Vec<ControlEvent> {
        let Session {
            requests,
            mut events,
            task,
        } = self;
        drop(requests);
        let mut remaining = Vec::new();
        while let Some(event) = events.recv().await {
            remaining.push(event);
        }
        task.await.expect("controller task").expect("controller run");
        remaining
    }
}

fn config_for(tree: &ScenarioTree) -> SwitcherConfig {
    SwitcherConfig::new(
        &tree.layout.scan_root,
        &tree.layout.enabled_root,
        &tree.layout.disabled_root,
    )
    .with_workspace_root(tree.path())
}

fn snapshots(events: &[ControlEvent]) -> Vec<&StateSnapshot> {
    events
        .iter()
        .filter_map(|event| match event {
            ControlEvent::StateSnapshot(snapshot) => Some(snapshot),
            ControlEvent::StatusUpdate { .. } => None,
        })
        .collect()
}

fn status_texts(events: &[ControlEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            ControlEvent::StatusUpdate { text, .. } => Some(text.as_str()),
            ControlEvent::StateSnapshot(_) => None,
        })
        .collect()
}

#[tokio::test]
async fn request_state_pushes_one_bracketed_snapshot() {
    let tree = ScenarioTree::build(&[
        FixtureScenario::new("Alpha", "Phase 1").enabled().with_order(1),
        FixtureScenario::new("Beta", "Phase 1").disabled().with_order(2),
        FixtureScenario::new("Lost", "Phase 2"),
    ]);
    let session = Session::start(config_for(&tree));

    session.send(&UiRequest::RequestInitialState).await;
    let events = session.finish().await;

    let snaps = snapshots(&events);
    assert_eq!(snaps.len(), 1, "exactly one snapshot per scan cycle");
    let snapshot = snaps[0];
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.scenario_count(), 3);
    assert_eq!(snapshot.phases[0].name, "Phase 1");
    assert_eq!(
        snapshot.phases[0]
            .scenarios
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Alpha", "Beta"]
    );
    assert_eq!(snapshot.states["Alpha"], EnablementState::Enabled);
    assert_eq!(snapshot.states["Beta"], EnablementState::Disabled);
    assert_eq!(snapshot.states["Lost"], EnablementState::Indeterminate);

    // Snapshot sits between the progress status and the completion status
    let texts = status_texts(&events);
    assert!(texts.first().is_some_and(|t| t.contains("Scanning")));
    assert!(texts.last().is_some_and(|t| t.contains("Scan complete")));
}

#[tokio::test]
async fn overlapping_scan_requests_are_rejected_not_queued() {
    let tree = ScenarioTree::build(&[FixtureScenario::new("Alpha", "Phase 1").enabled()]);
    let session = Session::start(config_for(&tree));

    session.send(&UiRequest::RequestInitialState).await;
    session.send(&UiRequest::RequestInitialState).await;
    let events = session.finish().await;

    assert_eq!(snapshots(&events).len(), 1, "no duplicate concurrent scan");
    assert!(
        status_texts(&events)
            .iter()
            .any(|t| t.contains("already in progress")),
        "second request answered with a busy status"
    );
}

#[tokio::test]
async fn apply_changes_resyncs_to_ground_truth() {
    let tree = ScenarioTree::build(&[
        FixtureScenario::new("Alpha", "Phase 1").enabled(),
        FixtureScenario::new("Beta", "Phase 1").disabled(),
    ]);
    let mut session = Session::start(config_for(&tree));

    session.send(&UiRequest::RequestInitialState).await;
    let first = session.next_snapshot().await;
    assert_eq!(first.states["Beta"], EnablementState::Disabled);

    let mut desired = BTreeMap::new();
    desired.insert("Alpha".to_string(), false);
    desired.insert("Beta".to_string(), true);
    session.send(&UiRequest::ApplyChanges { desired }).await;
    let events = session.finish().await;

    let snaps = snapshots(&events);
    assert_eq!(snaps.len(), 1, "the forced re-scan pushes one snapshot");
    assert_eq!(snaps[0].states["Alpha"], EnablementState::Disabled);
    assert_eq!(snaps[0].states["Beta"], EnablementState::Enabled);
    assert!(
        status_texts(&events)
            .iter()
            .any(|t| t.contains("1 enabled, 1 disabled, 0 skipped, 0 errored")),
        "batch summary surfaced to the operator"
    );
    assert!(tree.enabled_marker("Beta").is_dir());
    assert!(tree.disabled_marker("Alpha").is_dir());
}

#[tokio::test]
async fn apply_with_unknown_name_reports_errors_in_summary() {
    let tree = ScenarioTree::build(&[FixtureScenario::new("Alpha", "Phase 1").enabled()]);
    let mut session = Session::start(config_for(&tree));

    session.send(&UiRequest::RequestInitialState).await;
    let _ = session.next_snapshot().await;

    let mut desired = BTreeMap::new();
    desired.insert("NoSuchScenario".to_string(), true);
    session.send(&UiRequest::ApplyChanges { desired }).await;
    let events = session.finish().await;

    assert!(
        status_texts(&events)
            .iter()
            .any(|t| t.contains("with errors") && t.contains("1 errored")),
        "item-level error escalates the summary wording"
    );
    assert_eq!(snapshots(&events).len(), 1, "re-sync still happens");
}

#[tokio::test]
async fn apply_before_any_scan_is_refused() {
    let tree = ScenarioTree::build(&[]);
    let session = Session::start(config_for(&tree));

    session
        .send(&UiRequest::ApplyChanges {
            desired: BTreeMap::new(),
        })
        .await;
    let events = session.finish().await;

    assert!(snapshots(&events).is_empty());
    assert!(
        status_texts(&events)
            .iter()
            .any(|t| t.contains("request state first"))
    );
}

#[tokio::test]
async fn fatal_scan_produces_an_error_snapshot() {
    let tree = ScenarioTree::build(&[]);
    let mut config = config_for(&tree);
    config.scan_root = tree.path().join("no-such-dir");
    let session = Session::start(config);

    session.send(&UiRequest::RequestInitialState).await;
    let events = session.finish().await;

    let snaps = snapshots(&events);
    assert_eq!(snaps.len(), 1);
    assert!(snaps[0].error.is_some());
    assert!(snaps[0].phases.is_empty());
    assert!(
        status_texts(&events)
            .iter()
            .any(|t| t.contains("Scan failed"))
    );
}

#[tokio::test]
async fn malformed_request_is_rejected_with_controls_reenabled() {
    let tree = ScenarioTree::build(&[]);
    let session = Session::start(config_for(&tree));

    session.send_raw("certainly not json").await;
    let events = session.finish().await;

    assert!(snapshots(&events).is_empty(), "nothing is processed");
    assert_eq!(events.len(), 1);
    match &events[0] {
        ControlEvent::StatusUpdate {
            text,
            enable_controls,
        } => {
            assert!(text.contains("Request rejected"));
            assert_eq!(*enable_controls, Some(true));
        }
        other => panic!("expected a status update, got {other:?}"),
    }
}

#[derive(Debug, Clone, Default)]
struct RecordingOpener {
    opened: Arc<Mutex<Vec<PathBuf>>>,
}

#[async_trait]
impl ScenarioOpener for RecordingOpener {
    async fn open(&self, record: &ScenarioRecord) -> anyhow::Result<()> {
        self.opened
            .lock()
            .expect("opener lock")
            .push(record.source_location.clone());
        Ok(())
    }
}

#[tokio::test]
async fn open_scenario_reaches_the_host_collaborator() {
    let tree = ScenarioTree::build(&[FixtureScenario::new("Alpha", "Phase 1").enabled()]);
    let opener = RecordingOpener::default();
    let opened = Arc::clone(&opener.opened);
    let mut session = Session::start_with(config_for(&tree), opener);

    session.send(&UiRequest::RequestInitialState).await;
    let _ = session.next_snapshot().await;
    session
        .send(&UiRequest::OpenScenario {
            name: "Alpha".to_string(),
        })
        .await;
    let _ = session.finish().await;

    let opened = opened.lock().expect("opener lock");
    assert_eq!(opened.len(), 1);
    assert!(opened[0].ends_with("Alpha/scenario.yaml"));
}

#[tokio::test]
async fn open_unknown_scenario_surfaces_a_warning_status() {
    let tree = ScenarioTree::build(&[]);
    let mut session = Session::start(config_for(&tree));

    session.send(&UiRequest::RequestInitialState).await;
    let _ = session.next_snapshot().await;
    session
        .send(&UiRequest::OpenScenario {
            name: "Ghost".to_string(),
        })
        .await;
    let events = session.finish().await;

    assert!(
        status_texts(&events)
            .iter()
            .any(|t| t.contains("Ghost") && t.contains("not in the current index"))
    );
}

#[tokio::test]
async fn duplicate_names_travel_as_snapshot_warnings() {
    let tree = ScenarioTree::build(&[
        FixtureScenario::new("Smoke", "Phase 1").with_placement("a").enabled(),
        FixtureScenario::new("Smoke", "Phase 2").with_placement("b").enabled(),
    ]);
    let session = Session::start(config_for(&tree));

    session.send(&UiRequest::RequestInitialState).await;
    let events = session.finish().await;

    let snaps = snapshots(&events);
    assert_eq!(snaps[0].warnings.len(), 1);
    assert!(snaps[0].warnings[0].contains("duplicate scenario name"));
}
