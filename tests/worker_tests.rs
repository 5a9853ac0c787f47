// Worker integration tests: spawn, tick, shutdown, refresh sequencing

mod common;

use common::{PanelCall, RecordingPanel, ScriptedSource, shared_panel, shared_source, telemetry};
use upsdisplay::framebuffer::Rotation;
use upsdisplay::worker::{WorkerConfig, WorkerDeps, spawn};

fn config(poll_interval_ms: u64, full_refresh_every: u32) -> WorkerConfig {
    WorkerConfig {
        poll_interval_ms,
        full_refresh_every,
        stats_log_interval_secs: 3600,
        rotation: Rotation::Rotate270,
    }
}

#[tokio::test]
async fn worker_pushes_full_then_partial_and_sleeps_on_shutdown() {
    let (panel, calls) = RecordingPanel::new();
    let source = ScriptedSource::new(vec![Ok(telemetry(75.0, 1800, 120.0, "OL"))]);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            source: shared_source(source),
            panel: shared_panel(panel),
            shutdown_rx,
        },
        config(10, 0),
    );
    tokio::time::sleep(tokio::time::Duration::from_millis(120)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    let calls = calls.lock().unwrap();
    assert!(calls.len() >= 4, "expected several frames, got {calls:?}");
    assert_eq!(calls[0], PanelCall::Init);
    assert_eq!(calls[1], PanelCall::Full);
    assert_eq!(*calls.last().unwrap(), PanelCall::Sleep);
    // with full_refresh_every = 0, everything after the first frame is partial
    assert!(
        calls[2..calls.len() - 1]
            .iter()
            .all(|c| *c == PanelCall::Partial),
        "unexpected refresh sequence: {calls:?}"
    );
}

#[tokio::test]
async fn worker_skips_frame_on_poll_failure() {
    let (panel, calls) = RecordingPanel::new();
    let source = ScriptedSource::new(vec![
        Err("connection refused".into()),
        Err("connection refused".into()),
        Ok(telemetry(50.0, 600, 80.0, "OB DISCHRG")),
    ]);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            source: shared_source(source),
            panel: shared_panel(panel),
            shutdown_rx,
        },
        config(10, 0),
    );
    tokio::time::sleep(tokio::time::Duration::from_millis(120)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    let calls = calls.lock().unwrap();
    // failed polls push nothing; the first successful poll is still a full
    // refresh
    assert_eq!(calls[0], PanelCall::Init);
    assert_eq!(calls[1], PanelCall::Full);
    assert_eq!(*calls.last().unwrap(), PanelCall::Sleep);
}

#[tokio::test]
async fn worker_forces_periodic_full_refresh() {
    let (panel, calls) = RecordingPanel::new();
    let source = ScriptedSource::new(vec![Ok(telemetry(90.0, 2400, 60.0, "OL CHRG"))]);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let handle = spawn(
        WorkerDeps {
            source: shared_source(source),
            panel: shared_panel(panel),
            shutdown_rx,
        },
        config(10, 3),
    );
    tokio::time::sleep(tokio::time::Duration::from_millis(150)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    let calls = calls.lock().unwrap();
    let frames: Vec<PanelCall> = calls[1..calls.len() - 1].to_vec();
    assert!(frames.len() >= 4, "expected several frames, got {calls:?}");
    for (i, frame) in frames.iter().enumerate() {
        let expected = if i % 3 == 0 {
            PanelCall::Full
        } else {
            PanelCall::Partial
        };
        assert_eq!(*frame, expected, "frame {i} in {frames:?}");
    }
}
