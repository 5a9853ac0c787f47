// Poll/render worker: fetch -> classify -> layout -> render -> push.
// Blocking collaborators (NUT client, panel I/O) run on the blocking pool.

use std::sync::{Arc, Mutex};

use tokio::time::{Duration, MissedTickBehavior, interval};

use crate::framebuffer::{Framebuffer, Rotation};
use crate::layout::{self, IconGeometry};
use crate::models::{UpsSnapshot, UpsTelemetry};
use crate::nut_repo::TelemetrySource;
use crate::panel::Panel;
use crate::{render, status};

pub type SharedSource = Arc<Mutex<Box<dyn TelemetrySource + Send>>>;
pub type SharedPanel = Arc<Mutex<Box<dyn Panel + Send>>>;

/// Collaborators and shutdown for the worker.
pub struct WorkerDeps {
    pub source: SharedSource,
    pub panel: SharedPanel,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub poll_interval_ms: u64,
    /// 0 = full refresh only on the first frame; N > 0 also forces a full
    /// refresh every N frames.
    pub full_refresh_every: u32,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
    pub rotation: Rotation,
}

/// One telemetry poll on the blocking pool.
pub async fn poll_source(source: &SharedSource) -> anyhow::Result<UpsTelemetry> {
    let source = source.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = source
            .lock()
            .map_err(|e| anyhow::anyhow!("telemetry source lock poisoned: {}", e))?;
        guard.poll()
    })
    .await
    .map_err(|e| anyhow::anyhow!("telemetry task join: {}", e))?
}

pub async fn init_panel(panel: &SharedPanel) -> anyhow::Result<()> {
    let panel = panel.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = panel
            .lock()
            .map_err(|e| anyhow::anyhow!("panel lock poisoned: {}", e))?;
        guard.init()
    })
    .await
    .map_err(|e| anyhow::anyhow!("panel task join: {}", e))?
}

pub async fn push_frame(panel: &SharedPanel, frame: Vec<u8>, full: bool) -> anyhow::Result<()> {
    let panel = panel.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = panel
            .lock()
            .map_err(|e| anyhow::anyhow!("panel lock poisoned: {}", e))?;
        if full {
            guard.display_full(&frame)
        } else {
            guard.display_partial(&frame)
        }
    })
    .await
    .map_err(|e| anyhow::anyhow!("panel task join: {}", e))?
}

pub async fn sleep_panel(panel: &SharedPanel) -> anyhow::Result<()> {
    let panel = panel.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = panel
            .lock()
            .map_err(|e| anyhow::anyhow!("panel lock poisoned: {}", e))?;
        guard.sleep()
    })
    .await
    .map_err(|e| anyhow::anyhow!("panel task join: {}", e))?
}

/// Stamps telemetry with the wall clock and host uptime.
pub fn snapshot_now(ups: UpsTelemetry) -> UpsSnapshot {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        });
    UpsSnapshot {
        timestamp,
        uptime_secs: sysinfo::System::uptime(),
        ups,
    }
}

/// Classifies, lays out, and rasterizes one snapshot into a packed frame in
/// panel-native orientation.
pub fn render_frame(snapshot: &UpsSnapshot, rotation: Rotation, geometry: &IconGeometry) -> Vec<u8> {
    let facets = status::classify(&snapshot.ups.status);
    let plan = layout::compute_layout(snapshot, &facets, geometry);
    let mut fb = Framebuffer::epd2in13();
    fb.set_rotation(rotation);
    // Framebuffer drawing is infallible.
    let _ = render::draw(&plan, &mut fb);
    fb.data().to_vec()
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        source,
        panel,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        poll_interval_ms,
        full_refresh_every,
        stats_log_interval_secs,
        rotation,
    } = config;

    tokio::spawn(async move {
        if let Err(e) = init_panel(&panel).await {
            tracing::error!(error = %e, operation = "panel_init", "panel init failed; worker exiting");
            return;
        }

        let mut tick = interval(Duration::from_millis(poll_interval_ms));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let geometry = IconGeometry::default();
        let mut frames_full: u64 = 0;
        let mut frames_partial: u64 = 0;
        let mut poll_failures: u64 = 0;

        let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", poll_interval_ms);
        let _guard = worker_span.enter();

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let telemetry = match poll_source(&source).await {
                        Ok(t) => t,
                        Err(e) => {
                            poll_failures += 1;
                            tracing::warn!(
                                error = %e,
                                operation = "poll_telemetry",
                                "telemetry poll failed"
                            );
                            continue;
                        }
                    };

                    let snapshot = snapshot_now(telemetry);
                    let frame = render_frame(&snapshot, rotation, &geometry);

                    let pushed = frames_full + frames_partial;
                    let full = pushed == 0
                        || (full_refresh_every > 0
                            && pushed % u64::from(full_refresh_every) == 0);
                    match push_frame(&panel, frame, full).await {
                        Ok(()) => {
                            if full {
                                frames_full += 1;
                            } else {
                                frames_partial += 1;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                operation = "push_frame",
                                full,
                                "display push failed"
                            );
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        frames_full,
                        frames_partial,
                        poll_failures,
                        "app stats"
                    );
                }
            }
        }

        // Cleanup path: leave the panel in deep sleep before exiting.
        if let Err(e) = sleep_panel(&panel).await {
            tracing::warn!(error = %e, operation = "panel_sleep", "panel sleep failed");
        } else {
            tracing::info!("panel asleep");
        }
    })
}
