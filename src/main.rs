use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use upsdisplay::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Debug, Parser)]
#[command(name = version::NAME, version = version::VERSION, about = "NUT UPS status on an e-paper panel")]
struct Args {
    /// Config file (falls back to the CONFIG_FILE env var, then config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Poll and render a single frame, then exit
    #[arg(long)]
    once: bool,
    /// With --once, print the snapshot and facets as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let args = Args::parse();
    let app_config = config::AppConfig::load(args.config.as_deref())?;
    tracing::info!(
        version = version::VERSION,
        ups = %app_config.ups.name,
        host = %app_config.ups.host,
        "starting"
    );

    let source: worker::SharedSource = Arc::new(Mutex::new(Box::new(nut_repo::NutRepo::new(
        &app_config.ups,
    ))));
    let panel: worker::SharedPanel = Arc::new(Mutex::new(panel::from_config(&app_config.display)?));

    if args.once {
        return run_once(&source, &panel, &app_config, args.json).await;
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let mut worker_handle = worker::spawn(
        worker::WorkerDeps {
            source,
            panel,
            shutdown_rx,
        },
        worker::WorkerConfig {
            poll_interval_ms: app_config.monitoring.poll_interval_ms,
            full_refresh_every: app_config.display.full_refresh_every,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            rotation: app_config.display.rotation,
        },
    );

    tokio::select! {
        _ = &mut worker_handle => {
            tracing::warn!("worker exited");
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}

/// Single poll/render cycle: optional JSON dump, one full refresh, panel to
/// sleep. Useful for checking wiring and NUT connectivity.
async fn run_once(
    source: &worker::SharedSource,
    panel: &worker::SharedPanel,
    app_config: &config::AppConfig,
    json: bool,
) -> Result<()> {
    let telemetry = worker::poll_source(source).await?;
    let snapshot = worker::snapshot_now(telemetry);
    let facets = status::classify(&snapshot.ups.status);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "snapshot": snapshot,
                "facets": facets,
            }))?
        );
    }

    let frame = worker::render_frame(
        &snapshot,
        app_config.display.rotation,
        &layout::IconGeometry::default(),
    );
    worker::init_panel(panel).await?;
    worker::push_frame(panel, frame, true).await?;
    worker::sleep_panel(panel).await?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
