// Shared test helpers: scripted telemetry source and recording panel

use std::sync::{Arc, Mutex};

use upsdisplay::models::UpsTelemetry;
use upsdisplay::nut_repo::TelemetrySource;
use upsdisplay::panel::Panel;
use upsdisplay::worker::{SharedPanel, SharedSource};

pub fn telemetry(charge: f64, runtime: u64, load: f64, status: &str) -> UpsTelemetry {
    UpsTelemetry {
        battery_charge_percent: Some(charge),
        battery_runtime_secs: Some(runtime),
        load_watts: Some(load),
        status: status.into(),
    }
}

/// Replays scripted poll results in order, repeating the last one forever.
/// The script must be non-empty.
pub struct ScriptedSource {
    script: Vec<Result<UpsTelemetry, String>>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<UpsTelemetry, String>>) -> Self {
        assert!(!script.is_empty(), "script must be non-empty");
        Self { script, next: 0 }
    }
}

impl TelemetrySource for ScriptedSource {
    fn poll(&mut self) -> anyhow::Result<UpsTelemetry> {
        let i = self.next.min(self.script.len() - 1);
        self.next += 1;
        match &self.script[i] {
            Ok(t) => Ok(t.clone()),
            Err(msg) => Err(anyhow::anyhow!("{msg}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCall {
    Init,
    Full,
    Partial,
    Sleep,
}

/// Panel that records the sequence of driver calls.
pub struct RecordingPanel {
    calls: Arc<Mutex<Vec<PanelCall>>>,
}

impl RecordingPanel {
    pub fn new() -> (Self, Arc<Mutex<Vec<PanelCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Panel for RecordingPanel {
    fn init(&mut self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(PanelCall::Init);
        Ok(())
    }

    fn display_full(&mut self, _frame: &[u8]) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(PanelCall::Full);
        Ok(())
    }

    fn display_partial(&mut self, _frame: &[u8]) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(PanelCall::Partial);
        Ok(())
    }

    fn sleep(&mut self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(PanelCall::Sleep);
        Ok(())
    }
}

pub fn shared_source(source: impl TelemetrySource + Send + 'static) -> SharedSource {
    Arc::new(Mutex::new(Box::new(source)))
}

pub fn shared_panel(panel: impl Panel + Send + 'static) -> SharedPanel {
    Arc::new(Mutex::new(Box::new(panel)))
}
