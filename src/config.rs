use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::framebuffer::Rotation;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ups: UpsConfig,
    pub display: DisplayConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpsConfig {
    pub host: String,
    pub port: u16,
    /// UPS name as registered with the NUT daemon.
    pub name: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for UpsConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3493,
            name: "ups".into(),
            username: None,
            password: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelDriver {
    /// Frame dumps to a PBM file (no hardware).
    Pbm,
    /// Waveshare 2.13" panel (requires the `epd` build feature).
    Epd2in13,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub driver: PanelDriver,
    /// Canvas rotation; rotate90/rotate270 pick which panel edge is up.
    pub rotation: Rotation,
    /// Output path for the pbm driver.
    pub pbm_path: Option<String>,
    /// 0 = full refresh only on the first frame; N > 0 also forces a full
    /// refresh every N frames to clear ghosting.
    pub full_refresh_every: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            driver: PanelDriver::Pbm,
            rotation: Rotation::Rotate270,
            pbm_path: Some("frame.pbm".into()),
            full_refresh_every: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub poll_interval_ms: u64,
    /// How often to log app stats (frames pushed, poll failures) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            stats_log_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Loads config from `path_override`, the `CONFIG_FILE` env var, or
    /// `config.toml`. A missing file is only an error when a path was given
    /// explicitly; otherwise defaults apply.
    pub fn load(path_override: Option<&Path>) -> anyhow::Result<Self> {
        let explicit = path_override
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from("config.toml"));
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
                tracing::info!(path = %path.display(), "no config file; using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => {
                Err(anyhow::Error::from(e).context(format!("reading {}", path.display())))
            }
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.ups.port > 0,
            "ups.port must be between 1 and 65535, got {}",
            self.ups.port
        );
        anyhow::ensure!(!self.ups.host.is_empty(), "ups.host must be non-empty");
        anyhow::ensure!(!self.ups.name.is_empty(), "ups.name must be non-empty");
        if self.display.driver == PanelDriver::Pbm {
            anyhow::ensure!(
                self.display.pbm_path.as_deref().is_some_and(|p| !p.is_empty()),
                "display.pbm_path must be set for the pbm driver"
            );
        }
        anyhow::ensure!(
            self.monitoring.poll_interval_ms > 0,
            "monitoring.poll_interval_ms must be > 0, got {}",
            self.monitoring.poll_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
