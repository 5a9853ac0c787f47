// UPS telemetry via the NUT network protocol (rups client)

use std::collections::HashMap;
use std::str::FromStr;

use rups::blocking::Connection;
use rups::{Auth, ConfigBuilder};
use thiserror::Error;

use crate::config::UpsConfig;
use crate::models::UpsTelemetry;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("NUT connection failed: {0}")]
    Connect(#[source] rups::ClientError),
    #[error("NUT query failed: {0}")]
    Query(#[source] rups::ClientError),
}

/// Blocking source of UPS telemetry. The worker drives this through
/// `spawn_blocking`; implementations must not assume an async context.
pub trait TelemetrySource {
    fn poll(&mut self) -> anyhow::Result<UpsTelemetry>;
}

/// NUT client wrapper. Connects lazily and keeps the connection across
/// polls; any error drops it so the next poll reconnects from scratch.
pub struct NutRepo {
    config: rups::Config,
    ups_name: String,
    conn: Option<Connection>,
}

impl NutRepo {
    pub fn new(config: &UpsConfig) -> Self {
        let auth = config
            .username
            .clone()
            .map(|user| Auth::new(user, config.password.clone()));
        let rups_config = ConfigBuilder::new()
            .with_host(
                (config.host.clone(), config.port)
                    .try_into()
                    .unwrap_or_default(),
            )
            .with_auth(auth)
            .with_debug(false)
            .build();
        Self {
            config: rups_config,
            ups_name: config.name.clone(),
            conn: None,
        }
    }

    fn poll_inner(&mut self) -> Result<UpsTelemetry, TelemetryError> {
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::debug!(operation = "nut_connect", "connecting to NUT daemon");
                Connection::new(&self.config).map_err(TelemetryError::Connect)?
            }
        };
        match Self::fetch(&mut conn, &self.ups_name) {
            Ok(telemetry) => {
                self.conn = Some(conn);
                Ok(telemetry)
            }
            // Connection stays dropped; the next poll reconnects.
            Err(err) => Err(err),
        }
    }

    fn fetch(conn: &mut Connection, ups_name: &str) -> Result<UpsTelemetry, TelemetryError> {
        let vars: HashMap<String, String> = conn
            .list_vars(ups_name)
            .map_err(TelemetryError::Query)?
            .into_iter()
            .map(|var| (var.name().to_string(), var.value().to_string()))
            .collect();

        // `ups.status` passes through as an opaque token string; empty
        // classifies Unknown downstream.
        let status = vars.get("ups.status").cloned().unwrap_or_else(|| {
            tracing::warn!(variable = "ups.status", "UPS variable missing");
            String::new()
        });

        Ok(UpsTelemetry {
            battery_charge_percent: parse_var(&vars, "battery.charge"),
            battery_runtime_secs: parse_var(&vars, "battery.runtime"),
            load_watts: parse_var(&vars, "ups.load"),
            status,
        })
    }
}

impl TelemetrySource for NutRepo {
    fn poll(&mut self) -> anyhow::Result<UpsTelemetry> {
        Ok(self.poll_inner()?)
    }
}

/// Numeric variable lookup: missing or malformed values log a warning and
/// yield `None` instead of failing the poll.
fn parse_var<T: FromStr>(vars: &HashMap<String, String>, name: &str) -> Option<T> {
    let raw = match vars.get(name) {
        Some(raw) => raw,
        None => {
            tracing::warn!(variable = name, "UPS variable missing");
            return None;
        }
    };
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "UPS variable not numeric");
            None
        }
    }
}
