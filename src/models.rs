// Domain models (telemetry snapshot + derived status facets)

use serde::{Deserialize, Serialize};

/// One poll of the NUT daemon. Absent or malformed variables become `None`
/// so a bad field never aborts a render cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsTelemetry {
    pub battery_charge_percent: Option<f64>,
    pub battery_runtime_secs: Option<u64>,
    pub load_watts: Option<f64>,
    /// Raw `ups.status` token string (e.g. `"OL CHRG LB"`), passed through opaque.
    pub status: String,
}

impl UpsTelemetry {
    /// All fields unset; classifies Unknown and renders placeholders.
    pub fn empty() -> Self {
        Self {
            battery_charge_percent: None,
            battery_runtime_secs: None,
            load_watts: None,
            status: String::new(),
        }
    }
}

/// Telemetry merged with host-side state for one render cycle.
/// Recomputed fresh every tick; nothing is retained across polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsSnapshot {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub uptime_secs: u64,
    pub ups: UpsTelemetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnlineState {
    Online,
    Offline,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChargeState {
    Charging,
    Discharging,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlarmState {
    LowBattery,
    LowVoltage,
    None,
}

/// Three independent classifications of a status token. A code can be
/// Online + Discharging + LowBattery at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFacets {
    pub online: OnlineState,
    pub charge: ChargeState,
    pub alarm: AlarmState,
}
