// ups.status token classification

use crate::models::{AlarmState, ChargeState, OnlineState, StatusFacets};

/// Classifies a NUT `ups.status` token string into its three independent
/// facets. Each facet is a separate membership table over the full (trimmed)
/// code; the tables overlap, so e.g. `"OL DISCHRG LB"` is
/// Online + Discharging + LowBattery.
///
/// Unrecognized codes (including `RB`, `BYPASS`, and the empty string) are
/// fail-open: they classify to Unknown/None rather than erroring, and the
/// render cycle proceeds.
pub fn classify(code: &str) -> StatusFacets {
    let code = code.trim();

    let online = match code {
        "OL" | "OL LB" | "OL BOOST" | "OL CHRG" | "OL CHRG LB" | "OL DISCHRG"
        | "OL DISCHRG LB" => OnlineState::Online,
        "OB DISCHRG" | "OB DISCHRG LB" | "OB LB" => OnlineState::Offline,
        _ => OnlineState::Unknown,
    };

    let charge = match code {
        "OL CHRG" | "OL CHRG LB" => ChargeState::Charging,
        "OB DISCHRG" | "OB DISCHRG LB" | "OL DISCHRG" | "OL DISCHRG LB" => {
            ChargeState::Discharging
        }
        _ => ChargeState::None,
    };

    let alarm = match code {
        "OL BOOST" => AlarmState::LowVoltage,
        "OL LB" | "OL CHRG LB" | "OL DISCHRG LB" | "OB DISCHRG LB" | "OB LB" => {
            AlarmState::LowBattery
        }
        _ => AlarmState::None,
    };

    StatusFacets {
        online,
        charge,
        alarm,
    }
}
