// Model serialization tests (JSON camelCase)

use upsdisplay::models::*;

#[test]
fn test_snapshot_serialization_camel_case() {
    let snapshot = UpsSnapshot {
        timestamp: 12345,
        uptime_secs: 7,
        ups: UpsTelemetry {
            battery_charge_percent: Some(75.0),
            battery_runtime_secs: Some(1800),
            load_watts: Some(120.0),
            status: "OL".into(),
        },
    };
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"batteryChargePercent\""));
    assert!(json.contains("\"uptimeSecs\""));
    let back: UpsSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn test_facets_serialize_as_camel_case_variants() {
    let facets = StatusFacets {
        online: OnlineState::Online,
        charge: ChargeState::None,
        alarm: AlarmState::LowBattery,
    };
    let json = serde_json::to_string(&facets).unwrap();
    assert!(json.contains("\"online\""));
    assert!(json.contains("\"lowBattery\""));
    let back: StatusFacets = serde_json::from_str(&json).unwrap();
    assert_eq!(back, facets);
}

#[test]
fn test_unset_telemetry_roundtrips_as_null() {
    let t = UpsTelemetry::empty();
    let json = serde_json::to_string(&t).unwrap();
    assert!(json.contains("\"batteryChargePercent\":null"));
    let back: UpsTelemetry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}
