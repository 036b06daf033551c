//! Integration tests for core snapshot types.

use lubewatch_core::{FleetSnapshot, VehicleEntry, VehicleSummary};
use std::collections::BTreeMap;

#[test]
fn test_snapshot_serialization_roundtrip() {
    let mut vehicles = BTreeMap::new();
    vehicles.insert(1, VehicleEntry::from_summary(&VehicleSummary::new(1)));
    let snapshot = FleetSnapshot::new(vehicles);

    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: FleetSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn test_empty_snapshot() {
    let snapshot = FleetSnapshot::empty();
    assert!(snapshot.is_empty());
    assert!(snapshot.get(1).is_none());
}
