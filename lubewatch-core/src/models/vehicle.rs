//! Vehicle snapshot types.
//!
//! This module contains the types published by a refresh cycle:
//! - [`VehicleSummary`] - One row from the vehicle listing call
//! - [`VehicleEntry`] - Merged summary + detail view for one vehicle
//! - [`FleetSnapshot`] - Immutable mapping from id to entry for one cycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::records::{FuelRecord, Reminder};

/// Opaque vehicle identifier assigned by the remote service.
///
/// Stable across refresh cycles; always positive.
pub type VehicleId = u64;

// ============================================================================
// Vehicle Summary
// ============================================================================

/// One vehicle as returned by the listing call.
///
/// Only the `id` field is guaranteed; everything else (make, model, year,
/// license plate, ...) is carried through untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    /// The vehicle identifier.
    pub id: VehicleId,
    /// All remaining summary fields, case preserved.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl VehicleSummary {
    /// Creates a summary with just an id.
    pub fn new(id: VehicleId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Creates a summary with an id and extra fields.
    pub fn with_fields(id: VehicleId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }
}

// ============================================================================
// Vehicle Entry
// ============================================================================

/// The merged view for one vehicle: detail fields overlaid on summary fields.
///
/// Always contains at least the summary fields; detail fields are present
/// only if the detail fetch succeeded in the cycle that produced this entry.
/// Field names and casing come straight from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleEntry {
    fields: Map<String, Value>,
}

impl VehicleEntry {
    /// Builds an entry from a listing-call summary alone.
    pub fn from_summary(summary: &VehicleSummary) -> Self {
        let mut fields = summary.fields.clone();
        fields.insert("id".to_string(), Value::from(summary.id));
        Self { fields }
    }

    /// Overlays detail fields onto this entry. Detail wins on key collision.
    ///
    /// Idempotent: applying the same detail map twice yields the same entry.
    pub fn merge_detail(&mut self, detail: Map<String, Value>) {
        for (key, value) in detail {
            self.fields.insert(key, value);
        }
    }

    /// Returns a raw field value by its wire name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a field as a number, if present and numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// Returns a field as a string, if present and textual.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Returns the vehicle id, if present.
    pub fn id(&self) -> Option<VehicleId> {
        self.fields.get("id").and_then(Value::as_u64)
    }

    /// Returns the next maintenance reminder, if the detail carries one.
    pub fn next_reminder(&self) -> Option<Reminder> {
        let value = self.fields.get("nextReminder")?;
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Returns the last fuel purchase record, if the detail carries one.
    pub fn last_gas_record(&self) -> Option<FuelRecord> {
        let value = self.fields.get("lastGasRecord")?;
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Generates a display name like "2020 Toyota Camry (ABC-123)".
    ///
    /// Falls back to "Vehicle {id}" when no descriptive fields are present.
    pub fn display_name(&self) -> String {
        let year = self
            .fields
            .get("year")
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty() && s != "0");
        let make = self.string("make").map(str::to_string);
        let model = self.string("model").map(str::to_string);
        let plate = self.string("licensePlate").map(str::to_string);

        let mut name = [year, make, model]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(plate) = plate.filter(|p| !p.is_empty()) {
            if name.is_empty() {
                name = plate;
            } else {
                name = format!("{name} ({plate})");
            }
        }

        if name.is_empty() {
            match self.id() {
                Some(id) => format!("Vehicle {id}"),
                None => "Vehicle".to_string(),
            }
        } else {
            name
        }
    }

    /// Returns the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

// ============================================================================
// Fleet Snapshot
// ============================================================================

/// The immutable per-cycle view of the whole fleet.
///
/// Keyed by [`VehicleId`]; the key set equals exactly the ids returned by
/// the listing call of the cycle that produced it. Once published a
/// snapshot is never mutated; the next cycle replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Merged entries, keyed by vehicle id.
    pub vehicles: BTreeMap<VehicleId, VehicleEntry>,
    /// When the cycle that produced this snapshot completed.
    pub fetched_at: DateTime<Utc>,
}

impl FleetSnapshot {
    /// Creates a snapshot from merged entries, stamped with the current time.
    pub fn new(vehicles: BTreeMap<VehicleId, VehicleEntry>) -> Self {
        Self {
            vehicles,
            fetched_at: Utc::now(),
        }
    }

    /// Creates an empty snapshot.
    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Returns the entry for a vehicle, if tracked.
    pub fn get(&self, id: VehicleId) -> Option<&VehicleEntry> {
        self.vehicles.get(&id)
    }

    /// Returns true if the snapshot tracks the given vehicle.
    pub fn contains(&self, id: VehicleId) -> bool {
        self.vehicles.contains_key(&id)
    }

    /// Returns all tracked vehicle ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.vehicles.keys().copied()
    }

    /// Returns the number of tracked vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Returns true if no vehicles are tracked.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(id: VehicleId, extra: Value) -> VehicleSummary {
        let Value::Object(fields) = extra else {
            panic!("extra must be an object");
        };
        VehicleSummary::with_fields(id, fields)
    }

    #[test]
    fn test_entry_contains_summary_fields() {
        let s = summary(3, json!({"make": "Toyota", "model": "Camry"}));
        let entry = VehicleEntry::from_summary(&s);

        assert_eq!(entry.id(), Some(3));
        assert_eq!(entry.string("make"), Some("Toyota"));
        assert_eq!(entry.string("model"), Some("Camry"));
    }

    #[test]
    fn test_merge_detail_wins_on_collision() {
        let s = summary(1, json!({"make": "Toyota", "year": 2018}));
        let mut entry = VehicleEntry::from_summary(&s);

        let Value::Object(detail) = json!({"year": 2020, "lastReportedOdometer": 50000}) else {
            unreachable!()
        };
        entry.merge_detail(detail);

        assert_eq!(entry.number("year"), Some(2020.0));
        assert_eq!(entry.number("lastReportedOdometer"), Some(50000.0));
        assert_eq!(entry.string("make"), Some("Toyota"));
    }

    #[test]
    fn test_merge_detail_is_idempotent() {
        let s = summary(1, json!({"make": "Honda"}));
        let mut entry = VehicleEntry::from_summary(&s);

        let Value::Object(detail) = json!({"serviceRecordCost": 120.5}) else {
            unreachable!()
        };
        entry.merge_detail(detail.clone());
        let once = entry.clone();
        entry.merge_detail(detail);

        assert_eq!(entry, once);
    }

    #[test]
    fn test_next_reminder_absent_and_null() {
        let entry = VehicleEntry::from_summary(&summary(1, json!({})));
        assert!(entry.next_reminder().is_none());

        let mut entry = entry;
        let Value::Object(detail) = json!({"nextReminder": null}) else {
            unreachable!()
        };
        entry.merge_detail(detail);
        assert!(entry.next_reminder().is_none());
    }

    #[test]
    fn test_next_reminder_parsed() {
        let mut entry = VehicleEntry::from_summary(&summary(1, json!({})));
        let Value::Object(detail) = json!({
            "nextReminder": {
                "id": 7,
                "description": "Oil Change",
                "urgency": "Urgent",
                "metric": "Both",
                "dueDate": "2026-09-01",
                "dueOdometer": 51000.0,
                "dueDays": 2,
                "dueDistance": 1000.0
            }
        }) else {
            unreachable!()
        };
        entry.merge_detail(detail);

        let reminder = entry.next_reminder().expect("reminder present");
        assert_eq!(reminder.description.as_deref(), Some("Oil Change"));
        assert_eq!(reminder.due_odometer, Some(51000.0));
    }

    #[test]
    fn test_display_name_variants() {
        let full = VehicleEntry::from_summary(&summary(
            1,
            json!({"year": 2020, "make": "Toyota", "model": "Camry", "licensePlate": "ABC-123"}),
        ));
        assert_eq!(full.display_name(), "2020 Toyota Camry (ABC-123)");

        let plate_only =
            VehicleEntry::from_summary(&summary(2, json!({"licensePlate": "XYZ-999"})));
        assert_eq!(plate_only.display_name(), "XYZ-999");

        let bare = VehicleEntry::from_summary(&summary(9, json!({})));
        assert_eq!(bare.display_name(), "Vehicle 9");
    }

    #[test]
    fn test_snapshot_key_set() {
        let mut vehicles = BTreeMap::new();
        for id in [2, 1, 5] {
            vehicles.insert(
                id,
                VehicleEntry::from_summary(&VehicleSummary::new(id)),
            );
        }
        let snapshot = FleetSnapshot::new(vehicles);

        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.contains(5));
        assert!(!snapshot.contains(4));
        assert_eq!(snapshot.ids().collect::<Vec<_>>(), vec![1, 2, 5]);
    }

    #[test]
    fn test_summary_flatten_roundtrip() {
        let raw = json!({"id": 4, "make": "Ford", "year": 1999});
        let parsed: VehicleSummary = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.id, 4);
        assert_eq!(parsed.fields.get("make"), Some(&json!("Ford")));

        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back, raw);
    }
}
