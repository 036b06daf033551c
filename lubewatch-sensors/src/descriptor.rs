//! Sensor descriptor table.
//!
//! Each descriptor carries a pure extraction function, an optional side
//! attributes function, and a unit-kind tag. Values are raw passthrough
//! from the snapshot; the unit is a label resolved at read time from the
//! [`UnitContext`], never a numeric transform.

use lubewatch_core::{UnitContext, VehicleEntry};
use serde::Serialize;
use serde_json::{json, Map, Value};

// Sensor keys
const SENSOR_SERVICE_COST: &str = "service_record_cost";
const SENSOR_REPAIR_COST: &str = "repair_record_cost";
const SENSOR_UPGRADE_COST: &str = "upgrade_record_cost";
const SENSOR_TAX_COST: &str = "tax_record_cost";
const SENSOR_GAS_COST: &str = "gas_record_cost";
const SENSOR_ODOMETER: &str = "last_reported_odometer";
const SENSOR_NEXT_REMINDER: &str = "next_reminder";

/// How a sensor's unit is resolved at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Deployment's configured currency.
    Currency,
    /// User-chosen distance unit (default miles).
    Distance,
}

/// One derived value over a vehicle snapshot entry.
///
/// Descriptors are immutable records, enumerated in [`SENSORS`]; there is
/// no per-sensor type hierarchy.
pub struct SensorDescriptor {
    /// Stable sensor key.
    pub key: &'static str,
    /// Unit-kind tag, if the value carries a unit.
    pub unit: Option<UnitKind>,
    value_fn: fn(&VehicleEntry) -> Option<Value>,
    attributes_fn: Option<fn(&VehicleEntry) -> Map<String, Value>>,
}

impl SensorDescriptor {
    /// Extracts this sensor's value from an entry. Total: a missing source
    /// field yields `None`.
    pub fn value(&self, entry: &VehicleEntry) -> Option<Value> {
        (self.value_fn)(entry)
    }

    /// Extracts this sensor's side attributes, or an empty set.
    pub fn attributes(&self, entry: &VehicleEntry) -> Map<String, Value> {
        self.attributes_fn.map_or_else(Map::new, |f| f(entry))
    }

    /// Resolves the unit label against the given context.
    pub fn unit_label(&self, units: &UnitContext) -> Option<String> {
        match self.unit? {
            UnitKind::Currency => Some(units.currency.clone()),
            UnitKind::Distance => Some(units.distance_unit.label().to_string()),
        }
    }
}

/// The fixed sensor table: five cost totals, the odometer, and the next
/// reminder.
pub const SENSORS: &[SensorDescriptor] = &[
    SensorDescriptor {
        key: SENSOR_SERVICE_COST,
        unit: Some(UnitKind::Currency),
        value_fn: |entry| field(entry, "serviceRecordCost"),
        attributes_fn: None,
    },
    SensorDescriptor {
        key: SENSOR_REPAIR_COST,
        unit: Some(UnitKind::Currency),
        value_fn: |entry| field(entry, "repairRecordCost"),
        attributes_fn: None,
    },
    SensorDescriptor {
        key: SENSOR_UPGRADE_COST,
        unit: Some(UnitKind::Currency),
        value_fn: |entry| field(entry, "upgradeRecordCost"),
        attributes_fn: None,
    },
    SensorDescriptor {
        key: SENSOR_TAX_COST,
        unit: Some(UnitKind::Currency),
        value_fn: |entry| field(entry, "taxRecordCost"),
        attributes_fn: None,
    },
    SensorDescriptor {
        key: SENSOR_GAS_COST,
        unit: Some(UnitKind::Currency),
        value_fn: |entry| field(entry, "gasRecordCost"),
        attributes_fn: Some(gas_record_attributes),
    },
    SensorDescriptor {
        key: SENSOR_ODOMETER,
        unit: Some(UnitKind::Distance),
        value_fn: |entry| field(entry, "lastReportedOdometer"),
        attributes_fn: None,
    },
    SensorDescriptor {
        key: SENSOR_NEXT_REMINDER,
        unit: None,
        value_fn: |entry| {
            entry
                .next_reminder()
                .and_then(|r| r.description)
                .map(Value::String)
        },
        attributes_fn: Some(reminder_attributes),
    },
];

/// Looks up a descriptor by key.
pub fn sensor(key: &str) -> Option<&'static SensorDescriptor> {
    SENSORS.iter().find(|d| d.key == key)
}

/// Raw field passthrough; nulls count as absent.
fn field(entry: &VehicleEntry, key: &str) -> Option<Value> {
    entry.get(key).filter(|v| !v.is_null()).cloned()
}

/// Extracts reminder attributes from the `nextReminder` object, or an
/// empty set when absent.
fn reminder_attributes(entry: &VehicleEntry) -> Map<String, Value> {
    let Some(reminder) = entry.next_reminder() else {
        return Map::new();
    };

    let mut attributes = Map::new();
    attributes.insert("reminder_id".to_string(), json!(reminder.id));
    attributes.insert("urgency".to_string(), json!(reminder.urgency));
    attributes.insert("metric".to_string(), json!(reminder.metric));
    attributes.insert("due_date".to_string(), json!(reminder.due_date));
    attributes.insert("due_odometer".to_string(), json!(reminder.due_odometer));
    attributes.insert("due_days".to_string(), json!(reminder.due_days));
    attributes.insert("due_distance".to_string(), json!(reminder.due_distance));
    attributes.insert("tags".to_string(), json!(reminder.tags));
    attributes
}

/// Extracts last-fuel-purchase attributes from the `lastGasRecord` object,
/// or an empty set when absent.
fn gas_record_attributes(entry: &VehicleEntry) -> Map<String, Value> {
    let Some(record) = entry.last_gas_record() else {
        return Map::new();
    };

    let mut attributes = Map::new();
    attributes.insert("last_odometer".to_string(), json!(record.odometer));
    attributes.insert("last_date".to_string(), json!(record.date));
    attributes.insert("last_fuel_consumed".to_string(), json!(record.fuel_consumed));
    attributes.insert("last_cost".to_string(), json!(record.cost));
    attributes
}

// ============================================================================
// Projection
// ============================================================================

/// One projected sensor value with its resolved unit and side attributes.
#[derive(Debug, Clone, Serialize)]
pub struct SensorReading {
    /// Stable sensor key.
    pub key: &'static str,
    /// Extracted value, absent if the source field is missing.
    pub value: Option<Value>,
    /// Resolved unit label, if the sensor carries one.
    pub unit: Option<String>,
    /// Side attributes; empty when the nested source object is absent.
    pub attributes: Map<String, Value>,
}

/// Projects every sensor over one vehicle entry.
pub fn project(entry: &VehicleEntry, units: &UnitContext) -> Vec<SensorReading> {
    SENSORS
        .iter()
        .map(|descriptor| SensorReading {
            key: descriptor.key,
            value: descriptor.value(entry),
            unit: descriptor.unit_label(units),
            attributes: descriptor.attributes(entry),
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
