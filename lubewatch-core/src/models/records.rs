//! Maintenance record types.
//!
//! Read-side types ([`Reminder`], [`FuelRecord`]) are parsed out of the
//! merged vehicle entry and tolerate any missing field. Write-side payloads
//! ([`NewOdometerRecord`], [`NewFuelRecord`], [`NewReminder`]) serialize to
//! the exact camelCase bodies the remote API expects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::vehicle::VehicleId;

// ============================================================================
// Read-side types
// ============================================================================

/// An upcoming maintenance reminder from the `nextReminder` detail field.
///
/// Every field is optional: a reminder with holes still projects cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reminder {
    /// Reminder identifier.
    pub id: Option<i64>,
    /// Short text description (e.g. "Oil Change").
    pub description: Option<String>,
    /// Urgency tag assigned by the server.
    pub urgency: Option<String>,
    /// Tracking metric ("Date", "Odometer", or "Both").
    pub metric: Option<String>,
    /// Due date, as formatted by the server.
    pub due_date: Option<String>,
    /// Odometer reading the reminder is due at.
    pub due_odometer: Option<f64>,
    /// Days remaining until due.
    pub due_days: Option<i64>,
    /// Distance remaining until due.
    pub due_distance: Option<f64>,
    /// Free-form tags.
    pub tags: Option<Value>,
}

/// The last fuel purchase from the `lastGasRecord` detail field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuelRecord {
    /// Odometer reading at fill-up.
    pub odometer: Option<f64>,
    /// Purchase date, as formatted by the server.
    pub date: Option<String>,
    /// Amount of fuel added.
    pub fuel_consumed: Option<f64>,
    /// Total cost of the purchase.
    pub cost: Option<f64>,
}

// ============================================================================
// Write payloads
// ============================================================================

/// How a reminder is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReminderMetric {
    /// Due on a calendar date.
    Date,
    /// Due at an odometer reading.
    Odometer,
    /// Due on whichever comes first (default).
    #[default]
    Both,
}

impl std::fmt::Display for ReminderMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Date => "Date",
            Self::Odometer => "Odometer",
            Self::Both => "Both",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for ReminderMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "odometer" => Ok(Self::Odometer),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown reminder metric: {other}")),
        }
    }
}

/// Payload for `/api/vehicle/odometerrecords/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOdometerRecord {
    /// Target vehicle.
    pub vehicle_id: VehicleId,
    /// Reading date (YYYY-MM-DD).
    pub date: String,
    /// Odometer reading value.
    pub odometer: f64,
    /// Optional notes.
    pub notes: String,
    /// Optional comma-separated tags.
    pub tags: String,
}

impl NewOdometerRecord {
    /// Creates a record with empty notes and tags.
    pub fn new(vehicle_id: VehicleId, date: impl Into<String>, odometer: f64) -> Self {
        Self {
            vehicle_id,
            date: date.into(),
            odometer,
            notes: String::new(),
            tags: String::new(),
        }
    }
}

/// Payload for `/api/vehicle/gasrecords/add`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFuelRecord {
    /// Target vehicle.
    pub vehicle_id: VehicleId,
    /// Purchase date (YYYY-MM-DD).
    pub date: String,
    /// Odometer reading at fill-up.
    pub odometer: f64,
    /// Amount of fuel added (gallons, liters, kWh, ...).
    pub fuel_consumed: f64,
    /// Total cost of the fuel.
    pub cost: f64,
    /// Whether this was a complete fill-up.
    pub is_fill_to_full: bool,
    /// Whether a previous fill-up went unrecorded.
    pub missed_fuel_up: bool,
    /// Optional notes.
    pub notes: String,
    /// Optional comma-separated tags.
    pub tags: String,
}

impl NewFuelRecord {
    /// Creates a record with the API's defaults: full fill-up, nothing missed.
    pub fn new(
        vehicle_id: VehicleId,
        date: impl Into<String>,
        odometer: f64,
        fuel_consumed: f64,
        cost: f64,
    ) -> Self {
        Self {
            vehicle_id,
            date: date.into(),
            odometer,
            fuel_consumed,
            cost,
            is_fill_to_full: true,
            missed_fuel_up: false,
            notes: String::new(),
            tags: String::new(),
        }
    }
}

/// Payload for `/api/vehicle/reminders/add`.
///
/// `due_date` and `due_odometer` are omitted from the body entirely when
/// unset; the server treats an explicit null differently from absence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReminder {
    /// Target vehicle.
    pub vehicle_id: VehicleId,
    /// Reminder description (e.g. "Oil Change").
    pub description: String,
    /// Tracking metric.
    pub metric: ReminderMetric,
    /// Optional notes.
    pub notes: String,
    /// Optional comma-separated tags.
    pub tags: String,
    /// Optional due date (YYYY-MM-DD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Optional due odometer reading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_odometer: Option<f64>,
}

impl NewReminder {
    /// Creates a reminder tracked by both date and odometer.
    pub fn new(vehicle_id: VehicleId, description: impl Into<String>) -> Self {
        Self {
            vehicle_id,
            description: description.into(),
            metric: ReminderMetric::Both,
            notes: String::new(),
            tags: String::new(),
            due_date: None,
            due_odometer: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
