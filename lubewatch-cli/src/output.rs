//! Text output formatting.

use lubewatch_core::{BridgeStatus, FleetSnapshot};
use lubewatch_sensors::SensorReading;
use serde_json::Value;
use std::fmt::Write as _;

/// Formats snapshots and readings for terminal output.
pub struct TextFormatter {
    color: bool,
}

impl TextFormatter {
    /// Creates a formatter; `color` enables ANSI styling.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Formats the fleet as one line per vehicle.
    pub fn format_fleet(&self, snapshot: &FleetSnapshot) -> String {
        let mut out = String::new();
        for (id, entry) in &snapshot.vehicles {
            let odometer = entry
                .number("lastReportedOdometer")
                .map_or_else(|| "-".to_string(), |v| format!("{v:.0}"));
            let reminder = entry
                .next_reminder()
                .and_then(|r| r.description)
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "{:>4}  {:<32} odo {:>8}  next: {}",
                id,
                self.bold(&entry.display_name()),
                odometer,
                reminder
            );
        }
        if out.is_empty() {
            out.push_str("No vehicles tracked.\n");
        }
        out
    }

    /// Formats a status line with the last cycle error, if any.
    pub fn format_status(&self, status: BridgeStatus, last_error: Option<&str>) -> String {
        let label = match status {
            BridgeStatus::Healthy => self.colored("32", status.label()),
            BridgeStatus::Degraded => self.colored("33", status.label()),
            BridgeStatus::AuthRequired => self.colored("31", status.label()),
            BridgeStatus::Uninitialized => status.label().to_string(),
        };
        match last_error {
            Some(err) => format!("Status: {label} ({err})"),
            None => format!("Status: {label}"),
        }
    }

    /// Formats projected sensor readings, one per line.
    pub fn format_readings(&self, readings: &[SensorReading]) -> String {
        let mut out = String::new();
        for reading in readings {
            let value = match &reading.value {
                Some(Value::String(s)) => s.clone(),
                Some(v) => v.to_string(),
                None => "-".to_string(),
            };
            let unit = reading.unit.as_deref().unwrap_or("");
            let _ = writeln!(out, "{:<24} {value} {unit}", reading.key);
            for (key, attr) in &reading.attributes {
                if !attr.is_null() {
                    let _ = writeln!(out, "    {key}: {attr}");
                }
            }
        }
        out
    }

    fn bold(&self, text: &str) -> String {
        self.colored("1", text)
    }

    fn colored(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}
