//! Domain models for LubeWatch.
//!
//! This module contains the core data structures representing vehicles,
//! fleet snapshots, maintenance records, and bridge status. The snapshot
//! types preserve the remote API's field names verbatim so that merged
//! entries can be projected without a schema of their own.
//!
//! ## Submodules
//!
//! - [`vehicle`] - Snapshot types (`VehicleId`, `VehicleEntry`, `FleetSnapshot`)
//! - [`records`] - Reminder and fuel record types plus write payloads
//! - [`status`] - Bridge status visible to consumers

mod records;
mod status;
mod vehicle;

// Re-export everything at the models level
pub use records::{
    FuelRecord, NewFuelRecord, NewOdometerRecord, NewReminder, Reminder, ReminderMetric,
};
pub use status::BridgeStatus;
pub use vehicle::{FleetSnapshot, VehicleEntry, VehicleId, VehicleSummary};
