//! The seam trait between the aggregator and the remote service.
//!
//! The aggregator and coordinator are generic over [`VehicleApi`] so tests
//! can drive them with an in-memory implementation instead of a live
//! LubeLogger instance.

use async_trait::async_trait;
use lubewatch_core::{NewFuelRecord, NewOdometerRecord, NewReminder, VehicleId, VehicleSummary};
use serde_json::{Map, Value};

use crate::error::FetchError;

/// Authenticated operations against one LubeLogger instance.
///
/// Implementors hold fixed credentials and no other cross-call state.
/// Read operations feed the refresh cycle; write operations are invoked on
/// demand and share the same error taxonomy.
#[async_trait]
pub trait VehicleApi: Send + Sync {
    /// Lists all vehicles. Each summary carries at least an `id`.
    async fn vehicles(&self) -> Result<Vec<VehicleSummary>, FetchError>;

    /// Fetches the detail map for one vehicle (cost totals, odometer,
    /// reminders, last fuel record).
    async fn vehicle_info(&self, id: VehicleId) -> Result<Map<String, Value>, FetchError>;

    /// Adds an odometer record.
    async fn add_odometer_record(&self, record: &NewOdometerRecord) -> Result<(), FetchError>;

    /// Adds a fuel purchase record.
    async fn add_gas_record(&self, record: &NewFuelRecord) -> Result<(), FetchError>;

    /// Adds a maintenance reminder.
    async fn add_reminder(&self, reminder: &NewReminder) -> Result<(), FetchError>;
}
