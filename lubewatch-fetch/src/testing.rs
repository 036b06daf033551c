//! In-memory `VehicleApi` implementation for tests.

use async_trait::async_trait;
use lubewatch_core::{
    NewFuelRecord, NewOdometerRecord, NewReminder, VehicleId, VehicleSummary,
};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::VehicleApi;
use crate::error::FetchError;

/// Which classified error a mock call should fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailWith {
    Auth,
    Connection,
    Api,
}

impl FailWith {
    fn to_error(self) -> FetchError {
        match self {
            Self::Auth => FetchError::Auth("credentials rejected".to_string()),
            Self::Connection => FetchError::Connection("connection reset".to_string()),
            Self::Api => FetchError::Api("unexpected status: 500".to_string()),
        }
    }
}

/// Scriptable in-memory remote service.
///
/// Behavior fields sit behind mutexes so tests can reconfigure failures
/// between cycles on a shared instance.
#[derive(Default)]
pub struct MockApi {
    pub summaries: Mutex<Vec<VehicleSummary>>,
    pub details: Mutex<HashMap<VehicleId, Map<String, Value>>>,
    /// Fail the listing call with this classification.
    pub list_failure: Mutex<Option<FailWith>>,
    /// Vehicle ids whose detail fetch fails with a connection error.
    pub detail_failures: Mutex<HashSet<VehicleId>>,
    /// Artificial latency for the listing call.
    pub list_delay: Mutex<Option<Duration>>,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vehicle(&self, id: VehicleId, summary: Value, detail: Value) {
        let Value::Object(summary_fields) = summary else {
            panic!("summary must be an object");
        };
        let Value::Object(detail_fields) = detail else {
            panic!("detail must be an object");
        };
        self.summaries
            .lock()
            .unwrap()
            .push(VehicleSummary::with_fields(id, summary_fields));
        self.details.lock().unwrap().insert(id, detail_fields);
    }

    pub fn fail_listing(&self, failure: Option<FailWith>) {
        *self.list_failure.lock().unwrap() = failure;
    }

    pub fn fail_detail(&self, id: VehicleId) {
        self.detail_failures.lock().unwrap().insert(id);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VehicleApi for MockApi {
    async fn vehicles(&self) -> Result<Vec<VehicleSummary>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = *self.list_failure.lock().unwrap() {
            return Err(failure.to_error());
        }
        Ok(self.summaries.lock().unwrap().clone())
    }

    async fn vehicle_info(&self, id: VehicleId) -> Result<Map<String, Value>, FetchError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.detail_failures.lock().unwrap().contains(&id) {
            return Err(FailWith::Connection.to_error());
        }
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| FailWith::Api.to_error())
    }

    async fn add_odometer_record(&self, _record: &NewOdometerRecord) -> Result<(), FetchError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_gas_record(&self, _record: &NewFuelRecord) -> Result<(), FetchError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_reminder(&self, _reminder: &NewReminder) -> Result<(), FetchError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
