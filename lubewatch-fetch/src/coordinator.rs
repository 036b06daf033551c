//! Refresh coordination: timing, single-flight, and the published view.
//!
//! The coordinator exclusively owns the currently-published snapshot and
//! the most recent error. Each completed cycle swaps in a fresh
//! `Arc<FleetSnapshot>` under a short lock, so readers never observe a
//! partially-merged snapshot and never block on a cycle in progress.

use lubewatch_core::{
    BridgeStatus, FleetSnapshot, NewFuelRecord, NewOdometerRecord, NewReminder, VehicleId,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::aggregator::{Aggregator, RefreshOutcome};
use crate::api::VehicleApi;
use crate::error::FetchError;

/// The coordinator's published state. Written once per completed cycle,
/// read concurrently by any number of consumers.
#[derive(Default)]
struct Published {
    status: BridgeStatus,
    snapshot: Option<Arc<FleetSnapshot>>,
    last_error: Option<String>,
    warnings: BTreeMap<VehicleId, String>,
    /// Completed-cycle counter; drives single-flight coalescing.
    cycle: u64,
}

/// Schedules refresh cycles and publishes their results.
///
/// At most one cycle runs at a time: a refresh request arriving while one
/// is in flight attaches itself to that cycle's result instead of starting
/// a second one. Timer ticks and on-demand requests go through the same
/// gate.
pub struct Coordinator<C: VehicleApi> {
    aggregator: Aggregator<C>,
    interval: Duration,
    published: RwLock<Published>,
    refresh_gate: Mutex<()>,
}

impl<C: VehicleApi> Coordinator<C> {
    /// Creates a coordinator polling at the given interval.
    ///
    /// No cycle runs until [`Coordinator::initialize`] is called.
    pub fn new(client: C, interval: Duration) -> Self {
        Self {
            aggregator: Aggregator::new(client),
            interval,
            published: RwLock::new(Published::default()),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Runs the first refresh cycle.
    ///
    /// There is no prior snapshot to fall back on, so any failure here is
    /// fatal to startup and propagates to the caller instead of being
    /// absorbed into coordinator state.
    ///
    /// # Errors
    ///
    /// Returns the classified error of the failed first cycle.
    pub async fn initialize(&self) -> Result<(), FetchError> {
        let _gate = self.refresh_gate.lock().await;
        match self.aggregator.refresh_once().await {
            outcome @ (RefreshOutcome::Success(_) | RefreshOutcome::PartialSuccess(..)) => {
                self.publish(outcome);
                Ok(())
            }
            RefreshOutcome::AuthFailure(err) | RefreshOutcome::TransientFailure(err) => Err(err),
        }
    }

    /// Requests a refresh and waits for a cycle to complete.
    ///
    /// Single-flight: if a cycle is already in flight, this call waits for
    /// it and returns its result without issuing any network calls of its
    /// own. Returns the published status after the cycle.
    pub async fn request_refresh(&self) -> BridgeStatus {
        let seen = self.read(|p| p.cycle);
        let _gate = self.refresh_gate.lock().await;
        if self.read(|p| p.cycle) != seen {
            // A cycle completed while we waited for the gate; attach to it.
            debug!("Refresh coalesced into completed in-flight cycle");
            return self.status();
        }
        let outcome = self.aggregator.refresh_once().await;
        self.publish(outcome);
        self.status()
    }

    /// Drives the periodic tick loop. Never returns.
    ///
    /// A tick that fires while a cycle is still in flight coalesces into it
    /// through the single-flight gate rather than cancelling anything.
    pub async fn run(self: Arc<Self>) {
        info!(interval_secs = self.interval.as_secs(), "Starting refresh loop");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; initialize() already covered it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.request_refresh().await;
        }
    }

    /// Returns the last published snapshot. Non-blocking.
    pub fn snapshot(&self) -> Option<Arc<FleetSnapshot>> {
        self.read(|p| p.snapshot.clone())
    }

    /// Returns the published status.
    pub fn status(&self) -> BridgeStatus {
        self.read(|p| p.status)
    }

    /// Returns the most recent cycle-level error, if any.
    pub fn last_error(&self) -> Option<String> {
        self.read(|p| p.last_error.clone())
    }

    /// Returns the last cycle's per-vehicle warnings.
    pub fn warnings(&self) -> BTreeMap<VehicleId, String> {
        self.read(|p| p.warnings.clone())
    }

    /// Returns true if the published snapshot tracks the given vehicle.
    pub fn contains_vehicle(&self, id: VehicleId) -> bool {
        self.read(|p| p.snapshot.as_ref().is_some_and(|s| s.contains(id)))
    }

    /// Adds an odometer record, then refreshes so the snapshot reflects it.
    ///
    /// # Errors
    ///
    /// Returns the write's classified error; a failed write triggers no
    /// refresh and has no side effect on the published snapshot.
    pub async fn add_odometer_record(&self, record: &NewOdometerRecord) -> Result<(), FetchError> {
        self.aggregator.client().add_odometer_record(record).await?;
        debug!(vehicle_id = record.vehicle_id, "Added odometer record");
        self.request_refresh().await;
        Ok(())
    }

    /// Adds a fuel purchase record, then refreshes.
    ///
    /// # Errors
    ///
    /// Same contract as [`Coordinator::add_odometer_record`].
    pub async fn add_gas_record(&self, record: &NewFuelRecord) -> Result<(), FetchError> {
        self.aggregator.client().add_gas_record(record).await?;
        debug!(vehicle_id = record.vehicle_id, "Added fuel record");
        self.request_refresh().await;
        Ok(())
    }

    /// Adds a maintenance reminder, then refreshes.
    ///
    /// # Errors
    ///
    /// Same contract as [`Coordinator::add_odometer_record`].
    pub async fn add_reminder(&self, reminder: &NewReminder) -> Result<(), FetchError> {
        self.aggregator.client().add_reminder(reminder).await?;
        debug!(vehicle_id = reminder.vehicle_id, "Added reminder");
        self.request_refresh().await;
        Ok(())
    }

    /// Publishes a cycle's outcome.
    fn publish(&self, outcome: RefreshOutcome) {
        let mut published = self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        published.cycle += 1;

        match outcome {
            RefreshOutcome::Success(snapshot) => {
                info!(vehicles = snapshot.len(), "Refresh cycle succeeded");
                published.snapshot = Some(Arc::new(snapshot));
                published.status = BridgeStatus::Healthy;
                published.last_error = None;
                published.warnings.clear();
            }
            RefreshOutcome::PartialSuccess(snapshot, warnings) => {
                info!(
                    vehicles = snapshot.len(),
                    degraded = warnings.len(),
                    "Refresh cycle partially succeeded"
                );
                published.snapshot = Some(Arc::new(snapshot));
                published.status = BridgeStatus::Degraded;
                published.last_error = None;
                published.warnings = warnings
                    .into_iter()
                    .map(|(id, err)| (id, err.to_string()))
                    .collect();
            }
            RefreshOutcome::AuthFailure(err) => {
                // Last good snapshot stays readable; refreshes cannot
                // succeed until credentials are re-entered.
                error!(error = %err, "Authentication failed; re-entry required");
                published.status = BridgeStatus::AuthRequired;
                published.last_error = Some(err.to_string());
            }
            RefreshOutcome::TransientFailure(err) => {
                // Previous snapshot stays published unchanged; the next
                // tick is an independent attempt.
                warn!(error = %err, "Refresh cycle failed transiently");
                published.status = BridgeStatus::Degraded;
                published.last_error = Some(err.to_string());
            }
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Published) -> T) -> T {
        let published = self
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&published)
    }
}

// ============================================================================
// Fleet Instance
// ============================================================================

/// The surface the write-operation registry needs from a bridge instance:
/// vehicle membership plus the three write operations.
#[async_trait]
pub trait FleetInstance: Send + Sync {
    /// Returns true if this instance's snapshot tracks the vehicle.
    fn contains_vehicle(&self, id: VehicleId) -> bool;

    /// Adds an odometer record through this instance.
    async fn add_odometer_record(&self, record: &NewOdometerRecord) -> Result<(), FetchError>;

    /// Adds a fuel purchase record through this instance.
    async fn add_gas_record(&self, record: &NewFuelRecord) -> Result<(), FetchError>;

    /// Adds a maintenance reminder through this instance.
    async fn add_reminder(&self, reminder: &NewReminder) -> Result<(), FetchError>;
}

#[async_trait]
impl<C: VehicleApi + 'static> FleetInstance for Coordinator<C> {
    fn contains_vehicle(&self, id: VehicleId) -> bool {
        Coordinator::contains_vehicle(self, id)
    }

    async fn add_odometer_record(&self, record: &NewOdometerRecord) -> Result<(), FetchError> {
        Coordinator::add_odometer_record(self, record).await
    }

    async fn add_gas_record(&self, record: &NewFuelRecord) -> Result<(), FetchError> {
        Coordinator::add_gas_record(self, record).await
    }

    async fn add_reminder(&self, reminder: &NewReminder) -> Result<(), FetchError> {
        Coordinator::add_reminder(self, reminder).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailWith, MockApi};
    use serde_json::json;

    fn mock_with_fleet() -> MockApi {
        let mock = MockApi::new();
        mock.add_vehicle(
            1,
            json!({"make": "Toyota"}),
            json!({"lastReportedOdometer": 50000}),
        );
        mock.add_vehicle(
            2,
            json!({"make": "Honda"}),
            json!({"lastReportedOdometer": 31000}),
        );
        mock
    }

    fn coordinator(mock: MockApi) -> Coordinator<MockApi> {
        Coordinator::new(mock, Duration::from_secs(1800))
    }

    #[tokio::test]
    async fn test_initialize_publishes_healthy_snapshot() {
        let coordinator = coordinator(mock_with_fleet());
        coordinator.initialize().await.unwrap();

        assert_eq!(coordinator.status(), BridgeStatus::Healthy);
        let snapshot = coordinator.snapshot().unwrap();
        assert_eq!(snapshot.ids().collect::<Vec<_>>(), vec![1, 2]);
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test]
    async fn test_initialize_failure_is_fatal() {
        let mock = mock_with_fleet();
        mock.fail_listing(Some(FailWith::Connection));
        let coordinator = coordinator(mock);

        let err = coordinator.initialize().await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(coordinator.status(), BridgeStatus::Uninitialized);
        assert!(coordinator.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_partial_success_degrades_and_surfaces_warnings() {
        let mock = mock_with_fleet();
        mock.fail_detail(2);
        let coordinator = coordinator(mock);
        coordinator.initialize().await.unwrap();

        assert_eq!(coordinator.status(), BridgeStatus::Degraded);
        let snapshot = coordinator.snapshot().unwrap();
        assert!(snapshot.contains(2));
        assert!(snapshot.get(2).unwrap().get("lastReportedOdometer").is_none());
        assert!(coordinator.warnings().contains_key(&2));
    }

    #[tokio::test]
    async fn test_transient_failure_preserves_published_snapshot() {
        let mock = mock_with_fleet();
        let coordinator = coordinator(mock);
        coordinator.initialize().await.unwrap();
        let before = coordinator.snapshot().unwrap();

        coordinator
            .aggregator
            .client()
            .fail_listing(Some(FailWith::Connection));
        coordinator.request_refresh().await;

        assert_eq!(coordinator.status(), BridgeStatus::Degraded);
        assert!(coordinator.last_error().is_some());
        let after = coordinator.snapshot().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_auth_failure_flags_reauth_and_retains_snapshot() {
        let coordinator = coordinator(mock_with_fleet());
        coordinator.initialize().await.unwrap();
        let before = coordinator.snapshot().unwrap();

        coordinator
            .aggregator
            .client()
            .fail_listing(Some(FailWith::Auth));
        let status = coordinator.request_refresh().await;

        assert_eq!(status, BridgeStatus::AuthRequired);
        assert!(status.needs_reauth());
        let after = coordinator.snapshot().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_recovery_returns_to_healthy() {
        let coordinator = coordinator(mock_with_fleet());
        coordinator.initialize().await.unwrap();

        coordinator
            .aggregator
            .client()
            .fail_listing(Some(FailWith::Api));
        coordinator.request_refresh().await;
        assert_eq!(coordinator.status(), BridgeStatus::Degraded);

        coordinator.aggregator.client().fail_listing(None);
        coordinator.request_refresh().await;
        assert_eq!(coordinator.status(), BridgeStatus::Healthy);
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_are_single_flight() {
        let mock = mock_with_fleet();
        mock.set_list_delay(Duration::from_millis(100));
        let coordinator = Arc::new(coordinator(mock));
        coordinator.initialize().await.unwrap();
        assert_eq!(coordinator.aggregator.client().list_calls(), 1);

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move { coordinator.request_refresh().await })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), BridgeStatus::Healthy);
        }

        // Exactly one underlying cycle beyond the initial one.
        assert_eq!(coordinator.aggregator.client().list_calls(), 2);
    }

    #[tokio::test]
    async fn test_write_triggers_refresh() {
        let coordinator = coordinator(mock_with_fleet());
        coordinator.initialize().await.unwrap();
        assert_eq!(coordinator.aggregator.client().list_calls(), 1);

        let record = NewOdometerRecord::new(1, "2026-08-30", 50500.0);
        coordinator.add_odometer_record(&record).await.unwrap();

        assert_eq!(coordinator.aggregator.client().list_calls(), 2);
    }

    #[tokio::test]
    async fn test_contains_vehicle() {
        let coordinator = coordinator(mock_with_fleet());
        assert!(!coordinator.contains_vehicle(1));
        coordinator.initialize().await.unwrap();
        assert!(coordinator.contains_vehicle(1));
        assert!(!coordinator.contains_vehicle(99));
    }
}
