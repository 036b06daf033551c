//! Process-wide registry of active bridge instances.
//!
//! Write operations are registered once per process, not once per
//! configured instance. A dispatched call resolves the owning instance by
//! scanning active instances for one whose published snapshot contains the
//! requested vehicle id.

use lubewatch_core::{NewFuelRecord, NewOdometerRecord, NewReminder, VehicleId};
use lubewatch_fetch::{FetchError, FleetInstance};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from dispatching a write call through the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No registered instance tracks the vehicle.
    #[error("Vehicle {0} not found in any registered instance")]
    VehicleNotFound(VehicleId),

    /// The resolved instance's write operation failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A write operation routed by vehicle id.
#[derive(Debug, Clone)]
pub enum WriteCall {
    /// Add an odometer record.
    Odometer(NewOdometerRecord),
    /// Add a fuel purchase record.
    Fuel(NewFuelRecord),
    /// Add a maintenance reminder.
    Reminder(NewReminder),
}

impl WriteCall {
    /// Returns the target vehicle id.
    pub fn vehicle_id(&self) -> VehicleId {
        match self {
            Self::Odometer(record) => record.vehicle_id,
            Self::Fuel(record) => record.vehicle_id,
            Self::Reminder(reminder) => reminder.vehicle_id,
        }
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Odometer(_) => "add_odometer_record",
            Self::Fuel(_) => "add_gas_record",
            Self::Reminder(_) => "add_reminder",
        }
    }
}

/// Static storage for the process-wide registry.
static GLOBAL: OnceLock<InstanceRegistry> = OnceLock::new();

/// Registry of active bridge instances.
///
/// Most callers use [`InstanceRegistry::global`]; separate registries exist
/// so multi-instance behavior stays testable in isolation.
#[derive(Default)]
pub struct InstanceRegistry {
    instances: RwLock<Vec<Arc<dyn FleetInstance>>>,
}

impl InstanceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry, initializing it on first access.
    pub fn global() -> &'static InstanceRegistry {
        GLOBAL.get_or_init(InstanceRegistry::new)
    }

    /// Registers an instance. Idempotent: registering the same instance
    /// handle again is a no-op and returns false.
    pub fn register(&self, instance: Arc<dyn FleetInstance>) -> bool {
        let mut instances = self.write();
        if instances.iter().any(|known| Arc::ptr_eq(known, &instance)) {
            warn!("Instance already registered; skipping");
            return false;
        }
        instances.push(instance);
        debug!(instances = instances.len(), "Registered bridge instance");
        true
    }

    /// Removes an instance, if registered.
    pub fn deregister(&self, instance: &Arc<dyn FleetInstance>) {
        self.write().retain(|known| !Arc::ptr_eq(known, instance));
    }

    /// Returns the number of registered instances.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no instances are registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Finds the instance whose snapshot tracks the given vehicle.
    pub fn locate(&self, id: VehicleId) -> Option<Arc<dyn FleetInstance>> {
        self.read()
            .iter()
            .find(|instance| instance.contains_vehicle(id))
            .cloned()
    }

    /// Routes a write call to the owning instance.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::VehicleNotFound`] if no instance tracks the
    /// vehicle, or the instance's classified error if the write fails.
    pub async fn dispatch(&self, call: WriteCall) -> Result<(), RegistryError> {
        let vehicle_id = call.vehicle_id();
        let Some(instance) = self.locate(vehicle_id) else {
            warn!(vehicle_id, operation = call.operation(), "Vehicle not found for write call");
            return Err(RegistryError::VehicleNotFound(vehicle_id));
        };
        debug!(vehicle_id, operation = call.operation(), "Dispatching write call");

        match call {
            WriteCall::Odometer(record) => instance.add_odometer_record(&record).await?,
            WriteCall::Fuel(record) => instance.add_gas_record(&record).await?,
            WriteCall::Reminder(reminder) => instance.add_reminder(&reminder).await?,
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<dyn FleetInstance>>> {
        self.instances.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Arc<dyn FleetInstance>>> {
        self.instances.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Instance stub tracking a fixed vehicle set and counting writes.
    struct StubInstance {
        vehicles: Vec<VehicleId>,
        writes: AtomicUsize,
    }

    impl StubInstance {
        fn tracking(vehicles: Vec<VehicleId>) -> Arc<Self> {
            Arc::new(Self {
                vehicles,
                writes: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl FleetInstance for StubInstance {
        fn contains_vehicle(&self, id: VehicleId) -> bool {
            self.vehicles.contains(&id)
        }

        async fn add_odometer_record(
            &self,
            _record: &NewOdometerRecord,
        ) -> Result<(), FetchError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn add_gas_record(&self, _record: &NewFuelRecord) -> Result<(), FetchError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn add_reminder(&self, _reminder: &NewReminder) -> Result<(), FetchError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Api("unexpected status: 500".to_string()))
        }
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = InstanceRegistry::new();
        let instance = StubInstance::tracking(vec![1]);

        assert!(registry.register(instance.clone()));
        assert!(!registry.register(instance));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_locate_scans_all_instances() {
        let registry = InstanceRegistry::new();
        registry.register(StubInstance::tracking(vec![1, 2]));
        registry.register(StubInstance::tracking(vec![7]));

        assert!(registry.locate(7).is_some());
        assert!(registry.locate(99).is_none());
    }

    #[test]
    fn test_deregister() {
        let registry = InstanceRegistry::new();
        let instance: Arc<dyn FleetInstance> = StubInstance::tracking(vec![1]);
        registry.register(instance.clone());
        registry.deregister(&instance);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_owning_instance() {
        let registry = InstanceRegistry::new();
        let first = StubInstance::tracking(vec![1]);
        let second = StubInstance::tracking(vec![2]);
        registry.register(first.clone());
        registry.register(second.clone());

        let record = NewOdometerRecord::new(2, "2026-08-30", 31500.0);
        registry.dispatch(WriteCall::Odometer(record)).await.unwrap();

        assert_eq!(first.writes.load(Ordering::SeqCst), 0);
        assert_eq!(second.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_vehicle() {
        let registry = InstanceRegistry::new();
        registry.register(StubInstance::tracking(vec![1]));

        let record = NewOdometerRecord::new(42, "2026-08-30", 1.0);
        let err = registry.dispatch(WriteCall::Odometer(record)).await.unwrap_err();
        assert!(matches!(err, RegistryError::VehicleNotFound(42)));
    }

    #[tokio::test]
    async fn test_dispatch_propagates_write_failure() {
        let registry = InstanceRegistry::new();
        registry.register(StubInstance::tracking(vec![5]));

        let reminder = NewReminder::new(5, "Oil Change");
        let err = registry.dispatch(WriteCall::Reminder(reminder)).await.unwrap_err();
        assert!(matches!(err, RegistryError::Fetch(FetchError::Api(_))));
    }
}
