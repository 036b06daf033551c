//! Snapshot aggregation: one complete refresh cycle.
//!
//! A cycle lists vehicles, fetches every vehicle's detail concurrently,
//! merges detail over summary, and classifies the overall result. A failed
//! detail fetch degrades that one vehicle to summary-only; it never aborts
//! the cycle, keeping the fleet visible when a single detail endpoint is
//! unhealthy.

use futures::future;
use lubewatch_core::{FleetSnapshot, VehicleEntry, VehicleId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::VehicleApi;
use crate::error::FetchError;

/// The result of one refresh cycle.
///
/// Produced once per cycle by the aggregator and consumed immediately by
/// the coordinator to decide what to publish.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Every vehicle merged cleanly.
    Success(FleetSnapshot),
    /// The fleet is visible but some vehicles degraded to summary-only.
    PartialSuccess(FleetSnapshot, BTreeMap<VehicleId, FetchError>),
    /// The listing call was rejected for credentials; no partial data is
    /// meaningful without a valid vehicle list.
    AuthFailure(FetchError),
    /// The listing call failed transiently; the next tick may succeed.
    TransientFailure(FetchError),
}

/// Runs refresh cycles against a [`VehicleApi`].
///
/// Stateless with respect to snapshot data: inputs in, outcome out.
pub struct Aggregator<C: VehicleApi> {
    client: Arc<C>,
}

impl<C: VehicleApi> Aggregator<C> {
    /// Creates an aggregator over the given client.
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Runs one complete refresh cycle.
    ///
    /// Detail fetches for distinct vehicles are issued concurrently; the
    /// merge is keyed by vehicle id, so the resulting snapshot does not
    /// depend on completion order. The snapshot's key set equals exactly
    /// the ids returned by the listing call.
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let summaries = match self.client.vehicles().await {
            Ok(summaries) => summaries,
            Err(err) if err.is_auth() => return RefreshOutcome::AuthFailure(err),
            Err(err) => return RefreshOutcome::TransientFailure(err),
        };
        debug!(vehicles = summaries.len(), "Listed vehicles");

        let fetches = summaries.iter().map(|summary| {
            let client = Arc::clone(&self.client);
            let id = summary.id;
            async move { (id, client.vehicle_info(id).await) }
        });
        let mut details: BTreeMap<VehicleId, _> =
            future::join_all(fetches).await.into_iter().collect();

        let mut vehicles = BTreeMap::new();
        let mut warnings = BTreeMap::new();
        for summary in &summaries {
            let mut entry = VehicleEntry::from_summary(summary);
            match details.remove(&summary.id) {
                Some(Ok(detail)) => entry.merge_detail(detail),
                Some(Err(err)) => {
                    warn!(vehicle_id = summary.id, error = %err, "Failed to fetch vehicle detail");
                    warnings.insert(summary.id, err);
                }
                // A duplicate id in the listing already consumed its detail.
                None => {}
            }
            vehicles.insert(summary.id, entry);
        }

        let snapshot = FleetSnapshot::new(vehicles);
        if warnings.is_empty() {
            RefreshOutcome::Success(snapshot)
        } else {
            RefreshOutcome::PartialSuccess(snapshot, warnings)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
