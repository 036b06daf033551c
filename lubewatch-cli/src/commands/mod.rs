//! CLI command implementations.

pub mod check;
pub mod records;
pub mod sensors;
pub mod vehicles;
pub mod watch;

use anyhow::Result;
use lubewatch_fetch::{Aggregator, LubeLoggerClient, RefreshOutcome};
use tracing::warn;

use crate::Cli;

/// Builds a client from the resolved CLI configuration.
pub fn client(cli: &Cli) -> Result<LubeLoggerClient> {
    let config = cli.bridge_config()?;
    Ok(LubeLoggerClient::new(&config)?)
}

/// Runs one refresh cycle for one-shot commands, logging per-vehicle
/// warnings and failing on cycle-level errors.
pub async fn snapshot_once(
    aggregator: &Aggregator<LubeLoggerClient>,
) -> Result<lubewatch_core::FleetSnapshot> {
    match aggregator.refresh_once().await {
        RefreshOutcome::Success(snapshot) => Ok(snapshot),
        RefreshOutcome::PartialSuccess(snapshot, warnings) => {
            for (vehicle_id, err) in warnings {
                warn!(vehicle_id, error = %err, "Vehicle degraded to summary-only");
            }
            Ok(snapshot)
        }
        RefreshOutcome::AuthFailure(err) | RefreshOutcome::TransientFailure(err) => {
            Err(err.into())
        }
    }
}
