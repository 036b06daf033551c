//! Bridge status visible to consumers.

use serde::{Deserialize, Serialize};

/// The coordinator's published state.
///
/// Consumers read this alongside the snapshot to decide how much to trust
/// the data and whether human action is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BridgeStatus {
    /// No refresh cycle has completed yet.
    #[default]
    Uninitialized,
    /// The last cycle succeeded for every vehicle.
    Healthy,
    /// Data is being served but the last cycle was imperfect: some vehicles
    /// degraded to summary-only, or the whole cycle failed transiently and
    /// the previous snapshot is still published.
    Degraded,
    /// Credentials were rejected. The last good snapshot remains readable,
    /// but no refresh will succeed until credentials are re-entered.
    AuthRequired,
}

impl BridgeStatus {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Healthy => "Healthy",
            Self::Degraded => "Degraded",
            Self::AuthRequired => "Auth Required",
        }
    }

    /// Returns true if published data exists and is current or near-current.
    pub fn is_serving(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }

    /// Returns true if credential re-entry is required.
    pub fn needs_reauth(&self) -> bool {
        *self == Self::AuthRequired
    }
}

impl std::fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
