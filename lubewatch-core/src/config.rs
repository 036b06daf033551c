//! Configuration for a bridge instance.
//!
//! A [`BridgeConfig`] describes one remote LubeLogger instance: where it
//! lives, how to authenticate, how often to poll, and how to label the
//! values it produces. Units are a display concern resolved at read time
//! through a [`UnitContext`]; they never change stored values.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default poll interval in seconds (30 minutes).
fn default_scan_interval() -> u64 {
    1800
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Configuration for one LubeLogger bridge instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the LubeLogger instance (e.g. `https://lube.example.org`).
    pub base_url: String,
    /// Username for HTTP Basic authentication.
    pub username: String,
    /// Password for HTTP Basic authentication.
    pub password: String,
    /// Poll interval in seconds.
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
    /// Display currency for cost totals.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Display unit for odometer values.
    #[serde(default)]
    pub distance_unit: DistanceUnit,
}

impl BridgeConfig {
    /// Creates a configuration with default polling and display settings.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            scan_interval_secs: default_scan_interval(),
            currency: default_currency(),
            distance_unit: DistanceUnit::default(),
        }
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Io` if the file cannot be read and
    /// `CoreError::Serialization` if it does not parse.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        debug!(path = %path.display(), "Loading bridge configuration");
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        info!(path = %path.display(), url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the base URL is empty or the
    /// poll interval is zero.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig("base_url is empty".to_string()));
        }
        if self.scan_interval_secs == 0 {
            return Err(CoreError::InvalidConfig(
                "scan_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the poll interval as a [`Duration`].
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Returns the read-time unit context for this configuration.
    pub fn unit_context(&self) -> UnitContext {
        UnitContext {
            currency: self.currency.clone(),
            distance_unit: self.distance_unit,
        }
    }
}

/// User-chosen unit for odometer and distance values.
///
/// This is a label, not a transform: selecting kilometers relabels raw
/// values, it never converts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    /// Miles (default).
    #[default]
    Miles,
    /// Kilometers.
    Kilometers,
}

impl DistanceUnit {
    /// Returns the display label for this unit.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Miles => "miles",
            Self::Kilometers => "kilometers",
        }
    }
}

impl std::fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "miles" | "mi" => Ok(Self::Miles),
            "kilometers" | "km" => Ok(Self::Kilometers),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown distance unit: {other}"
            ))),
        }
    }
}

/// Read-time unit resolution context.
///
/// Projection code resolves sensor units against this context when a value
/// is read, not when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitContext {
    /// Deployment currency for cost sensors.
    pub currency: String,
    /// User-chosen distance unit for odometer sensors.
    pub distance_unit: DistanceUnit,
}

impl Default for UnitContext {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            distance_unit: DistanceUnit::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: BridgeConfig = serde_json::from_str(
            r#"{"base_url":"http://lube.local","username":"u","password":"p"}"#,
        )
        .unwrap();

        assert_eq!(config.scan_interval_secs, 1800);
        assert_eq!(config.scan_interval(), Duration::from_secs(1800));
        assert_eq!(config.currency, "USD");
        assert_eq!(config.distance_unit, DistanceUnit::Miles);
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = BridgeConfig::new("  ", "u", "p");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = BridgeConfig::new("http://lube.local", "u", "p");
        config.scan_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_distance_unit_parse() {
        assert_eq!("km".parse::<DistanceUnit>().unwrap(), DistanceUnit::Kilometers);
        assert_eq!("Miles".parse::<DistanceUnit>().unwrap(), DistanceUnit::Miles);
        assert!("furlongs".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn test_unit_context_from_config() {
        let mut config = BridgeConfig::new("http://lube.local", "u", "p");
        config.currency = "EUR".to_string();
        config.distance_unit = DistanceUnit::Kilometers;

        let units = config.unit_context();
        assert_eq!(units.currency, "EUR");
        assert_eq!(units.distance_unit.label(), "kilometers");
    }
}
