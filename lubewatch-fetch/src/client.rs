//! HTTP client for the LubeLogger API.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lubewatch_core::{
    BridgeConfig, NewFuelRecord, NewOdometerRecord, NewReminder, VehicleId, VehicleSummary,
};
use reqwest::{header, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::VehicleApi;
use crate::error::FetchError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// API endpoints
const API_VEHICLES: &str = "/api/vehicles";
const API_VEHICLE_INFO: &str = "/api/vehicle/info";
const API_ADD_ODOMETER: &str = "/api/vehicle/odometerrecords/add";
const API_ADD_GAS: &str = "/api/vehicle/gasrecords/add";
const API_ADD_REMINDER: &str = "/api/vehicle/reminders/add";

/// Header whose presence makes the server format numbers and dates
/// locale-invariantly. The value is irrelevant.
const CULTURE_INVARIANT_HEADER: &str = "culture-invariant";

/// Write-operation confirmation body. Fields are advisory.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Confirmation {
    success: Option<bool>,
    message: Option<String>,
}

/// Authenticated client for one LubeLogger instance.
///
/// Stateless except for fixed credentials: the Basic auth header is
/// computed once at construction and reused verbatim for every request.
#[derive(Debug, Clone)]
pub struct LubeLoggerClient {
    inner: Client,
    base_url: String,
    auth_header: String,
}

impl LubeLoggerClient {
    /// Creates a client for the given bridge configuration.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Config` if the base URL does not parse or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &BridgeConfig) -> Result<Self, FetchError> {
        Self::with_timeout(config, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Same as [`LubeLoggerClient::new`].
    pub fn with_timeout(config: &BridgeConfig, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| FetchError::Config(format!("invalid base URL {base_url:?}: {e}")))?;

        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lubewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner,
            base_url,
            auth_header: auth_header_value(&config.username, &config.password),
        })
    }

    /// Issues one authenticated request and parses the JSON response.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T, FetchError> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!(method = %method, url = %url, "Issuing API request");

        let mut request = self
            .inner
            .request(method, &url)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(CULTURE_INVARIANT_HEADER, "")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Auth("credentials rejected".to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Api(format!("unexpected status: {status}")));
        }

        Ok(response.json::<T>().await?)
    }

    /// Checks whether the instance is reachable with the configured
    /// credentials.
    pub async fn test_connection(&self) -> bool {
        self.vehicles().await.is_ok()
    }

    /// Lists all vehicles.
    ///
    /// # Errors
    ///
    /// Classified per [`FetchError`].
    pub async fn vehicles(&self) -> Result<Vec<VehicleSummary>, FetchError> {
        self.request(Method::GET, API_VEHICLES, None, None::<&()>)
            .await
    }

    /// Fetches the detail map for one vehicle.
    ///
    /// # Errors
    ///
    /// Classified per [`FetchError`].
    pub async fn vehicle_info(&self, id: VehicleId) -> Result<Map<String, Value>, FetchError> {
        self.request(
            Method::GET,
            API_VEHICLE_INFO,
            Some(&[("VehicleId", id.to_string())]),
            None::<&()>,
        )
        .await
    }

    /// Posts a write operation and logs the server's confirmation.
    async fn submit(
        &self,
        endpoint: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<(), FetchError> {
        let confirmation: Confirmation = self.request(Method::POST, endpoint, None, Some(body)).await?;
        if let Some(message) = confirmation.message {
            debug!(endpoint, success = ?confirmation.success, message, "Write confirmed");
        }
        Ok(())
    }

    /// Adds an odometer record.
    ///
    /// # Errors
    ///
    /// Classified per [`FetchError`]; a failed write has no side effect.
    pub async fn add_odometer_record(&self, record: &NewOdometerRecord) -> Result<(), FetchError> {
        self.submit(API_ADD_ODOMETER, record).await
    }

    /// Adds a fuel purchase record.
    ///
    /// # Errors
    ///
    /// Classified per [`FetchError`]; a failed write has no side effect.
    pub async fn add_gas_record(&self, record: &NewFuelRecord) -> Result<(), FetchError> {
        self.submit(API_ADD_GAS, record).await
    }

    /// Adds a maintenance reminder.
    ///
    /// # Errors
    ///
    /// Classified per [`FetchError`]; a failed write has no side effect.
    pub async fn add_reminder(&self, reminder: &NewReminder) -> Result<(), FetchError> {
        self.submit(API_ADD_REMINDER, reminder).await
    }
}

#[async_trait]
impl VehicleApi for LubeLoggerClient {
    async fn vehicles(&self) -> Result<Vec<VehicleSummary>, FetchError> {
        LubeLoggerClient::vehicles(self).await
    }

    async fn vehicle_info(&self, id: VehicleId) -> Result<Map<String, Value>, FetchError> {
        LubeLoggerClient::vehicle_info(self, id).await
    }

    async fn add_odometer_record(&self, record: &NewOdometerRecord) -> Result<(), FetchError> {
        LubeLoggerClient::add_odometer_record(self, record).await
    }

    async fn add_gas_record(&self, record: &NewFuelRecord) -> Result<(), FetchError> {
        LubeLoggerClient::add_gas_record(self, record).await
    }

    async fn add_reminder(&self, reminder: &NewReminder) -> Result<(), FetchError> {
        LubeLoggerClient::add_reminder(self, reminder).await
    }
}

/// Computes the Basic auth header value from fixed credentials.
fn auth_header_value(username: &str, password: &str) -> String {
    let encoded = BASE64.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}
