//! HTTP-based `TravelMetricsProvider` using OSRM's Table API.
//!
//! The [`TravelMetricsProvider`] trait is synchronous. This provider bridges
//! the async HTTP call to the sync interface by blocking on a Tokio runtime
//! internally.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use sharedpath_core::{Location, TravelMetrics, TravelMetricsError, TravelMetricsProvider};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::osrm::TableResponse;

/// Error type for [`HttpTravelMetricsProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default OSRM endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "sharedpath-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpTravelMetricsProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTravelMetricsProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Routing profile segment of the request path.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpTravelMetricsProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTravelMetricsProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the routing profile (`driving`, `walking`, ...).
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Travel metrics provider using the OSRM Table API.
///
/// Owns a Tokio runtime reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider uses its own runtime. Inside a
/// multi-threaded runtime it blocks via [`tokio::task::block_in_place`] on the
/// caller's handle. Inside a `current_thread` runtime it falls back to its own
/// runtime, which may deadlock if the caller's runtime drives IO this request
/// depends on.
pub struct HttpTravelMetricsProvider {
    client: Client,
    config: HttpTravelMetricsProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTravelMetricsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTravelMetricsProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpTravelMetricsProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpTravelMetricsProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(
        config: HttpTravelMetricsProviderConfig,
    ) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTravelMetricsProviderConfig {
        &self.config
    }

    /// Build the Table API URL for `locations`.
    ///
    /// Format: `{base_url}/table/v1/{profile}/{lon,lat;...}?annotations=duration,distance`.
    fn build_table_url(&self, locations: &[Location]) -> Result<String, TravelMetricsError> {
        let coords = locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                location
                    .coord
                    .map(|c| format!("{},{}", c.x, c.y))
                    .ok_or(TravelMetricsError::UnresolvedLocation { index })
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(";");

        Ok(format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        ))
    }

    async fn fetch_metrics_async(
        &self,
        locations: &[Location],
    ) -> Result<TravelMetrics, TravelMetricsError> {
        let url = self.build_table_url(locations)?;
        debug!("requesting OSRM table for {} locations", locations.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let table: TableResponse =
            response
                .json()
                .await
                .map_err(|err| TravelMetricsError::ParseError {
                    message: err.to_string(),
                })?;

        convert_response(table, locations.len())
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TravelMetricsError {
        if error.is_timeout() {
            return TravelMetricsError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TravelMetricsError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TravelMetricsError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Turn an OSRM response into metric tables for `expected` locations.
///
/// `NoTable` yields an all-unknown table so missing pairs surface later as
/// missing-metric errors rather than provider failures.
fn convert_response(
    response: TableResponse,
    expected: usize,
) -> Result<TravelMetrics, TravelMetricsError> {
    if response.is_no_table() {
        warn!(
            "routing service found no table for {expected} locations: {}",
            response.message.as_deref().unwrap_or_default()
        );
        return Ok(TravelMetrics::unknown(expected));
    }
    if !response.is_ok() {
        return Err(TravelMetricsError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let durations = response
        .durations
        .ok_or_else(|| TravelMetricsError::ParseError {
            message: "OSRM response missing durations array".to_owned(),
        })?;
    let distances = response
        .distances
        .ok_or_else(|| TravelMetricsError::ParseError {
            message: "OSRM response missing distances array".to_owned(),
        })?;

    Ok(TravelMetrics::new(
        convert_matrix(distances, to_metres),
        convert_matrix(durations, to_duration),
    ))
}

fn convert_matrix<T>(
    raw: Vec<Vec<Option<f64>>>,
    convert: fn(f64) -> Option<T>,
) -> Vec<Vec<Option<T>>> {
    raw.into_iter()
        .map(|row| row.into_iter().map(|cell| cell.and_then(convert)).collect())
        .collect()
}

/// Negative, NaN and infinite values are treated as unknown.
fn usable(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Durations too large for [`Duration`] are unknown as well.
fn to_duration(value: f64) -> Option<Duration> {
    usable(value).and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite and non-negative; float to int casts saturate"
)]
fn to_metres(value: f64) -> Option<u64> {
    usable(value).map(|metres| metres.round() as u64)
}

impl TravelMetricsProvider for HttpTravelMetricsProvider {
    /// Fetch distance and duration tables for `locations`.
    ///
    /// # Runtime requirements
    ///
    /// Inside an existing Tokio runtime the runtime should be multi-threaded;
    /// see the type-level documentation.
    fn get_travel_metrics(
        &self,
        locations: &[Location],
    ) -> Result<TravelMetrics, TravelMetricsError> {
        if locations.is_empty() {
            return Err(TravelMetricsError::EmptyInput);
        }

        let future = self.fetch_metrics_async(locations);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
