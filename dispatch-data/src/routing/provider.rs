//! `DistanceMatrixProvider` over OSRM's Table API.
//!
//! The [`DistanceMatrixProvider`] trait is synchronous so the solver stays
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! call to the sync interface by blocking on a Tokio runtime internally.

use std::time::Duration;

use dispatch_core::{DistanceMatrix, DistanceMatrixProvider, MatrixError, VehicleProfile};
use geo::Coord;
use log::{debug, warn};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::osrm::TableResponse;

/// Errors raised while constructing an [`OsrmMatrixProvider`].
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The configured base URL is not an absolute HTTP(S) URL.
    #[error("invalid OSRM base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// Why the value was rejected.
        message: String,
    },
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "dispatch-routing/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Annotations requested from the Table service.
const TABLE_ANNOTATIONS: &str = "duration,distance";

/// Configuration for [`OsrmMatrixProvider`].
#[derive(Debug, Clone)]
pub struct OsrmMatrixProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OsrmMatrixProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmMatrixProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
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

/// Distance-matrix provider backed by the OSRM Table API.
///
/// One HTTP request is made per call; failures are reported, never retried.
/// The provider owns a Tokio runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own runtime. Inside
/// a multi-threaded runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]) it uses that runtime's handle with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime it
/// falls back to its own runtime, which may deadlock if the caller's runtime
/// drives IO this request depends on.
pub struct OsrmMatrixProvider {
    client: Client,
    config: OsrmMatrixProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for OsrmMatrixProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmMatrixProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl OsrmMatrixProvider {
    /// Create a provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmMatrixProviderConfig::new(base_url))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: OsrmMatrixProviderConfig) -> Result<Self, ProviderBuildError> {
        validate_base_url(&config.base_url)?;
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

    /// Return the active configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmMatrixProviderConfig {
        &self.config
    }

    /// Build the Table API URL for the given locations.
    ///
    /// The format is
    /// `{base_url}/table/v1/{profile}/{lon,lat;...}?annotations=duration,distance`.
    fn build_table_url(&self, locations: &[Coord<f64>], profile: VehicleProfile) -> String {
        let coords = locations
            .iter()
            .map(|coord| format!("{},{}", coord.x, coord.y))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations={}",
            self.config.base_url.trim_end_matches('/'),
            profile,
            coords,
            TABLE_ANNOTATIONS
        )
    }

    async fn fetch_matrix_async(
        &self,
        locations: &[Coord<f64>],
        profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        let url = self.build_table_url(locations, profile);
        debug!("requesting OSRM table for {} locations: {url}", locations.len());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let table: TableResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                self.convert_reqwest_error(&err, &url)
            } else {
                MatrixError::ParseError {
                    message: err.to_string(),
                }
            }
        })?;

        let matrix = convert_response(table)?;
        matrix.ensure_len(locations.len())?;
        Ok(matrix)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> MatrixError {
        if error.is_timeout() {
            return MatrixError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return MatrixError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        MatrixError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ProviderBuildError> {
    let invalid = |message: String| ProviderBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        message,
    };
    let parsed = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Convert an OSRM response into a [`DistanceMatrix`].
///
/// Null, negative and non-finite cells mark unreachable pairs: durations
/// become [`Duration::MAX`] and distances become infinite.
fn convert_response(response: TableResponse) -> Result<DistanceMatrix, MatrixError> {
    if !response.is_ok() {
        let message = response.message.unwrap_or_default();
        warn!("OSRM table request rejected with {}: {message}", response.code);
        return Err(MatrixError::ServiceError {
            code: response.code,
            message,
        });
    }

    let durations = response.durations.ok_or_else(|| MatrixError::ParseError {
        message: "OSRM response missing durations array".to_owned(),
    })?;
    let distances = response.distances.ok_or_else(|| MatrixError::ParseError {
        message: "OSRM response missing distances array".to_owned(),
    })?;

    let durations = durations
        .into_iter()
        .map(|row| row.into_iter().map(duration_cell).collect())
        .collect();
    let distances = distances
        .into_iter()
        .map(|row| row.into_iter().map(distance_cell).collect())
        .collect();

    DistanceMatrix::new(durations, distances)
}

fn duration_cell(cell: Option<f64>) -> Duration {
    cell.filter(|&secs| secs >= 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or(Duration::MAX)
}

fn distance_cell(cell: Option<f64>) -> f64 {
    cell.filter(|&metres| metres >= 0.0 && metres.is_finite())
        .unwrap_or(f64::INFINITY)
}

impl DistanceMatrixProvider for OsrmMatrixProvider {
    /// Fetch the matrix for `locations` under `profile`.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded. Inside a `current_thread` runtime the method falls
    /// back to the provider's own runtime.
    fn get_distance_matrix(
        &self,
        locations: &[Coord<f64>],
        profile: VehicleProfile,
    ) -> Result<DistanceMatrix, MatrixError> {
        if locations.is_empty() {
            return Err(MatrixError::EmptyInput);
        }

        let future = self.fetch_matrix_async(locations, profile);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
