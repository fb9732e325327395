use thiserror::Error;

use crate::StopId;

/// Errors from [`crate::TravelMetricsProvider::get_travel_metrics`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelMetricsError {
    /// No locations were provided.
    ///
    /// The provider requires at least one location to compute a matrix.
    #[error("at least one location is required")]
    EmptyInput,

    /// A location lacks the data the provider needs, e.g. a coordinate.
    #[error("location {index} cannot be resolved by this provider")]
    UnresolvedLocation {
        /// Position of the location in the request.
        index: usize,
    },

    /// Network-level failure (connection refused, DNS resolution, etc.).
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Underlying error message.
        message: String,
    },

    /// The request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Underlying error message.
        message: String,
    },

    /// The service reported an application-level error.
    #[error("routing service error {code}: {message}")]
    ServiceError {
        /// Service status code.
        code: String,
        /// Human-readable explanation.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder error message.
        message: String,
    },

    /// A matrix did not have the expected `n x n` shape.
    #[error("expected a {expected}x{expected} matrix, found {actual}")]
    DimensionMismatch {
        /// Number of stops in the request.
        expected: usize,
        /// Description of the shape actually received.
        actual: String,
    },
}

/// The metric a lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Travel distance in metres.
    Distance,
    /// Travel duration.
    Duration,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distance => f.write_str("distance"),
            Self::Duration => f.write_str("duration"),
        }
    }
}

/// A consecutive pair had no entry in the [`crate::MetricsTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no {metric} known from {from} to {to}")]
pub struct MissingMetricError {
    /// Which table lacked the entry.
    pub metric: Metric,
    /// Origin stop.
    pub from: StopId,
    /// Destination stop.
    pub to: StopId,
}
