//! Test utilities for routing providers.
//!
//! [`StubTravelMetricsProvider`] returns pre-configured responses without
//! making HTTP requests.

use std::time::Duration;

use sharedpath_core::{Location, TravelMetrics, TravelMetricsError, TravelMetricsProvider};

/// Stub `TravelMetricsProvider` for testing.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use sharedpath_core::{Location, TravelMetricsProvider};
/// use sharedpath_data::routing::test_support::StubTravelMetricsProvider;
///
/// let provider = StubTravelMetricsProvider::with_unit_metrics(2);
/// let stops = vec![
///     Location::at(Coord { x: 0.0, y: 0.0 }),
///     Location::at(Coord { x: 1.0, y: 1.0 }),
/// ];
/// assert!(provider.get_travel_metrics(&stops).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StubTravelMetricsProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Metrics(TravelMetrics),
    Error(TravelMetricsError),
}

impl StubTravelMetricsProvider {
    /// Return `metrics` for any non-empty input.
    #[must_use]
    pub const fn with_metrics(metrics: TravelMetrics) -> Self {
        Self {
            response: StubResponse::Metrics(metrics),
        }
    }

    /// Return `error` for any non-empty input.
    ///
    /// Empty input still returns `TravelMetricsError::EmptyInput`.
    #[must_use]
    pub const fn with_error(error: TravelMetricsError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }

    /// Return `size x size` tables with zero on the diagonal and one metre,
    /// one second elsewhere.
    #[must_use]
    pub fn with_unit_metrics(size: usize) -> Self {
        let unit = |i: usize, j: usize| u64::from(i != j);
        let distances = (0..size)
            .map(|i| (0..size).map(|j| Some(unit(i, j))).collect())
            .collect();
        let durations = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| Some(Duration::from_secs(unit(i, j))))
                    .collect()
            })
            .collect();
        Self::with_metrics(TravelMetrics::new(distances, durations))
    }
}

impl TravelMetricsProvider for StubTravelMetricsProvider {
    fn get_travel_metrics(
        &self,
        locations: &[Location],
    ) -> Result<TravelMetrics, TravelMetricsError> {
        if locations.is_empty() {
            return Err(TravelMetricsError::EmptyInput);
        }

        match &self.response {
            StubResponse::Metrics(metrics) => Ok(metrics.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
