//! Travel-metrics provider trait and the raw matrix pair it returns.

use std::time::Duration;

use crate::Location;

use super::error::TravelMetricsError;

/// Raw distance and duration matrices for a set of locations.
///
/// `distances[i][j]` is the distance in metres and `durations[i][j]` the
/// travel time from location `i` to location `j`. `None` marks a pair the
/// provider could not answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelMetrics {
    /// Distances in metres.
    pub distances: Vec<Vec<Option<u64>>>,
    /// Travel durations.
    pub durations: Vec<Vec<Option<Duration>>>,
}

impl TravelMetrics {
    /// Pair two matrices.
    #[must_use]
    pub const fn new(
        distances: Vec<Vec<Option<u64>>>,
        durations: Vec<Vec<Option<Duration>>>,
    ) -> Self {
        Self {
            distances,
            durations,
        }
    }

    /// An `n x n` pair of matrices where every cell is unknown.
    ///
    /// Providers return this when the service reports that it found no
    /// results at all.
    #[must_use]
    pub fn unknown(n: usize) -> Self {
        Self::new(vec![vec![None; n]; n], vec![vec![None; n]; n])
    }
}

/// Fetch pairwise distances and durations for a set of locations.
///
/// Implementers must return square `n×n` matrices where
/// `n == locations.len()`. Both matrices are produced by the same call so
/// callers have a single point at which all metrics become available.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::Coord;
/// use sharedpath_core::{Location, TravelMetrics, TravelMetricsError, TravelMetricsProvider};
///
/// struct UnitProvider;
///
/// impl TravelMetricsProvider for UnitProvider {
///     fn get_travel_metrics(
///         &self,
///         locations: &[Location],
///     ) -> Result<TravelMetrics, TravelMetricsError> {
///         if locations.is_empty() {
///             return Err(TravelMetricsError::EmptyInput);
///         }
///         let n = locations.len();
///         Ok(TravelMetrics::new(
///             vec![vec![Some(1); n]; n],
///             vec![vec![Some(Duration::from_secs(1)); n]; n],
///         ))
///     }
/// }
///
/// let location = Location::at(Coord { x: 0.0, y: 0.0 });
/// let metrics = UnitProvider.get_travel_metrics(&[location])?;
/// assert_eq!(metrics.distances.len(), 1);
/// # Ok::<(), TravelMetricsError>(())
/// ```
pub trait TravelMetricsProvider {
    /// Return distance and duration matrices for `locations`.
    ///
    /// Implementations must return `Err(TravelMetricsError::EmptyInput)` when
    /// `locations` is empty.
    fn get_travel_metrics(
        &self,
        locations: &[Location],
    ) -> Result<TravelMetrics, TravelMetricsError>;
}
