//! Test-only providers and builders shared by unit and behaviour tests.

use std::time::Duration;

use geo::Coord;

use crate::{
    Group, Location, MetricsTable, StopId, StopSet, TravelMetrics, TravelMetricsError,
    TravelMetricsProvider,
};

/// Deterministic `TravelMetricsProvider` returning one-metre, one-second
/// edges and zero on the diagonal.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitTravelMetricsProvider;

impl TravelMetricsProvider for UnitTravelMetricsProvider {
    fn get_travel_metrics(
        &self,
        locations: &[Location],
    ) -> Result<TravelMetrics, TravelMetricsError> {
        if locations.is_empty() {
            return Err(TravelMetricsError::EmptyInput);
        }
        let n = locations.len();
        let distances = (0..n)
            .map(|i| (0..n).map(|j| Some(u64::from(i != j))).collect())
            .collect();
        let durations = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| Some(Duration::from_secs(u64::from(i != j))))
                    .collect()
            })
            .collect();
        Ok(TravelMetrics::new(distances, durations))
    }
}

/// A stop set with `first` and `second` stops spread along the equator.
#[must_use]
pub fn sample_stop_set(first: usize, second: usize) -> StopSet {
    let place = |offset: usize, i: usize| {
        let step = u32::try_from(offset + i).unwrap_or(u32::MAX);
        Location::at(Coord {
            x: f64::from(step) * 0.01,
            y: 0.0,
        })
    };
    StopSet::new(
        (0..first).map(|i| place(0, i)).collect(),
        (0..second).map(|i| place(first, i)).collect(),
    )
}

/// Builds [`TravelMetrics`] for a [`StopSet`] pair by pair.
///
/// Cells default to the values given to [`MetricsBuilder::with_default`]
/// (unknown unless set); the diagonal is always zero.
#[derive(Debug, Clone)]
pub struct MetricsBuilder<'a> {
    stop_set: &'a StopSet,
    default_distance: Option<u64>,
    default_duration: Option<Duration>,
    overrides: Vec<(StopId, StopId, Option<u64>, Option<Duration>)>,
}

impl<'a> MetricsBuilder<'a> {
    /// Start a builder with every off-diagonal cell unknown.
    #[must_use]
    pub const fn new(stop_set: &'a StopSet) -> Self {
        Self {
            stop_set,
            default_distance: None,
            default_duration: None,
            overrides: Vec::new(),
        }
    }

    /// Value used for every off-diagonal cell not otherwise set.
    #[must_use]
    pub fn with_default(mut self, distance: Option<u64>, duration: Option<Duration>) -> Self {
        self.default_distance = distance;
        self.default_duration = duration;
        self
    }

    /// Set both metrics for the ordered pair `from -> to`.
    #[must_use]
    pub fn with_pair(mut self, from: StopId, to: StopId, distance: u64, duration: Duration) -> Self {
        self.overrides
            .push((from, to, Some(distance), Some(duration)));
        self
    }

    /// Mark the ordered pair `from -> to` as unknown in both matrices.
    #[must_use]
    pub fn with_unknown(mut self, from: StopId, to: StopId) -> Self {
        self.overrides.push((from, to, None, None));
        self
    }

    /// Produce the raw matrices.
    #[must_use]
    pub fn build(self) -> TravelMetrics {
        let n = self.stop_set.len();
        let mut metrics = TravelMetrics::new(
            vec![vec![self.default_distance; n]; n],
            vec![vec![self.default_duration; n]; n],
        );
        for i in 0..n {
            set_cell(&mut metrics.distances, i, i, Some(0));
            set_cell(&mut metrics.durations, i, i, Some(Duration::ZERO));
        }
        for (from, to, distance, duration) in self.overrides {
            let (Some(i), Some(j)) = (
                self.stop_set.matrix_index(from),
                self.stop_set.matrix_index(to),
            ) else {
                continue;
            };
            set_cell(&mut metrics.distances, i, j, distance);
            set_cell(&mut metrics.durations, i, j, duration);
        }
        metrics
    }

    /// Produce a validated [`MetricsTable`].
    ///
    /// # Errors
    ///
    /// Propagates [`MetricsTable::from_metrics`] failures.
    pub fn build_table(self) -> Result<MetricsTable, TravelMetricsError> {
        let stop_set = self.stop_set;
        MetricsTable::from_metrics(stop_set, self.build())
    }
}

fn set_cell<T>(matrix: &mut [Vec<Option<T>>], i: usize, j: usize, value: Option<T>) {
    if let Some(cell) = matrix.get_mut(i).and_then(|row| row.get_mut(j)) {
        *cell = value;
    }
}

/// Two travelers with two stops each where riding together pays off.
///
/// Every hop costs 10 m and 600 s except `b0 -> a1` and `a1 -> b1`, which
/// cost 1 m and 60 s, so `a0, b0, a1, b1` is the unique cheapest merge
/// (12 m, 720 s).
#[must_use]
pub fn crossing_scenario() -> (StopSet, TravelMetrics) {
    let stop_set = sample_stop_set(2, 2);
    let a1 = StopId::new(Group::First, 1);
    let b0 = StopId::new(Group::Second, 0);
    let b1 = StopId::new(Group::Second, 1);
    let metrics = MetricsBuilder::new(&stop_set)
        .with_default(Some(10), Some(Duration::from_secs(600)))
        .with_pair(b0, a1, 1, Duration::from_secs(60))
        .with_pair(a1, b1, 1, Duration::from_secs(60))
        .build();
    (stop_set, metrics)
}

/// Shorthand for building an ordering from textual identities.
///
/// Unparseable entries are skipped, which keeps fixtures terse.
#[must_use]
pub fn ids(raw: &[&str]) -> Vec<StopId> {
    raw.iter().filter_map(|s| s.parse().ok()).collect()
}
