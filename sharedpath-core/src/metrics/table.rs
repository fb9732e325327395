//! Stop-keyed view over a validated pair of metric matrices.

use std::time::Duration;

use log::{debug, warn};

use crate::{Group, StopId, StopSet};

use super::error::{Metric, MissingMetricError, TravelMetricsError};
use super::provider::TravelMetrics;

/// Distances and durations keyed by ordered pairs of [`StopId`].
///
/// Built once per computation from a [`StopSet`] and the provider's raw
/// matrices, then read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsTable {
    first_len: usize,
    second_len: usize,
    distances: Vec<Vec<Option<u64>>>,
    durations: Vec<Vec<Option<Duration>>>,
}

impl MetricsTable {
    /// Validate `metrics` against `stop_set` and re-key them by stop.
    ///
    /// # Errors
    ///
    /// Returns [`TravelMetricsError::DimensionMismatch`] when either matrix
    /// is not square with side `stop_set.len()`.
    pub fn from_metrics(
        stop_set: &StopSet,
        metrics: TravelMetrics,
    ) -> Result<Self, TravelMetricsError> {
        let expected = stop_set.len();
        check_shape(&metrics.distances, expected)?;
        check_shape(&metrics.durations, expected)?;

        let unknown = count_unknown(&metrics.distances) + count_unknown(&metrics.durations);
        if unknown > 0 {
            warn!("travel metrics contain {unknown} unknown off-diagonal cells");
        }
        debug!("built metrics table for {expected} stops");

        Ok(Self {
            first_len: stop_set.group_len(Group::First),
            second_len: stop_set.group_len(Group::Second),
            distances: metrics.distances,
            durations: metrics.durations,
        })
    }

    /// Distance in metres from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`MissingMetricError`] when either stop is unknown or the
    /// provider had no value for the pair.
    pub fn distance(&self, from: StopId, to: StopId) -> Result<u64, MissingMetricError> {
        self.lookup(&self.distances, Metric::Distance, from, to)
    }

    /// Travel duration from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`MissingMetricError`] when either stop is unknown or the
    /// provider had no value for the pair.
    pub fn duration(&self, from: StopId, to: StopId) -> Result<Duration, MissingMetricError> {
        self.lookup(&self.durations, Metric::Duration, from, to)
    }

    /// Check every pair that can be consecutive in an order-preserving
    /// interleaving.
    ///
    /// Those are successive stops of the same traveler plus every pairing of
    /// one traveler's stop with the other's, in both directions.
    ///
    /// # Errors
    ///
    /// Returns the first [`MissingMetricError`] encountered.
    pub fn verify_reachable_pairs(&self) -> Result<(), MissingMetricError> {
        for group in Group::ALL {
            let len = self.group_len(group);
            for index in 1..len {
                let from = StopId::new(group, index - 1);
                self.verify_pair(from, StopId::new(group, index))?;
            }
        }
        for a in 0..self.first_len {
            for b in 0..self.second_len {
                let first = StopId::new(Group::First, a);
                let second = StopId::new(Group::Second, b);
                self.verify_pair(first, second)?;
                self.verify_pair(second, first)?;
            }
        }
        Ok(())
    }

    fn verify_pair(&self, from: StopId, to: StopId) -> Result<(), MissingMetricError> {
        self.distance(from, to)?;
        self.duration(from, to)?;
        Ok(())
    }

    const fn group_len(&self, group: Group) -> usize {
        match group {
            Group::First => self.first_len,
            Group::Second => self.second_len,
        }
    }

    fn index(&self, id: StopId) -> Option<usize> {
        if id.index >= self.group_len(id.group) {
            return None;
        }
        match id.group {
            Group::First => Some(id.index),
            Group::Second => self.first_len.checked_add(id.index),
        }
    }

    fn lookup<T: Copy>(
        &self,
        matrix: &[Vec<Option<T>>],
        metric: Metric,
        from: StopId,
        to: StopId,
    ) -> Result<T, MissingMetricError> {
        let missing = || MissingMetricError { metric, from, to };
        let i = self.index(from).ok_or_else(missing)?;
        let j = self.index(to).ok_or_else(missing)?;
        matrix
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .flatten()
            .ok_or_else(missing)
    }
}

fn check_shape<T>(matrix: &[Vec<T>], expected: usize) -> Result<(), TravelMetricsError> {
    let square = matrix.len() == expected && matrix.iter().all(|row| row.len() == expected);
    if square {
        return Ok(());
    }
    let widths: Vec<String> = matrix.iter().map(|row| row.len().to_string()).collect();
    Err(TravelMetricsError::DimensionMismatch {
        expected,
        actual: format!("{} rows with widths [{}]", matrix.len(), widths.join(", ")),
    })
}

fn count_unknown<T>(matrix: &[Vec<Option<T>>]) -> usize {
    matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(j, cell)| i != *j && cell.is_none())
                .count()
        })
        .sum()
}
