//! Timeline feasibility checking for a chosen ordering.
//!
//! One vehicle departs once and serves both travelers along a single clock.
//! The traveler whose first stop comes first starts at their own earliest
//! departure; the other traveler's start is derived from the duration of the
//! ordering up to and including their first stop. Each traveler's end time
//! adds the duration of their slice, the stretch of the ordering from their
//! first stop to their last.
//!
//! Time is handled in whole seconds since the Unix epoch and converted to
//! [`DateTime<Utc>`] only in the returned [`Timeline`].

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use thiserror::Error;

use crate::{Cost, Group, MetricsTable, MissingMetricError, StopId, StopSet, path_cost};

/// A traveler's time window as absolute timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    /// Earliest moment the traveler may depart.
    pub earliest_departure: DateTime<Utc>,
    /// Latest moment the traveler may arrive.
    pub latest_arrival: DateTime<Utc>,
}

impl TimeWindow {
    /// Construct a window.
    #[must_use]
    pub const fn new(earliest_departure: DateTime<Utc>, latest_arrival: DateTime<Utc>) -> Self {
        Self {
            earliest_departure,
            latest_arrival,
        }
    }
}

/// One traveler's view of the shared journey.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TravelerTimeline {
    /// Departure from the traveler's first stop.
    pub start: DateTime<Utc>,
    /// Arrival at the traveler's last stop.
    pub end: DateTime<Utc>,
    /// Time spent riding.
    #[cfg_attr(feature = "serde", serde(rename = "duration_s", with = "crate::serde_secs"))]
    pub duration: Duration,
    /// Distance ridden in metres.
    pub distance_m: u64,
    /// Stops passed between (and including) the traveler's first and last.
    pub slice: Vec<StopId>,
}

/// Computed times and verdict for one ordering.
///
/// An infeasible timeline is a successful result with `valid == false`; the
/// computed times remain available for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    /// Traveler one.
    pub first: TravelerTimeline,
    /// Traveler two.
    pub second: TravelerTimeline,
    /// Duration of the whole shared journey.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "total_duration_s", with = "crate::serde_secs")
    )]
    pub total_duration: Duration,
    /// Distance of the whole shared journey in metres.
    pub total_distance_m: u64,
    /// Whether both travelers' windows are respected.
    pub valid: bool,
}

impl Timeline {
    /// The timeline of `group`.
    #[must_use]
    pub const fn traveler(&self, group: Group) -> &TravelerTimeline {
        match group {
            Group::First => &self.first,
            Group::Second => &self.second,
        }
    }
}

/// Ways an ordering can fail to be a valid interleaving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedOrdering {
    /// The ordering names a stop outside the stop set.
    #[error("stop {0} is not part of this computation")]
    UnknownStop(StopId),
    /// A stop appears more than once.
    #[error("stop {0} appears more than once")]
    DuplicateStop(StopId),
    /// A stop of the stop set is absent.
    #[error("stop {0} is missing")]
    MissingStop(StopId),
    /// A traveler's stops are out of their original order.
    #[error("stops of traveler {group} are out of order")]
    OrderViolated {
        /// The affected traveler.
        group: Group,
    },
}

/// Errors returned by [`check_feasibility`].
///
/// These signal bad input or missing data, never mere infeasibility.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeasibilityError {
    /// A traveler has no stops, so there is no timeline to compute.
    #[error("traveler {group} has no stops")]
    NoStops {
        /// The traveler without stops.
        group: Group,
    },
    /// The ordering is not an order-preserving interleaving of the stop set.
    #[error("malformed ordering: {0}")]
    MalformedOrdering(#[from] MalformedOrdering),
    /// A traveler's first stop was found but their last stop never followed.
    #[error("slice for traveler {group} never reaches its last stop")]
    UnclosedSlice {
        /// The affected traveler.
        group: Group,
    },
    /// A pair in the ordering has no metric.
    #[error(transparent)]
    MissingMetric(#[from] MissingMetricError),
    /// A computed time does not fit in a timestamp.
    #[error("computed time is outside the representable range")]
    TimestampOutOfRange,
}

/// Compute and validate the timeline of `ordering`.
///
/// # Errors
///
/// See [`FeasibilityError`]. A timeline that violates a window is returned
/// as `Ok` with `valid == false`.
pub fn check_feasibility(
    ordering: &[StopId],
    stop_set: &StopSet,
    table: &MetricsTable,
    first_window: &TimeWindow,
    second_window: &TimeWindow,
) -> Result<Timeline, FeasibilityError> {
    for group in Group::ALL {
        if stop_set.group_len(group) == 0 {
            return Err(FeasibilityError::NoStops { group });
        }
    }
    validate_ordering(ordering, stop_set)?;

    let first_slice = traveler_slice(ordering, stop_set, Group::First)?;
    let second_slice = traveler_slice(ordering, stop_set, Group::Second)?;
    let first_cost = path_cost(first_slice, table)?;
    let second_cost = path_cost(second_slice, table)?;
    let total = path_cost(ordering, table)?;

    let first_pos = first_position(ordering, stop_set, Group::First)?;
    let second_pos = first_position(ordering, stop_set, Group::Second)?;
    let (leader, follower_pos) = if first_pos <= second_pos {
        (Group::First, second_pos)
    } else {
        (Group::Second, first_pos)
    };
    let window = |group| match group {
        Group::First => first_window,
        Group::Second => second_window,
    };

    // The vehicle leaves once: the follower's clock derives from the leader's.
    let leader_start = window(leader).earliest_departure.timestamp();
    let prefix = ordering
        .get(..=follower_pos)
        .ok_or(FeasibilityError::TimestampOutOfRange)?;
    let follower_start = leader_start
        .checked_add(secs(path_cost(prefix, table)?.duration)?)
        .ok_or(FeasibilityError::TimestampOutOfRange)?;
    let start = |group| {
        if group == leader {
            leader_start
        } else {
            follower_start
        }
    };

    let first_times = SecondsSpan::new(start(Group::First), first_cost.duration)?;
    let second_times = SecondsSpan::new(start(Group::Second), second_cost.duration)?;
    let valid = first_times.fits(first_window) && second_times.fits(second_window);
    debug!(
        "timeline for {} stops: traveler a {}..{}, traveler b {}..{}, valid={valid}",
        ordering.len(),
        first_times.start,
        first_times.end,
        second_times.start,
        second_times.end,
    );

    Ok(Timeline {
        first: first_times.into_timeline(first_cost, first_slice)?,
        second: second_times.into_timeline(second_cost, second_slice)?,
        total_duration: total.duration,
        total_distance_m: total.distance_m,
        valid,
    })
}

/// The stretch of `ordering` a traveler personally rides.
///
/// Runs from the traveler's first stop to the first occurrence of their last
/// stop at or after it, inclusive. Stops of the other traveler inside that
/// stretch are part of the slice.
///
/// # Errors
///
/// Returns [`FeasibilityError::NoStops`] if the traveler has no stops and
/// [`FeasibilityError::UnclosedSlice`] if the first stop is absent or the
/// last stop does not follow it.
pub fn traveler_slice<'a>(
    ordering: &'a [StopId],
    stop_set: &StopSet,
    group: Group,
) -> Result<&'a [StopId], FeasibilityError> {
    let (Some(first), Some(last)) = (stop_set.first_stop(group), stop_set.last_stop(group)) else {
        return Err(FeasibilityError::NoStops { group });
    };
    let unclosed = FeasibilityError::UnclosedSlice { group };
    let Some(start) = ordering.iter().position(|id| *id == first) else {
        return Err(unclosed);
    };
    let tail = ordering.get(start..).unwrap_or_default();
    let Some(len) = tail.iter().position(|id| *id == last) else {
        return Err(unclosed);
    };
    tail.get(..=len).ok_or(unclosed)
}

fn first_position(
    ordering: &[StopId],
    stop_set: &StopSet,
    group: Group,
) -> Result<usize, FeasibilityError> {
    let first = stop_set
        .first_stop(group)
        .ok_or(FeasibilityError::NoStops { group })?;
    ordering
        .iter()
        .position(|id| *id == first)
        .ok_or(FeasibilityError::MalformedOrdering(
            MalformedOrdering::MissingStop(first),
        ))
}

fn validate_ordering(ordering: &[StopId], stop_set: &StopSet) -> Result<(), MalformedOrdering> {
    let mut seen = HashSet::with_capacity(ordering.len());
    for id in ordering {
        if !stop_set.contains(*id) {
            return Err(MalformedOrdering::UnknownStop(*id));
        }
        if !seen.insert(*id) {
            return Err(MalformedOrdering::DuplicateStop(*id));
        }
    }
    for group in Group::ALL {
        let expected = stop_set.ids(group);
        if let Some(missing) = expected.iter().find(|id| !seen.contains(*id)) {
            return Err(MalformedOrdering::MissingStop(*missing));
        }
        if !ordering
            .iter()
            .filter(|id| id.group == group)
            .eq(expected.iter())
        {
            return Err(MalformedOrdering::OrderViolated { group });
        }
    }
    Ok(())
}

fn secs(duration: Duration) -> Result<i64, FeasibilityError> {
    i64::try_from(duration.as_secs()).map_err(|_| FeasibilityError::TimestampOutOfRange)
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, FeasibilityError> {
    DateTime::from_timestamp(secs, 0).ok_or(FeasibilityError::TimestampOutOfRange)
}

/// Start and end of one traveler's ride, in seconds since the epoch.
#[derive(Debug, Clone, Copy)]
struct SecondsSpan {
    start: i64,
    end: i64,
}

impl SecondsSpan {
    fn new(start: i64, ride: Duration) -> Result<Self, FeasibilityError> {
        let end = start
            .checked_add(secs(ride)?)
            .ok_or(FeasibilityError::TimestampOutOfRange)?;
        Ok(Self { start, end })
    }

    fn fits(self, window: &TimeWindow) -> bool {
        self.start >= window.earliest_departure.timestamp()
            && self.end <= window.latest_arrival.timestamp()
    }

    fn into_timeline(
        self,
        cost: Cost,
        slice: &[StopId],
    ) -> Result<TravelerTimeline, FeasibilityError> {
        Ok(TravelerTimeline {
            start: timestamp(self.start)?,
            end: timestamp(self.end)?,
            duration: cost.duration,
            distance_m: cost.distance_m,
            slice: slice.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MetricsBuilder, crossing_scenario, ids, sample_stop_set};
    use rstest::{fixture, rstest};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("valid timestamp")
    }

    fn window(earliest: i64, latest: i64) -> TimeWindow {
        TimeWindow::new(at(earliest), at(latest))
    }

    #[fixture]
    fn crossing() -> (StopSet, MetricsTable) {
        let (stops, metrics) = crossing_scenario();
        let table = MetricsTable::from_metrics(&stops, metrics).expect("table should build");
        (stops, table)
    }

    #[rstest]
    fn shared_ride_fits_generous_windows(crossing: (StopSet, MetricsTable)) {
        let (stops, table) = crossing;
        let ordering = ids(&["a0", "b0", "a1", "b1"]);
        let timeline = check_feasibility(
            &ordering,
            &stops,
            &table,
            &window(0, 1000),
            &window(0, 1000),
        )
        .expect("timeline computes");

        assert!(timeline.valid);
        assert_eq!(timeline.first.slice, ids(&["a0", "b0", "a1"]));
        assert_eq!(timeline.second.slice, ids(&["b0", "a1", "b1"]));
        assert_eq!(timeline.first.start, at(0));
        assert_eq!(timeline.first.end, at(660));
        assert_eq!(timeline.second.start, at(600));
        assert_eq!(timeline.second.end, at(720));
        assert_eq!(timeline.first.distance_m, 11);
        assert_eq!(timeline.second.distance_m, 2);
        assert_eq!(timeline.total_duration, Duration::from_secs(720));
        assert_eq!(timeline.total_distance_m, 12);
    }

    #[rstest]
    fn late_arrival_is_reported_not_raised(crossing: (StopSet, MetricsTable)) {
        let (stops, table) = crossing;
        let ordering = ids(&["a0", "b0", "a1", "b1"]);
        let timeline = check_feasibility(
            &ordering,
            &stops,
            &table,
            &window(0, 1000),
            &window(0, 700),
        )
        .expect("timeline computes");

        assert!(!timeline.valid);
        assert_eq!(timeline.second.end, at(720));
    }

    #[rstest]
    fn derived_start_before_window_is_invalid(crossing: (StopSet, MetricsTable)) {
        let (stops, table) = crossing;
        let ordering = ids(&["a0", "b0", "a1", "b1"]);
        let timeline = check_feasibility(
            &ordering,
            &stops,
            &table,
            &window(0, 5000),
            &window(900, 5000),
        )
        .expect("timeline computes");

        assert_eq!(timeline.second.start, at(600));
        assert!(!timeline.valid);
    }

    #[rstest]
    fn second_traveler_can_lead(crossing: (StopSet, MetricsTable)) {
        let (stops, table) = crossing;
        let ordering = ids(&["b0", "a0", "a1", "b1"]);
        let timeline = check_feasibility(
            &ordering,
            &stops,
            &table,
            &window(0, 5000),
            &window(100, 5000),
        )
        .expect("timeline computes");

        assert_eq!(timeline.second.start, at(100));
        assert_eq!(timeline.first.start, at(700));
        assert_eq!(timeline.first.end, at(1300));
        assert_eq!(timeline.second.end, at(1360));
        assert_eq!(timeline.second.slice, ordering);
        assert!(timeline.valid);
    }

    #[rstest]
    fn single_stop_traveler_rides_nothing() {
        let stops = sample_stop_set(1, 2);
        let table = MetricsBuilder::new(&stops)
            .with_default(Some(3), Some(Duration::from_secs(30)))
            .build_table()
            .expect("table should build");
        let ordering = ids(&["b0", "a0", "b1"]);
        let timeline = check_feasibility(
            &ordering,
            &stops,
            &table,
            &window(0, 100),
            &window(0, 100),
        )
        .expect("timeline computes");

        assert_eq!(timeline.first.slice, ids(&["a0"]));
        assert_eq!(timeline.first.duration, Duration::ZERO);
        assert_eq!(timeline.first.start, timeline.first.end);
        assert_eq!(timeline.first.start, at(30));
    }

    #[rstest]
    #[case(&["a0", "b0", "a1", "b7"], MalformedOrdering::UnknownStop(StopId::new(Group::Second, 7)))]
    #[case(&["a0", "b0", "b0", "a1"], MalformedOrdering::DuplicateStop(StopId::new(Group::Second, 0)))]
    #[case(&["a0", "b0", "a1"], MalformedOrdering::MissingStop(StopId::new(Group::Second, 1)))]
    #[case(&["a1", "b0", "a0", "b1"], MalformedOrdering::OrderViolated { group: Group::First })]
    fn malformed_orderings_are_distinct_errors(
        crossing: (StopSet, MetricsTable),
        #[case] raw: &[&str],
        #[case] expected: MalformedOrdering,
    ) {
        let (stops, table) = crossing;
        let err = check_feasibility(
            &ids(raw),
            &stops,
            &table,
            &window(0, 1000),
            &window(0, 1000),
        )
        .expect_err("ordering is malformed");
        assert_eq!(err, FeasibilityError::MalformedOrdering(expected));
    }

    #[rstest]
    fn slice_without_closing_stop_is_unclosed() {
        let stops = sample_stop_set(2, 1);
        let err = traveler_slice(&ids(&["a1", "b0", "a0"]), &stops, Group::First)
            .expect_err("a1 precedes a0");
        assert_eq!(err, FeasibilityError::UnclosedSlice { group: Group::First });
    }

    #[rstest]
    fn traveler_without_stops_has_no_timeline() {
        let stops = sample_stop_set(2, 0);
        let table = MetricsBuilder::new(&stops)
            .with_default(Some(1), Some(Duration::from_secs(1)))
            .build_table()
            .expect("table should build");
        let err = check_feasibility(
            &ids(&["a0", "a1"]),
            &stops,
            &table,
            &window(0, 10),
            &window(0, 10),
        )
        .expect_err("traveler b has no stops");
        assert_eq!(err, FeasibilityError::NoStops { group: Group::Second });
    }

    #[rstest]
    fn missing_metric_is_an_error() {
        let stops = sample_stop_set(1, 1);
        let table = MetricsBuilder::new(&stops)
            .build_table()
            .expect("table should build");
        let err = check_feasibility(
            &ids(&["a0", "b0"]),
            &stops,
            &table,
            &window(0, 10),
            &window(0, 10),
        )
        .expect_err("a0 -> b0 is unknown");
        assert!(matches!(err, FeasibilityError::MissingMetric(_)));
    }

    #[rstest]
    #[case::beyond_i64(Duration::from_secs(u64::MAX))]
    #[case::beyond_calendar(Duration::from_secs(1_000_000_000_000_000))]
    fn unrepresentable_times_are_errors(#[case] hop: Duration) {
        let stops = sample_stop_set(1, 1);
        let table = MetricsBuilder::new(&stops)
            .with_default(Some(1), Some(hop))
            .build_table()
            .expect("table should build");
        let err = check_feasibility(
            &ids(&["a0", "b0"]),
            &stops,
            &table,
            &window(0, 10),
            &window(0, 10),
        )
        .expect_err("b0 starts beyond any timestamp");
        assert!(matches!(err, FeasibilityError::TimestampOutOfRange));
    }
}
