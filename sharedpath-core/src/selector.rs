//! Selection of the cheapest order-preserving interleavings.
//!
//! Two strategies produce the same set of orderings:
//!
//! - [`SearchStrategy::Exhaustive`] scores every interleaving and keeps the
//!   minimal ones.
//! - [`SearchStrategy::BranchAndBound`] builds interleavings stop by stop and
//!   abandons a partial ordering as soon as its prefix is strictly more
//!   expensive than the best complete ordering seen so far. Hop costs are
//!   never negative, so such a prefix cannot lead to a minimal ordering.

use std::cmp::Ordering;

use log::debug;
use thiserror::Error;

use crate::{
    Cost, Group, MetricsTable, MissingMetricError, StopId, StopSet, interleavings, path_cost,
};

/// Default upper bound on the combined stop count.
pub const DEFAULT_MAX_STOPS: usize = 16;

/// How the optimal orderings are found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SearchStrategy {
    /// Generate all interleavings, then score each one.
    Exhaustive,
    /// Fuse generation and scoring, pruning expensive prefixes.
    #[default]
    BranchAndBound,
}

/// Tunables for [`search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SearchOptions {
    /// Enumeration strategy.
    pub strategy: SearchStrategy,
    /// Largest combined stop count accepted. The candidate count grows as
    /// `C(m + n, m)`, so this keeps a single search bounded.
    pub max_stops: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            max_stops: DEFAULT_MAX_STOPS,
        }
    }
}

impl SearchOptions {
    /// Use `strategy`.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Accept at most `max_stops` stops.
    #[must_use]
    pub const fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = max_stops;
        self
    }
}

/// Errors returned by [`search`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Neither traveler has any stop.
    #[error("at least one stop is required")]
    NoStops,
    /// The combined stop count exceeds [`SearchOptions::max_stops`].
    #[error("{count} stops exceed the configured limit of {limit}")]
    TooManyStops {
        /// Combined stop count.
        count: usize,
        /// Configured limit.
        limit: usize,
    },
    /// A pair needed by some interleaving has no metric.
    #[error(transparent)]
    MissingMetric(#[from] MissingMetricError),
    /// No interleaving was produced for non-empty input.
    ///
    /// The concatenation of both sequences is always a valid interleaving, so
    /// this indicates a defect rather than an infeasible request.
    #[error("no order-preserving interleaving was produced for {count} stops")]
    EmptyCandidateSet {
        /// Combined stop count.
        count: usize,
    },
}

/// An ordering with its cost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredOrdering {
    /// Every stop of both travelers, in visiting order.
    pub stops: Vec<StopId>,
    /// Total distance and duration.
    pub cost: Cost,
}

/// Keep the candidates whose cost equals the minimum over all candidates.
///
/// Distance is compared first and duration breaks ties; candidates tied on
/// both are all returned. An empty input gives an empty output.
///
/// # Errors
///
/// Returns [`MissingMetricError`] as soon as any candidate references an
/// unknown pair; no candidate is skipped silently.
pub fn select_optimal<I>(
    candidates: I,
    table: &MetricsTable,
) -> Result<Vec<ScoredOrdering>, MissingMetricError>
where
    I: IntoIterator<Item = Vec<StopId>>,
{
    let mut best = Best::default();
    for stops in candidates {
        let cost = path_cost(&stops, table)?;
        best.offer(stops, cost);
    }
    Ok(best.orderings)
}

/// Find every minimal-cost interleaving of both travelers' stops.
///
/// All pairs that any interleaving could use are checked before enumeration
/// starts, so a missing metric aborts the search regardless of strategy.
///
/// # Errors
///
/// See [`SearchError`].
pub fn search(
    stop_set: &StopSet,
    table: &MetricsTable,
    options: &SearchOptions,
) -> Result<Vec<ScoredOrdering>, SearchError> {
    let count = stop_set.len();
    if count == 0 {
        return Err(SearchError::NoStops);
    }
    if count > options.max_stops {
        return Err(SearchError::TooManyStops {
            count,
            limit: options.max_stops,
        });
    }
    table.verify_reachable_pairs()?;

    let first = stop_set.ids(Group::First);
    let second = stop_set.ids(Group::Second);
    let best = match options.strategy {
        SearchStrategy::Exhaustive => select_optimal(interleavings(&first, &second), table)?,
        SearchStrategy::BranchAndBound => {
            let mut bounded = BoundedSearch::new(table);
            bounded.extend(&first, &second, Cost::ZERO)?;
            debug!("branch and bound pruned {} partial orderings", bounded.pruned);
            bounded.best.orderings
        }
    };

    let Some(winner) = best.first() else {
        return Err(SearchError::EmptyCandidateSet { count });
    };
    debug!(
        "selected {} optimal ordering(s) at {} m / {} s",
        best.len(),
        winner.cost.distance_m,
        winner.cost.duration.as_secs()
    );
    Ok(best)
}

/// Running set of cheapest orderings.
#[derive(Debug, Default)]
struct Best {
    cost: Option<Cost>,
    orderings: Vec<ScoredOrdering>,
}

impl Best {
    fn offer(&mut self, stops: Vec<StopId>, cost: Cost) {
        match self.cost.map(|best| cost.cmp(&best)) {
            None | Some(Ordering::Less) => {
                self.cost = Some(cost);
                self.orderings.clear();
                self.orderings.push(ScoredOrdering { stops, cost });
            }
            Some(Ordering::Equal) => self.orderings.push(ScoredOrdering { stops, cost }),
            Some(Ordering::Greater) => {}
        }
    }

    fn beats(&self, prefix: Cost) -> bool {
        self.cost.is_some_and(|best| prefix > best)
    }
}

struct BoundedSearch<'a> {
    table: &'a MetricsTable,
    best: Best,
    current: Vec<StopId>,
    pruned: u64,
}

impl<'a> BoundedSearch<'a> {
    fn new(table: &'a MetricsTable) -> Self {
        Self {
            table,
            best: Best::default(),
            current: Vec::new(),
            pruned: 0,
        }
    }

    fn extend(
        &mut self,
        first: &[StopId],
        second: &[StopId],
        prefix: Cost,
    ) -> Result<(), MissingMetricError> {
        if self.best.beats(prefix) {
            self.pruned = self.pruned.saturating_add(1);
            return Ok(());
        }
        if first.is_empty() && second.is_empty() {
            self.best.offer(self.current.clone(), prefix);
            return Ok(());
        }
        if let Some((head, rest)) = first.split_first() {
            self.visit(*head, rest, second, prefix)?;
        }
        if let Some((head, rest)) = second.split_first() {
            self.visit(*head, first, rest, prefix)?;
        }
        Ok(())
    }

    fn visit(
        &mut self,
        head: StopId,
        first: &[StopId],
        second: &[StopId],
        prefix: Cost,
    ) -> Result<(), MissingMetricError> {
        let cost = match self.current.last() {
            Some(prev) => prefix.plus(Cost::of_hop(self.table, *prev, head)?),
            None => prefix,
        };
        self.current.push(head);
        let outcome = self.extend(first, second, cost);
        self.current.pop();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MetricsBuilder, crossing_scenario, ids, sample_stop_set};
    use crate::{Metric, TravelMetrics};
    use rstest::{fixture, rstest};
    use std::collections::HashSet;
    use std::time::Duration;

    #[fixture]
    fn crossing() -> (StopSet, MetricsTable) {
        let (stops, metrics) = crossing_scenario();
        let table = MetricsTable::from_metrics(&stops, metrics).expect("table should build");
        (stops, table)
    }

    fn as_set(orderings: &[ScoredOrdering]) -> HashSet<Vec<StopId>> {
        orderings.iter().map(|o| o.stops.clone()).collect()
    }

    #[rstest]
    #[case(SearchStrategy::Exhaustive)]
    #[case(SearchStrategy::BranchAndBound)]
    fn finds_unique_crossing_ordering(
        crossing: (StopSet, MetricsTable),
        #[case] strategy: SearchStrategy,
    ) {
        let (stops, table) = crossing;
        let options = SearchOptions::default().with_strategy(strategy);
        let best = search(&stops, &table, &options).expect("search succeeds");
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].stops, ids(&["a0", "b0", "a1", "b1"]));
        assert_eq!(best[0].cost, Cost::new(12, Duration::from_secs(720)));
    }

    #[rstest]
    #[case(SearchStrategy::Exhaustive)]
    #[case(SearchStrategy::BranchAndBound)]
    fn returns_every_tie(#[case] strategy: SearchStrategy) {
        let stops = sample_stop_set(2, 2);
        let table = MetricsBuilder::new(&stops)
            .with_default(Some(5), Some(Duration::from_secs(30)))
            .build_table()
            .expect("table should build");
        let options = SearchOptions::default().with_strategy(strategy);
        let best = search(&stops, &table, &options).expect("search succeeds");
        assert_eq!(best.len(), 6);
        assert!(best.iter().all(|o| o.cost == Cost::new(15, Duration::from_secs(90))));
    }

    #[rstest]
    fn duration_breaks_distance_ties() {
        let stops = sample_stop_set(1, 1);
        let a0 = StopId::new(Group::First, 0);
        let b0 = StopId::new(Group::Second, 0);
        let table = MetricsBuilder::new(&stops)
            .with_pair(a0, b0, 100, Duration::from_secs(90))
            .with_pair(b0, a0, 100, Duration::from_secs(60))
            .build_table()
            .expect("table should build");
        let best = select_optimal(vec![vec![a0, b0], vec![b0, a0]], &table).expect("scored");
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].stops, vec![b0, a0]);
    }

    #[rstest]
    fn empty_candidates_select_nothing(crossing: (StopSet, MetricsTable)) {
        let (_, table) = crossing;
        let best = select_optimal(Vec::<Vec<StopId>>::new(), &table).expect("nothing to score");
        assert!(best.is_empty());
    }

    #[rstest]
    fn single_traveler_keeps_own_order() {
        let stops = sample_stop_set(3, 0);
        let table = MetricsBuilder::new(&stops)
            .with_default(Some(1), Some(Duration::from_secs(1)))
            .build_table()
            .expect("table should build");
        let best = search(&stops, &table, &SearchOptions::default()).expect("search succeeds");
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].stops, ids(&["a0", "a1", "a2"]));
    }

    #[rstest]
    fn rejects_empty_stop_set() {
        let stops = StopSet::new(Vec::new(), Vec::new());
        let table =
            MetricsTable::from_metrics(&stops, TravelMetrics::unknown(0)).expect("empty table");
        let err = search(&stops, &table, &SearchOptions::default()).expect_err("no stops");
        assert_eq!(err, SearchError::NoStops);
    }

    #[rstest]
    fn rejects_oversized_input(crossing: (StopSet, MetricsTable)) {
        let (stops, table) = crossing;
        let options = SearchOptions::default().with_max_stops(3);
        let err = search(&stops, &table, &options).expect_err("too many stops");
        assert_eq!(err, SearchError::TooManyStops { count: 4, limit: 3 });
    }

    #[rstest]
    #[case(SearchStrategy::Exhaustive)]
    #[case(SearchStrategy::BranchAndBound)]
    fn missing_metric_aborts_whole_search(#[case] strategy: SearchStrategy) {
        let stops = sample_stop_set(2, 2);
        let b1 = StopId::new(Group::Second, 1);
        let a0 = StopId::new(Group::First, 0);
        let table = MetricsBuilder::new(&stops)
            .with_default(Some(1), Some(Duration::from_secs(1)))
            .with_unknown(b1, a0)
            .build_table()
            .expect("table should build");
        let options = SearchOptions::default().with_strategy(strategy);
        let err = search(&stops, &table, &options).expect_err("b1 -> a0 is unknown");
        match err {
            SearchError::MissingMetric(missing) => {
                assert_eq!(missing.metric, Metric::Distance);
                assert_eq!((missing.from, missing.to), (b1, a0));
            }
            other => panic!("expected MissingMetric, got {other:?}"),
        }
    }

    #[rstest]
    fn strategies_agree_on_asymmetric_costs() {
        let stops = sample_stop_set(3, 2);
        let mut builder =
            MetricsBuilder::new(&stops).with_default(Some(40), Some(Duration::from_secs(400)));
        for (i, from) in stops.ids(Group::First).into_iter().enumerate() {
            for (j, to) in stops.ids(Group::Second).into_iter().enumerate() {
                let d = u64::try_from(3 * i + 7 * j + 1).expect("small");
                builder = builder
                    .with_pair(from, to, d, Duration::from_secs(d * 11))
                    .with_pair(to, from, d + 2, Duration::from_secs(d * 5));
            }
        }
        let table = builder.build_table().expect("table should build");
        let exhaustive = search(
            &stops,
            &table,
            &SearchOptions::default().with_strategy(SearchStrategy::Exhaustive),
        )
        .expect("exhaustive succeeds");
        let bounded = search(&stops, &table, &SearchOptions::default()).expect("bounded succeeds");
        assert_eq!(as_set(&exhaustive), as_set(&bounded));
        assert_eq!(exhaustive[0].cost, bounded[0].cost);
    }
}
