//! Entry point tying the metrics fetch, search and feasibility check together.
//!
//! [`SharedPathPlanner::prepare`] is the only place the provider is called.
//! Once it returns, [`SharedPathPlanner::search`] and
//! [`SharedPathPlanner::check_feasibility`] work from the cached table and can
//! be called any number of times.

use log::debug;
use thiserror::Error;

use crate::{
    Cost, FeasibilityError, Group, Location, MetricsTable, ScoredOrdering, SearchError,
    SearchOptions, StopId, StopSet, TimeWindow, Timeline, TravelMetricsError,
    TravelMetricsProvider, selector, timeline,
};

/// Errors raised while preparing a planner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The provider failed or returned an unusable table.
    #[error("failed to obtain travel metrics: {0}")]
    Metrics(#[from] TravelMetricsError),
}

/// A stop in a returned ordering, tagged with its traveler and location.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedStop {
    /// The traveler the stop belongs to.
    pub group: Group,
    /// Position in that traveler's original sequence.
    pub index: usize,
    /// The caller-supplied location.
    pub location: Location,
}

impl PlannedStop {
    /// The stop's identity.
    #[must_use]
    pub const fn id(&self) -> StopId {
        StopId::new(self.group, self.index)
    }
}

impl From<&PlannedStop> for StopId {
    fn from(stop: &PlannedStop) -> Self {
        stop.id()
    }
}

impl From<PlannedStop> for StopId {
    fn from(stop: PlannedStop) -> Self {
        stop.id()
    }
}

/// An optimal ordering with locations attached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedOrdering {
    /// Every stop of both travelers in visiting order.
    pub stops: Vec<PlannedStop>,
    /// Total distance and duration.
    pub cost: Cost,
}

impl PlannedOrdering {
    /// Identities of the stops in visiting order.
    #[must_use]
    pub fn ids(&self) -> Vec<StopId> {
        self.stops.iter().map(StopId::from).collect()
    }
}

/// Search and feasibility over one pair of stop sequences.
#[derive(Debug, Clone)]
pub struct SharedPathPlanner {
    stop_set: StopSet,
    table: MetricsTable,
    options: SearchOptions,
}

impl SharedPathPlanner {
    /// Fetch metrics for both travelers' stops and build a planner.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Metrics`] when the provider fails or its tables do
    /// not match the number of stops.
    pub fn prepare<P>(
        first: Vec<Location>,
        second: Vec<Location>,
        provider: &P,
        options: SearchOptions,
    ) -> Result<Self, PlanError>
    where
        P: TravelMetricsProvider + ?Sized,
    {
        let stop_set = StopSet::new(first, second);
        debug!(
            "fetching travel metrics for {} + {} stops",
            stop_set.group_len(Group::First),
            stop_set.group_len(Group::Second)
        );
        let metrics = provider.get_travel_metrics(stop_set.locations())?;
        let table = MetricsTable::from_metrics(&stop_set, metrics)?;
        Ok(Self::from_parts(stop_set, table, options))
    }

    /// Build a planner from an existing table.
    #[must_use]
    pub const fn from_parts(stop_set: StopSet, table: MetricsTable, options: SearchOptions) -> Self {
        Self {
            stop_set,
            table,
            options,
        }
    }

    /// The stops under consideration.
    #[must_use]
    pub const fn stop_set(&self) -> &StopSet {
        &self.stop_set
    }

    /// The cached metrics.
    #[must_use]
    pub const fn table(&self) -> &MetricsTable {
        &self.table
    }

    /// Every minimal-cost order-preserving interleaving.
    ///
    /// # Errors
    ///
    /// See [`SearchError`].
    pub fn search(&self) -> Result<Vec<PlannedOrdering>, SearchError> {
        let scored = selector::search(&self.stop_set, &self.table, &self.options)?;
        Ok(scored
            .into_iter()
            .map(|ordering| self.attach_locations(ordering))
            .collect())
    }

    /// Compute the timeline of `ordering` against both windows.
    ///
    /// `ordering` may hold [`StopId`]s or [`PlannedStop`]s, so a result of
    /// [`Self::search`] can be passed straight back in.
    ///
    /// # Errors
    ///
    /// See [`FeasibilityError`]. Window violations are reported through
    /// [`Timeline::valid`].
    pub fn check_feasibility<I>(
        &self,
        ordering: I,
        first_window: &TimeWindow,
        second_window: &TimeWindow,
    ) -> Result<Timeline, FeasibilityError>
    where
        I: IntoIterator,
        I::Item: Into<StopId>,
    {
        let ids: Vec<StopId> = ordering.into_iter().map(Into::into).collect();
        timeline::check_feasibility(
            &ids,
            &self.stop_set,
            &self.table,
            first_window,
            second_window,
        )
    }

    /// Locations for a slice or ordering, skipping unknown identities.
    #[must_use]
    pub fn locations_for(&self, slice: &[StopId]) -> Vec<&Location> {
        slice
            .iter()
            .filter_map(|id| self.stop_set.location(*id))
            .collect()
    }

    fn attach_locations(&self, ordering: ScoredOrdering) -> PlannedOrdering {
        let stops = ordering
            .stops
            .into_iter()
            .map(|id| PlannedStop {
                group: id.group,
                index: id.index,
                location: self.stop_set.location(id).cloned().unwrap_or_default(),
            })
            .collect();
        PlannedOrdering {
            stops,
            cost: ordering.cost,
        }
    }
}
