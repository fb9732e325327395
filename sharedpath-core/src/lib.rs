//! Core search and feasibility engine for shared two-traveler journeys.
//!
//! Two travelers each supply an ordered sequence of stops. The engine
//! enumerates every way to merge both sequences into one shared journey while
//! keeping each traveler's own order, selects the merges with the lowest total
//! distance (total duration breaks ties) and checks a chosen merge against
//! both travelers' time windows.
//!
//! Pairwise travel metrics are fetched exactly once per computation through a
//! [`TravelMetricsProvider`]; everything after that point is pure and
//! synchronous.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use sharedpath_core::{
//!     Location, SearchOptions, SharedPathPlanner, TravelMetrics, TravelMetricsError,
//!     TravelMetricsProvider,
//! };
//! use std::time::Duration;
//!
//! struct Flat;
//!
//! impl TravelMetricsProvider for Flat {
//!     fn get_travel_metrics(
//!         &self,
//!         locations: &[Location],
//!     ) -> Result<TravelMetrics, TravelMetricsError> {
//!         let n = locations.len();
//!         Ok(TravelMetrics::new(
//!             vec![vec![Some(10); n]; n],
//!             vec![vec![Some(Duration::from_secs(60)); n]; n],
//!         ))
//!     }
//! }
//!
//! let first = vec![Location::at(Coord { x: 0.0, y: 0.0 })];
//! let second = vec![Location::at(Coord { x: 1.0, y: 1.0 })];
//! let planner = SharedPathPlanner::prepare(first, second, &Flat, SearchOptions::default())?;
//! let best = planner.search()?;
//! assert_eq!(best.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub mod cost;
pub mod interleave;
pub mod metrics;
pub mod planner;
pub mod selector;
pub mod stop;
pub mod timeline;

#[cfg(feature = "serde")]
mod serde_secs;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cost::{Cost, path_cost};
pub use interleave::{interleaving_count, interleavings, is_order_preserving};
pub use metrics::{
    Metric, MetricsTable, MissingMetricError, TravelMetrics, TravelMetricsError,
    TravelMetricsProvider,
};
pub use planner::{PlanError, PlannedOrdering, PlannedStop, SharedPathPlanner};
pub use selector::{
    DEFAULT_MAX_STOPS, ScoredOrdering, SearchError, SearchOptions, SearchStrategy, search,
    select_optimal,
};
pub use stop::{Group, Location, ParseStopIdError, StopId, StopSet};
pub use timeline::{
    FeasibilityError, MalformedOrdering, TimeWindow, Timeline, TravelerTimeline,
    check_feasibility, traveler_slice,
};
