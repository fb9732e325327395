//! Facade crate for the shared-path planning engine.
//!
//! This crate re-exports the core search and feasibility API and exposes the
//! OSRM-backed travel metrics provider behind a feature flag.

#![forbid(unsafe_code)]

pub use sharedpath_core::{
    Cost, FeasibilityError, Group, Location, MalformedOrdering, MissingMetricError, PlanError,
    PlannedOrdering, PlannedStop, ScoredOrdering, SearchError, SearchOptions, SearchStrategy,
    SharedPathPlanner, StopId, StopSet, TimeWindow, Timeline, TravelMetrics, TravelMetricsError,
    TravelMetricsProvider, TravelerTimeline, check_feasibility, interleavings, path_cost, search,
    select_optimal,
};

#[cfg(feature = "provider-osrm")]
pub use sharedpath_data::{
    HttpTravelMetricsProvider, HttpTravelMetricsProviderConfig, ProviderBuildError,
};
