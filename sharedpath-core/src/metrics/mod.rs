//! Pairwise travel metrics between stops.
//!
//! The [`TravelMetricsProvider`] trait abstracts retrieval of distance and
//! duration matrices for a slice of [`Location`](crate::Location) values.
//! Both matrices come back from one call, so a computation never starts with
//! only half of its data. [`MetricsTable`] then re-keys the raw matrices by
//! [`StopId`](crate::StopId) for the search.

mod error;
mod provider;
mod table;

pub use error::{Metric, MissingMetricError, TravelMetricsError};
pub use provider::{TravelMetrics, TravelMetricsProvider};
pub use table::MetricsTable;
