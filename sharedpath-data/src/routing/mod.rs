//! HTTP-based travel metric providers for routing services.
//!
//! [`HttpTravelMetricsProvider`] implements
//! [`sharedpath_core::TravelMetricsProvider`] on top of the OSRM Table API,
//! requesting distance and duration annotations in a single call.
//!
//! # Architecture
//!
//! The provider trait is synchronous so the core stays embeddable in
//! synchronous contexts. The provider blocks on its async HTTP request
//! internally, reusing a runtime it owns.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use sharedpath_core::{Location, TravelMetricsProvider};
//! use sharedpath_data::routing::{HttpTravelMetricsProvider, HttpTravelMetricsProviderConfig};
//! use std::time::Duration;
//!
//! let config = HttpTravelMetricsProviderConfig::new("http://localhost:5000")
//!     .with_profile("driving")
//!     .with_timeout(Duration::from_secs(60));
//! let provider = HttpTravelMetricsProvider::with_config(config)?;
//!
//! let stops = vec![
//!     Location::at(Coord { x: -0.1, y: 51.5 }),
//!     Location::at(Coord { x: -0.2, y: 51.6 }),
//! ];
//! let metrics = provider.get_travel_metrics(&stops)?;
//! println!("{:?}", metrics.distances);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpTravelMetricsProvider,
    HttpTravelMetricsProviderConfig, ProviderBuildError,
};
