//! Travel metric providers backed by external routing services.
//!
//! Responsibilities:
//! - Implement [`sharedpath_core::TravelMetricsProvider`] over HTTP.
//! - Translate service payloads into distance and duration tables.
//!
//! Boundaries:
//! - Do not encode search or feasibility rules (live in `sharedpath-core`).
//! - Keep blocking I/O off async executors; bridge to the synchronous trait
//!   inside the provider.

pub mod routing;

pub use routing::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpTravelMetricsProvider,
    HttpTravelMetricsProviderConfig, ProviderBuildError,
};
