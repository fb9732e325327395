//! Metric provider selection for CLI invocations.
//!
//! A precomputed metrics file bypasses the network entirely; otherwise the
//! OSRM endpoint is queried.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sharedpath_core::{
    Location, SearchOptions, SearchStrategy, TravelMetrics, TravelMetricsError,
    TravelMetricsProvider,
};
use sharedpath_data::{HttpTravelMetricsProvider, HttpTravelMetricsProviderConfig};

use crate::CliError;
use crate::request::load_json;

/// Search strategy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum StrategyArg {
    /// Score every interleaving.
    Exhaustive,
    /// Prune prefixes that already cost more than the best ordering.
    BranchAndBound,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Exhaustive => Self::Exhaustive,
            StrategyArg::BranchAndBound => Self::BranchAndBound,
        }
    }
}

/// Settings shared by every subcommand once layers are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanSettings {
    /// Base URL for the OSRM table service.
    pub(crate) osrm_base_url: String,
    /// Precomputed metrics replacing the OSRM call.
    pub(crate) metrics: Option<Utf8PathBuf>,
    /// Search tunables.
    pub(crate) options: SearchOptions,
}

impl PlanSettings {
    pub(crate) fn resolve(
        osrm_base_url: Option<String>,
        metrics: Option<Utf8PathBuf>,
        strategy: Option<StrategyArg>,
        max_stops: Option<usize>,
    ) -> Self {
        let defaults = SearchOptions::default();
        let options = defaults
            .with_strategy(strategy.map_or(defaults.strategy, SearchStrategy::from))
            .with_max_stops(max_stops.unwrap_or(defaults.max_stops));
        Self {
            osrm_base_url: osrm_base_url
                .unwrap_or_else(|| HttpTravelMetricsProviderConfig::default().base_url),
            metrics,
            options,
        }
    }
}

/// Builds the metrics provider for one invocation.
pub(crate) trait ProviderFactory {
    fn build(&self, settings: &PlanSettings) -> Result<Box<dyn TravelMetricsProvider>, CliError>;
}

pub(crate) struct DefaultProviderFactory;

impl ProviderFactory for DefaultProviderFactory {
    fn build(&self, settings: &PlanSettings) -> Result<Box<dyn TravelMetricsProvider>, CliError> {
        if let Some(path) = &settings.metrics {
            return Ok(Box::new(FileTravelMetricsProvider::load(path)?));
        }
        let config = HttpTravelMetricsProviderConfig::new(settings.osrm_base_url.clone());
        let provider = HttpTravelMetricsProvider::with_config(config).map_err(|source| {
            CliError::BuildProvider {
                base_url: settings.osrm_base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(provider))
    }
}

/// On-disk metrics: metres and whole seconds, `null` for unknown pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct MetricsFile {
    pub(crate) distances: Vec<Vec<Option<u64>>>,
    pub(crate) durations_s: Vec<Vec<Option<u64>>>,
}

impl From<MetricsFile> for TravelMetrics {
    fn from(file: MetricsFile) -> Self {
        let durations = file
            .durations_s
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(Duration::from_secs))
                    .collect()
            })
            .collect();
        Self::new(file.distances, durations)
    }
}

/// Serves metrics read once from a JSON file.
#[derive(Debug, Clone)]
pub(crate) struct FileTravelMetricsProvider {
    metrics: TravelMetrics,
}

impl FileTravelMetricsProvider {
    pub(crate) fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let file: MetricsFile = load_json(path, crate::ARG_METRICS)?;
        Ok(Self {
            metrics: file.into(),
        })
    }
}

impl TravelMetricsProvider for FileTravelMetricsProvider {
    fn get_travel_metrics(
        &self,
        locations: &[Location],
    ) -> Result<TravelMetrics, TravelMetricsError> {
        if locations.is_empty() {
            return Err(TravelMetricsError::EmptyInput);
        }
        Ok(self.metrics.clone())
    }
}
