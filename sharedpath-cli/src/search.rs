//! `search` command: every cheapest ordering, with timelines when possible.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sharedpath_core::{PlannedOrdering, SharedPathPlanner, Timeline};

use crate::provider::{DefaultProviderFactory, PlanSettings, ProviderFactory, StrategyArg};
use crate::request::{JourneyRequest, load_json};
use crate::{
    ARG_MAX_STOPS, ARG_METRICS, ARG_OSRM_BASE_URL, ARG_REQUEST, ARG_STRATEGY, CliError,
    ENV_SEARCH_REQUEST, write_json,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Find every order-preserving merge of both travelers' stops \
                 with the lowest total distance, breaking ties on duration. \
                 When the request defines both time windows each ordering is \
                 annotated with its timeline.",
    about = "Find the cheapest shared orderings"
)]
#[ortho_config(prefix = "SHAREDPATH")]
pub(crate) struct SearchArgs {
    /// Path to a JSON file describing both travelers.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// JSON file with precomputed distance and duration tables.
    #[arg(long = ARG_METRICS, value_name = "path")]
    #[serde(default)]
    pub(crate) metrics: Option<Utf8PathBuf>,
    /// Enumeration strategy.
    #[arg(long = ARG_STRATEGY, value_enum)]
    #[serde(default)]
    pub(crate) strategy: Option<StrategyArg>,
    /// Largest combined stop count accepted.
    #[arg(long = ARG_MAX_STOPS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_stops: Option<usize>,
}

impl SearchArgs {
    fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) settings: PlanSettings,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_SEARCH_REQUEST,
        })?;
        Ok(Self {
            request_path,
            settings: PlanSettings::resolve(
                args.osrm_base_url,
                args.metrics,
                args.strategy,
                args.max_stops,
            ),
        })
    }
}

/// One optimal ordering in the command output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SearchResult {
    #[serde(flatten)]
    pub(crate) ordering: PlannedOrdering,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) timeline: Option<Timeline>,
}

/// Output of the `search` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SearchOutput {
    pub(crate) orderings: Vec<SearchResult>,
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_search_with(args, &DefaultProviderFactory, &mut stdout)
}

pub(crate) fn run_search_with(
    args: SearchArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let output = execute_search(&config, factory)?;
    write_json(writer, &output)
}

pub(crate) fn execute_search(
    config: &SearchConfig,
    factory: &dyn ProviderFactory,
) -> Result<SearchOutput, CliError> {
    let request: JourneyRequest = load_json(&config.request_path, ARG_REQUEST)?;
    let windows = request.windows();
    let provider = factory.build(&config.settings)?;
    let planner = SharedPathPlanner::prepare(
        request.first,
        request.second,
        provider.as_ref(),
        config.settings.options,
    )?;

    let orderings = planner
        .search()?
        .into_iter()
        .map(|ordering| {
            let timeline = windows
                .map(|(first, second)| planner.check_feasibility(&ordering.stops, &first, &second))
                .transpose()?;
            Ok(SearchResult { ordering, timeline })
        })
        .collect::<Result<Vec<_>, CliError>>()?;

    let feasible = orderings
        .iter()
        .filter(|result| result.timeline.as_ref().is_some_and(|t| t.valid))
        .count();
    info!(
        "found {} optimal ordering(s), {feasible} within both windows",
        orderings.len()
    );
    Ok(SearchOutput { orderings })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
