//! `check` command: the timeline of one ordering.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sharedpath_core::{SharedPathPlanner, Timeline};

use crate::provider::{DefaultProviderFactory, PlanSettings, ProviderFactory};
use crate::request::{CheckRequest, load_json};
use crate::{ARG_METRICS, ARG_OSRM_BASE_URL, ARG_REQUEST, CliError, ENV_CHECK_REQUEST, write_json};

/// CLI arguments for the `check` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compute start and end times for both travelers along one \
                 ordering and report whether both time windows hold. The \
                 request lists the ordering as identities such as \"a0\".",
    about = "Check one ordering against both time windows"
)]
#[ortho_config(prefix = "SHAREDPATH")]
pub(crate) struct CheckArgs {
    /// Path to a JSON file describing both travelers and the ordering.
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
}

impl CheckArgs {
    fn into_config(self) -> Result<CheckConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CheckConfig::try_from(merged)
    }
}

/// Resolved `check` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) settings: PlanSettings,
}

impl TryFrom<CheckArgs> for CheckConfig {
    type Error = CliError;

    fn try_from(args: CheckArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_CHECK_REQUEST,
        })?;
        Ok(Self {
            request_path,
            settings: PlanSettings::resolve(args.osrm_base_url, args.metrics, None, None),
        })
    }
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_check_with(args, &DefaultProviderFactory, &mut stdout)
}

pub(crate) fn run_check_with(
    args: CheckArgs,
    factory: &dyn ProviderFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let timeline = execute_check(&config, factory)?;
    write_json(writer, &timeline)
}

pub(crate) fn execute_check(
    config: &CheckConfig,
    factory: &dyn ProviderFactory,
) -> Result<Timeline, CliError> {
    let request: CheckRequest = load_json(&config.request_path, ARG_REQUEST)?;
    let Some((first_window, second_window)) = request.journey.windows() else {
        return Err(CliError::MissingWindows {
            path: config.request_path.clone(),
        });
    };
    let provider = factory.build(&config.settings)?;
    let planner = SharedPathPlanner::prepare(
        request.journey.first,
        request.journey.second,
        provider.as_ref(),
        config.settings.options,
    )?;
    Ok(planner.check_feasibility(request.ordering, &first_window, &second_window)?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<CheckConfig, CliError> {
    let merged = CheckArgs::merge_from_layers(layers).map_err(CliError::from)?;
    CheckConfig::try_from(merged)
}
