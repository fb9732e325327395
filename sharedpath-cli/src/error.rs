//! Error types emitted by the CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sharedpath_core::{FeasibilityError, PlanError, SearchError};
use sharedpath_data::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass <{field}> or set {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// An input file could not be opened.
    #[error("failed to open {field} at {path:?}: {source}")]
    OpenInput {
        /// Which input was being opened.
        field: &'static str,
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// An input file held malformed JSON.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseInput {
        /// Which input was being parsed.
        field: &'static str,
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },
    /// The check request carries no time windows.
    #[error("request {path:?} must define both first_window and second_window")]
    MissingWindows {
        /// Path of the request.
        path: Utf8PathBuf,
    },
    /// Constructing the HTTP metrics provider failed.
    #[error("failed to build travel metrics provider for {base_url:?}: {source}")]
    BuildProvider {
        /// Configured OSRM endpoint.
        base_url: String,
        /// Underlying construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// Fetching metrics failed.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// The search could not produce orderings.
    #[error("search failed: {0}")]
    Search(#[from] SearchError),
    /// The timeline could not be computed.
    #[error("feasibility check failed: {0}")]
    Feasibility(#[from] FeasibilityError),
    /// Serialising the output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
