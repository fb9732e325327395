//! JSON request payloads read from disk.

use std::io::BufReader;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use sharedpath_core::{Location, StopId, TimeWindow};

use crate::CliError;

/// Both travelers' stops with optional time windows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct JourneyRequest {
    /// Traveler one's stops in visiting order.
    pub(crate) first: Vec<Location>,
    /// Traveler two's stops in visiting order.
    pub(crate) second: Vec<Location>,
    /// Traveler one's window.
    #[serde(default)]
    pub(crate) first_window: Option<TimeWindow>,
    /// Traveler two's window.
    #[serde(default)]
    pub(crate) second_window: Option<TimeWindow>,
}

impl JourneyRequest {
    /// Both windows, when the request defines them.
    pub(crate) fn windows(&self) -> Option<(TimeWindow, TimeWindow)> {
        self.first_window.zip(self.second_window)
    }
}

/// A journey plus the ordering to check, as raw identities like `"a0"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct CheckRequest {
    #[serde(flatten)]
    pub(crate) journey: JourneyRequest,
    pub(crate) ordering: Vec<StopId>,
}

/// Open `path` and decode JSON from it.
pub(crate) fn load_json<T: DeserializeOwned>(
    path: &Utf8Path,
    field: &'static str,
) -> Result<T, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenInput {
            field,
            path: path.to_path_buf(),
            source,
        }
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}
