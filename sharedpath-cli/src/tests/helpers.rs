//! Fixtures for composing request files and stub providers.

use super::*;
use crate::provider::{MetricsFile, PlanSettings, ProviderFactory};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use sharedpath_core::TravelMetricsProvider;
use sharedpath_data::routing::test_support::StubTravelMetricsProvider;
use std::fs;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary directory holding request and metrics files.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_json(&self, name: &str, value: &Value) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_string_pretty(value).expect("serialise fixture");
        write_utf8(&path, payload.as_bytes());
        path
    }
}

/// Two stops per traveler along a line in central London.
pub(super) fn journey() -> Value {
    json!({
        "first": [
            { "coord": { "x": -0.10, "y": 51.50 }, "address": "Pickup A" },
            { "coord": { "x": -0.12, "y": 51.51 } }
        ],
        "second": [
            { "coord": { "x": -0.11, "y": 51.50 } },
            { "coord": { "x": -0.13, "y": 51.52 } }
        ]
    })
}

pub(super) fn with_windows(mut request: Value, second_latest: &str) -> Value {
    if let Some(map) = request.as_object_mut() {
        map.insert(
            "first_window".to_owned(),
            json!({
                "earliest_departure": "2024-05-01T08:00:00Z",
                "latest_arrival": "2024-05-01T09:00:00Z"
            }),
        );
        map.insert(
            "second_window".to_owned(),
            json!({
                "earliest_departure": "2024-05-01T08:00:00Z",
                "latest_arrival": second_latest
            }),
        );
    }
    request
}

/// Every hop costs 10 m / 600 s except `b0 -> a1` and `a1 -> b1`, making
/// `a0, b0, a1, b1` the unique cheapest ordering at 12 m / 720 s.
pub(super) fn crossing_metrics() -> MetricsFile {
    MetricsFile {
        distances: vec![
            vec![Some(0), Some(10), Some(10), Some(10)],
            vec![Some(10), Some(0), Some(10), Some(1)],
            vec![Some(10), Some(1), Some(0), Some(10)],
            vec![Some(10), Some(10), Some(10), Some(0)],
        ],
        durations_s: vec![
            vec![Some(0), Some(600), Some(600), Some(600)],
            vec![Some(600), Some(0), Some(600), Some(60)],
            vec![Some(600), Some(60), Some(0), Some(600)],
            vec![Some(600), Some(600), Some(600), Some(0)],
        ],
    }
}

/// Hands out a stub provider and records the settings it was asked for.
#[derive(Debug)]
pub(super) struct StubProviderFactory {
    stub: StubTravelMetricsProvider,
    pub(super) seen: std::cell::RefCell<Option<PlanSettings>>,
}

impl StubProviderFactory {
    pub(super) fn new(stub: StubTravelMetricsProvider) -> Self {
        Self {
            stub,
            seen: std::cell::RefCell::new(None),
        }
    }

    pub(super) fn crossing() -> Self {
        Self::new(StubTravelMetricsProvider::with_metrics(
            crossing_metrics().into(),
        ))
    }
}

impl ProviderFactory for StubProviderFactory {
    fn build(&self, settings: &PlanSettings) -> Result<Box<dyn TravelMetricsProvider>, CliError> {
        self.seen.replace(Some(settings.clone()));
        Ok(Box::new(self.stub.clone()))
    }
}
