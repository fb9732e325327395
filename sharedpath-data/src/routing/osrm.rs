//! OSRM Table service response types.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// Status returned when the service found no route table at all.
pub const NO_TABLE: &str = "NoTable";

/// OSRM Table API response.
///
/// Requested with `annotations=duration,distance`, so a successful response
/// carries both matrices.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// Status code, `"Ok"` on success.
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Durations in seconds; `null` where no route exists.
    pub durations: Option<Vec<Vec<Option<f64>>>>,

    /// Distances in metres; `null` where no route exists.
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Whether the service answered but found nothing to report.
    #[must_use]
    pub fn is_no_table(&self) -> bool {
        self.code == NO_TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn deserialise_success_response() {
        let json = r#"{
            "code": "Ok",
            "durations": [[0.0, 120.5], [118.0, 0.0]],
            "distances": [[0.0, 900.2], [880.0, 0.0]]
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        assert!(response.message.is_none());
        let durations = response.durations.expect("should have durations");
        assert_eq!(durations.get(1).and_then(|row| row.first()), Some(&Some(118.0)));
        let distances = response.distances.expect("should have distances");
        assert_eq!(distances.first().and_then(|row| row.get(1)), Some(&Some(900.2)));
    }

    #[rstest]
    fn deserialise_error_response() {
        let json = r#"{
            "code": "InvalidQuery",
            "message": "Coordinates are invalid"
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert_eq!(response.message.as_deref(), Some("Coordinates are invalid"));
        assert!(response.durations.is_none());
        assert!(response.distances.is_none());
    }

    #[rstest]
    fn recognises_no_table() {
        let json = r#"{ "code": "NoTable", "message": "no route found" }"#;
        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");
        assert!(response.is_no_table());
        assert!(!response.is_ok());
    }

    #[rstest]
    fn deserialise_response_with_nulls() {
        let json = r#"{
            "code": "Ok",
            "durations": [[0.0, null], [null, 0.0]],
            "distances": [[0.0, null], [null, 0.0]]
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        let distances = response.distances.expect("should have distances");
        assert_eq!(distances.first().and_then(|row| row.get(1)), Some(&None));
    }
}
