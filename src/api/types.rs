//! Request/response types for the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Successful import response.
///
/// The count is all-or-nothing: the caller never sees a partial batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    /// Rows inserted by this import.
    pub count: u64,
}

impl ImportResponse {
    pub fn new(count: u64) -> Self {
        Self {
            message: "Data imported and report generated successfully.".to_string(),
            count,
        }
    }
}

/// Build an error response body.
pub fn error_response(message: &str) -> Value {
    json!({ "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_response_serialization() {
        let response = ImportResponse::new(42);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"count\":42"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("boom");
        assert_eq!(body["error"], "boom");
    }
}
