//! Standardized API error body.

use serde::{Deserialize, Serialize};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The HTTP status code.
    pub code: u16,

    /// A short, human-readable summary of the problem.
    pub message: String,

    /// Client-actionable explanation. Only set for request errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Path of an unmatched route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Method rejected by a matched route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            path: None,
            method: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::new(400, "Invalid request").with_details(details)
    }

    pub fn not_found() -> Self {
        Self::new(404, "Resource not found")
    }

    pub fn conflict() -> Self {
        Self::new(409, "State conflict")
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal error")
    }

    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(404, "Route not found")
        }
    }

    pub fn method_not_allowed(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..Self::new(405, "Method not allowed")
        }
    }
}
