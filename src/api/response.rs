use serde::Serialize;

use crate::domain::RuleResult;

/// Response to an accepted transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    #[serde(rename = "ruleResult")]
    pub rule_result: RuleResult,

    /// Whether an interdiction alert was issued
    pub interdicted: bool,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub rule_id: String,
    pub uptime_secs: u64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "BAD_REQUEST")
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ErrorResponse::new(message, "UNAVAILABLE")
    }
}
