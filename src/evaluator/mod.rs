pub mod outcome;
pub mod sanitize;
pub mod service;

pub use outcome::{calculate_interdiction_destination, resolve_sub_rule_ref};
pub use sanitize::sanitize_conditions;
pub use service::{ConditionEvaluator, Evaluation, Outcome};

use std::time::Duration;
use thiserror::Error;

/// Errors that abort an evaluation before a result is published.
#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("Malformed transaction message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    #[error("Invalid transaction creation timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("Condition lookup failed for {key}: {source}")]
    Lookup {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Condition lookup for {key} timed out after {timeout:?}")]
    LookupTimeout { key: String, timeout: Duration },
}
