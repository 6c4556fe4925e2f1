use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::store::KeyScheme;

/// Routing of interdiction alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterdictionMode {
    /// One shared interdiction subject
    #[default]
    Global,
    /// One subject per tenant (`<producer>-<tenant>`)
    Tenant,
}

impl InterdictionMode {
    /// Parse a mode name. `tenant` in any case selects per-tenant routing;
    /// anything else, including an empty value, is global.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("tenant") {
            InterdictionMode::Tenant
        } else {
            InterdictionMode::Global
        }
    }
}

/// What to do when a condition lookup fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LookupFailurePolicy {
    /// Abort the evaluation; nothing is published
    #[default]
    Fail,
    /// Treat the failed lookup as having no conditions
    Degrade,
}

/// Settings the evaluator reads, injected at construction.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub rule_name: String,
    pub rule_version: String,
    pub function_name: String,
    pub suppress_alerts: bool,
    pub interdiction_producer: String,
    pub interdiction_mode: InterdictionMode,
    pub key_scheme: KeyScheme,
    pub lookup_timeout: Option<Duration>,
    pub lookup_failure: LookupFailurePolicy,
}

impl EvaluatorConfig {
    /// Rule identifier (`name@version`).
    pub fn rule_id(&self) -> String {
        format!("{}@{}", self.rule_name, self.rule_version)
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            rule_name: "EFRuP".to_string(),
            rule_version: "1.0.0".to_string(),
            function_name: "event-flow-rule-processor".to_string(),
            suppress_alerts: false,
            interdiction_producer: "interdiction-service".to_string(),
            interdiction_mode: InterdictionMode::Global,
            key_scheme: KeyScheme::Scoped,
            lookup_timeout: None,
            lookup_failure: LookupFailurePolicy::Fail,
        }
    }
}

/// Event flow rule processor configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "efrup")]
#[command(about = "Event flow rule processor")]
pub struct Config {
    /// Rule name
    #[arg(long, default_value = "EFRuP", env = "RULE_NAME")]
    pub rule_name: String,

    /// Rule version
    #[arg(long, default_value = "1.0.0", env = "RULE_VERSION")]
    pub rule_version: String,

    /// Function name reported on error logs
    #[arg(long, default_value = "event-flow-rule-processor", env = "FUNCTION_NAME")]
    pub function_name: String,

    /// Disable interdiction alerts
    #[arg(long, default_value = "false", env = "SUPPRESS_ALERTS")]
    pub suppress_alerts: bool,

    /// Interdiction alert subject name
    #[arg(long, default_value = "interdiction-service", env = "INTERDICTION_PRODUCER")]
    pub interdiction_producer: String,

    /// Interdiction routing mode (global, tenant)
    #[arg(long, default_value = "global", env = "INTERDICTION_DESTINATION")]
    pub interdiction_destination: String,

    /// Condition store key layout
    #[arg(long, value_enum, default_value = "scoped", env = "EFRUP_KEY_SCHEME")]
    pub key_scheme: KeyScheme,

    /// Per-lookup deadline in milliseconds (unset waits indefinitely)
    #[arg(long, env = "EFRUP_LOOKUP_TIMEOUT_MS")]
    pub lookup_timeout_ms: Option<u64>,

    /// Policy for failed condition lookups
    #[arg(long, value_enum, default_value = "fail", env = "EFRUP_LOOKUP_FAILURE")]
    pub lookup_failure: LookupFailurePolicy,

    /// HTTP server listen address
    #[arg(long, default_value = "0.0.0.0:8080", env = "EFRUP_LISTEN_ADDR")]
    pub listen_addr: String,

    /// YAML file of conditions to seed the in-memory store (optional)
    #[arg(long, env = "EFRUP_FIXTURES_PATH")]
    pub fixtures_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, default_value = "false", env = "EFRUP_LOG_JSON")]
    pub log_json: bool,

    /// Enable graceful shutdown
    #[arg(long, default_value = "true", env = "EFRUP_GRACEFUL_SHUTDOWN")]
    pub graceful_shutdown: bool,
}

impl Config {
    /// Build the evaluator settings.
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            rule_name: self.rule_name.clone(),
            rule_version: self.rule_version.clone(),
            function_name: self.function_name.clone(),
            suppress_alerts: self.suppress_alerts,
            interdiction_producer: self.interdiction_producer.clone(),
            interdiction_mode: InterdictionMode::parse(&self.interdiction_destination),
            key_scheme: self.key_scheme,
            lookup_timeout: self.lookup_timeout(),
            lookup_failure: self.lookup_failure,
        }
    }

    /// Get the lookup deadline as Duration.
    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_ms.map(Duration::from_millis)
    }

    /// Subject the rule consumes from.
    pub fn consumer_subject(&self) -> String {
        format!("sub-rule-{}@{}", self.rule_name, self.rule_version)
    }

    /// Default subject results are published to.
    pub fn producer_subject(&self) -> String {
        format!("pub-rule-{}@{}", self.rule_name, self.rule_version)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rule_name: "EFRuP".to_string(),
            rule_version: "1.0.0".to_string(),
            function_name: "event-flow-rule-processor".to_string(),
            suppress_alerts: false,
            interdiction_producer: "interdiction-service".to_string(),
            interdiction_destination: "global".to_string(),
            key_scheme: KeyScheme::Scoped,
            lookup_timeout_ms: None,
            lookup_failure: LookupFailurePolicy::Fail,
            listen_addr: "0.0.0.0:8080".to_string(),
            fixtures_path: None,
            log_level: "info".to_string(),
            log_json: false,
            graceful_shutdown: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.consumer_subject(), "sub-rule-EFRuP@1.0.0");
        assert_eq!(config.producer_subject(), "pub-rule-EFRuP@1.0.0");
        assert!(config.lookup_timeout().is_none());
    }

    #[test]
    fn test_interdiction_mode_parsing() {
        assert_eq!(InterdictionMode::parse("tenant"), InterdictionMode::Tenant);
        assert_eq!(InterdictionMode::parse("TENANT"), InterdictionMode::Tenant);
        assert_eq!(InterdictionMode::parse("global"), InterdictionMode::Global);
        assert_eq!(InterdictionMode::parse(""), InterdictionMode::Global);
        assert_eq!(InterdictionMode::parse("regional"), InterdictionMode::Global);
    }

    #[test]
    fn test_evaluator_config() {
        let config = Config {
            interdiction_destination: "Tenant".to_string(),
            lookup_timeout_ms: Some(250),
            suppress_alerts: true,
            ..Default::default()
        };

        let eval = config.evaluator_config();

        assert_eq!(eval.rule_id(), "EFRuP@1.0.0");
        assert_eq!(eval.interdiction_mode, InterdictionMode::Tenant);
        assert_eq!(eval.lookup_timeout, Some(Duration::from_millis(250)));
        assert!(eval.suppress_alerts);
    }

    #[test]
    fn test_parse_from_args() {
        let config = Config::try_parse_from([
            "efrup",
            "--rule-version",
            "2.0.0",
            "--key-scheme",
            "legacy",
            "--lookup-failure",
            "degrade",
        ])
        .unwrap();

        let eval = config.evaluator_config();
        assert_eq!(eval.rule_id(), "EFRuP@2.0.0");
        assert_eq!(eval.key_scheme, KeyScheme::Legacy);
        assert_eq!(eval.lookup_failure, LookupFailurePolicy::Degrade);
    }
}
