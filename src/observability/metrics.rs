use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::domain::SubRuleRef;

/// Metrics registry for the evaluator.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Total evaluations completed
    pub evaluations_total: AtomicU64,

    /// Evaluations by outcome
    pub outcome_none: AtomicU64,
    pub outcome_override: AtomicU64,
    pub outcome_block: AtomicU64,

    /// Evaluation latency buckets (microseconds)
    pub latency_under_1ms: AtomicU64,
    pub latency_1_5ms: AtomicU64,
    pub latency_5_10ms: AtomicU64,
    pub latency_10_50ms: AtomicU64,
    pub latency_50_100ms: AtomicU64,
    pub latency_over_100ms: AtomicU64,

    /// Interdiction alerts accepted by the publisher
    pub alerts_sent_total: AtomicU64,
    pub alert_publish_errors: AtomicU64,

    /// Primary result publishing
    pub publish_errors: AtomicU64,

    /// Condition records that failed to decode
    pub decode_errors: AtomicU64,

    /// Condition lookups that failed or timed out
    pub lookup_errors: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        MetricsRegistry::default()
    }

    /// Record an evaluation outcome.
    pub fn record_outcome(&self, outcome: SubRuleRef) {
        self.evaluations_total.fetch_add(1, Ordering::Relaxed);

        match outcome {
            SubRuleRef::None => {
                self.outcome_none.fetch_add(1, Ordering::Relaxed);
            }
            SubRuleRef::Override => {
                self.outcome_override.fetch_add(1, Ordering::Relaxed);
            }
            SubRuleRef::Block => {
                self.outcome_block.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Record evaluation latency.
    pub fn record_latency(&self, start: Instant) {
        let micros = start.elapsed().as_micros() as u64;

        if micros < 1000 {
            self.latency_under_1ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 5000 {
            self.latency_1_5ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 10000 {
            self.latency_5_10ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 50000 {
            self.latency_10_50ms.fetch_add(1, Ordering::Relaxed);
        } else if micros < 100000 {
            self.latency_50_100ms.fetch_add(1, Ordering::Relaxed);
        } else {
            self.latency_over_100ms.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record an interdiction alert publish.
    pub fn record_alert(&self, success: bool) {
        if success {
            self.alerts_sent_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.alert_publish_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_publish_error(&self) {
        self.publish_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_error(&self) {
        self.lookup_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        format!(
            r#"# HELP efrup_evaluations_total Total number of transaction evaluations
# TYPE efrup_evaluations_total counter
efrup_evaluations_total {}

# HELP efrup_outcomes Evaluations by sub-rule outcome
# TYPE efrup_outcomes counter
efrup_outcomes{{outcome="none"}} {}
efrup_outcomes{{outcome="override"}} {}
efrup_outcomes{{outcome="block"}} {}

# HELP efrup_evaluation_latency_bucket Evaluation latency histogram
# TYPE efrup_evaluation_latency_bucket counter
efrup_evaluation_latency_bucket{{le="0.001"}} {}
efrup_evaluation_latency_bucket{{le="0.005"}} {}
efrup_evaluation_latency_bucket{{le="0.01"}} {}
efrup_evaluation_latency_bucket{{le="0.05"}} {}
efrup_evaluation_latency_bucket{{le="0.1"}} {}
efrup_evaluation_latency_bucket{{le="+Inf"}} {}

# HELP efrup_alerts_total Interdiction alerts published successfully
# TYPE efrup_alerts_total counter
efrup_alerts_total {}

# HELP efrup_alert_errors_total Interdiction alert publish errors
# TYPE efrup_alert_errors_total counter
efrup_alert_errors_total {}

# HELP efrup_publish_errors_total Rule result publish errors
# TYPE efrup_publish_errors_total counter
efrup_publish_errors_total {}

# HELP efrup_decode_errors_total Condition records that failed to decode
# TYPE efrup_decode_errors_total counter
efrup_decode_errors_total {}

# HELP efrup_lookup_errors_total Condition lookups that failed
# TYPE efrup_lookup_errors_total counter
efrup_lookup_errors_total {}
"#,
            self.evaluations_total.load(Ordering::Relaxed),
            self.outcome_none.load(Ordering::Relaxed),
            self.outcome_override.load(Ordering::Relaxed),
            self.outcome_block.load(Ordering::Relaxed),
            self.latency_under_1ms.load(Ordering::Relaxed),
            self.latency_1_5ms.load(Ordering::Relaxed),
            self.latency_5_10ms.load(Ordering::Relaxed),
            self.latency_10_50ms.load(Ordering::Relaxed),
            self.latency_50_100ms.load(Ordering::Relaxed),
            self.latency_over_100ms.load(Ordering::Relaxed),
            self.alerts_sent_total.load(Ordering::Relaxed),
            self.alert_publish_errors.load(Ordering::Relaxed),
            self.publish_errors.load(Ordering::Relaxed),
            self.decode_errors.load(Ordering::Relaxed),
            self.lookup_errors.load(Ordering::Relaxed),
        )
    }
}
