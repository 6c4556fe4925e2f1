use serde_json::{Map, Value};
use std::future::{poll_fn, Future};
use std::sync::Arc;
use std::task::Poll;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::codec::ConditionDecoder;
use crate::config::{EvaluatorConfig, LookupFailurePolicy};
use crate::domain::{parse_timestamp, Condition, ConditionType, RuleResult, TransactionEnvelope};
use crate::observability::MetricsRegistry;
use crate::publish::Publisher;
use crate::store::{ConditionStore, PartyKind};
use crate::tenant::extract_tenant_id;

use super::outcome::{calculate_interdiction_destination, resolve_sub_rule_ref};
use super::sanitize::sanitize_conditions;
use super::EvaluatorError;

/// Outcome of [`ConditionEvaluator::determine_outcome`].
#[derive(Debug)]
pub struct Outcome {
    pub rule_result: RuleResult,

    /// Detached interdiction alert task, if one was issued
    pub alert: Option<JoinHandle<()>>,
}

/// Result of a completed evaluation.
///
/// The primary result has already been published. Dropping the value
/// leaves any interdiction alert running in the background.
#[derive(Debug)]
pub struct Evaluation {
    pub rule_result: RuleResult,
    pub alert: Option<JoinHandle<()>>,
}

impl Evaluation {
    /// Wait for the interdiction alert (if any) to finish.
    pub async fn join_alert(self) -> RuleResult {
        if let Some(handle) = self.alert {
            if let Err(e) = handle.await {
                warn!(error = %e, "Interdiction alert task did not complete");
            }
        }
        self.rule_result
    }
}

/// Party lookups in evaluation order. The first two feed the creditor side.
const LOOKUPS: [PartyKind; 4] = [
    PartyKind::Entity,
    PartyKind::Account,
    PartyKind::Entity,
    PartyKind::Account,
];

/// Evaluates stored party conditions against inbound transactions.
pub struct ConditionEvaluator {
    config: Arc<EvaluatorConfig>,
    store: Arc<dyn ConditionStore>,
    decoder: Arc<dyn ConditionDecoder>,
    publisher: Arc<dyn Publisher>,
    metrics: Arc<MetricsRegistry>,
}

impl ConditionEvaluator {
    pub fn new(
        config: EvaluatorConfig,
        store: Arc<dyn ConditionStore>,
        decoder: Arc<dyn ConditionDecoder>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        ConditionEvaluator {
            config: Arc::new(config),
            store,
            decoder,
            publisher,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Share an existing metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Subject interdiction alerts for `tenant_id` are routed to.
    pub fn calculate_interdiction_destination(&self, tenant_id: &str) -> String {
        calculate_interdiction_destination(&self.config, tenant_id)
    }

    /// Evaluate one inbound message and publish the result.
    ///
    /// Decode and publish failures are logged and absorbed. Errors are
    /// returned only for malformed messages and, under
    /// [`LookupFailurePolicy::Fail`], failed lookups; nothing is published
    /// in those cases.
    pub async fn handle_transaction(&self, message: Value) -> Result<Evaluation, EvaluatorError> {
        let span = info_span!(
            "evaluate",
            evaluation_id = %Uuid::new_v4(),
            tenant = tracing::field::Empty,
        );

        let result = self.evaluate(message).instrument(span.clone()).await;

        if let Err(ref e) = result {
            let _guard = span.enter();
            error!(
                error = %e,
                rule_id = %self.config.rule_id(),
                function_name = %self.config.function_name,
                "Failed to evaluate transaction"
            );
        }

        result
    }

    async fn evaluate(&self, message: Value) -> Result<Evaluation, EvaluatorError> {
        let start = Instant::now();

        let envelope: TransactionEnvelope = serde_json::from_value(message.clone())?;
        let tenant_id = extract_tenant_id(message.get("transaction"));
        Span::current().record("tenant", tenant_id.as_str());

        let created_at = &envelope.transaction.payment_status.group_header.created_at;
        let transaction_date = parse_timestamp(created_at)
            .ok_or_else(|| EvaluatorError::InvalidTimestamp(created_at.clone()))?;

        let cache = &envelope.data_cache;
        let party_ids = [
            &cache.creditor_id,
            &cache.creditor_account_id,
            &cache.debtor_id,
            &cache.debtor_account_id,
        ];
        let keys: Vec<String> = LOOKUPS
            .iter()
            .zip(party_ids)
            .map(|(kind, id)| self.config.key_scheme.key(*kind, &tenant_id, id))
            .collect();

        let records = self.fetch_all(&keys).await?;

        let mut creditor_conditions = Vec::new();
        let mut debtor_conditions = Vec::new();

        for (idx, (key, record)) in keys.iter().zip(records).enumerate() {
            let conditions = self.decode_record(key, record);
            if idx < 2 {
                creditor_conditions.extend(conditions);
            } else {
                debtor_conditions.extend(conditions);
            }
        }

        let applicable = sanitize_conditions(
            &creditor_conditions,
            &debtor_conditions,
            transaction_date,
            &envelope.transaction.tx_type,
        );

        debug!(
            creditor = creditor_conditions.len(),
            debtor = debtor_conditions.len(),
            applicable = applicable.len(),
            "Sanitized conditions"
        );

        let Outcome {
            mut rule_result,
            alert,
        } = self.determine_outcome(&applicable, &message, &tenant_id).await;

        rule_result.processing_time = start.elapsed().as_nanos() as u64;

        let response = with_rule_result(&message, &rule_result);
        if let Err(e) = self.publisher.handle_response(response, None).await {
            self.metrics.record_publish_error();
            error!(
                error = %e,
                rule_id = %rule_result.id,
                function_name = %self.config.function_name,
                "Failed to send to Typology Processor."
            );
        }

        self.metrics.record_outcome(rule_result.sub_rule_ref);
        self.metrics.record_latency(start);

        info!(
            sub_rule_ref = %rule_result.sub_rule_ref,
            latency_ms = start.elapsed().as_millis(),
            "Evaluation completed"
        );

        Ok(Evaluation { rule_result, alert })
    }

    /// Combine applicable condition types into a rule result.
    ///
    /// A `block` outcome with alerting enabled issues an alert carrying
    /// `{ ...request, ruleResult }` to the interdiction subject before
    /// returning. The alert is handed to the publisher here; completion is
    /// left to a detached task. Must be called from within a Tokio runtime.
    pub async fn determine_outcome(
        &self,
        conditions: &[ConditionType],
        request: &Value,
        tenant_id: &str,
    ) -> Outcome {
        let sub_rule_ref = resolve_sub_rule_ref(conditions);
        let rule_result = RuleResult::new(self.config.rule_id(), sub_rule_ref, tenant_id);

        let alert = if sub_rule_ref.is_block() && !self.config.suppress_alerts {
            Some(self.spawn_alert(request, &rule_result, tenant_id).await)
        } else {
            None
        };

        Outcome { rule_result, alert }
    }

    async fn spawn_alert(
        &self,
        request: &Value,
        rule_result: &RuleResult,
        tenant_id: &str,
    ) -> JoinHandle<()> {
        let destination = self.calculate_interdiction_destination(tenant_id);
        let payload = with_rule_result(request, rule_result);
        let publisher = Arc::clone(&self.publisher);
        let metrics = Arc::clone(&self.metrics);
        let config = Arc::clone(&self.config);

        let routed = vec![destination.clone()];
        let mut publish =
            Box::pin(async move { publisher.handle_response(payload, Some(routed)).await });

        // Issue the alert before the caller publishes the primary result.
        let first_poll = poll_fn(|cx| Poll::Ready(publish.as_mut().poll(cx))).await;

        let task = async move {
            let result = match first_poll {
                Poll::Ready(result) => result,
                Poll::Pending => publish.await,
            };

            match result {
                Ok(()) => {
                    metrics.record_alert(true);
                    debug!(destination = %destination, "Interdiction alert sent");
                }
                Err(e) => {
                    metrics.record_alert(false);
                    error!(
                        destination = %destination,
                        error = %e,
                        rule_id = %config.rule_id(),
                        function_name = %config.function_name,
                        "Error while sending Event Flow Rule Processor result to {}",
                        config.interdiction_producer
                    );
                }
            }
        };

        tokio::spawn(task.instrument(Span::current()))
    }

    /// Fetch all records concurrently, applying the lookup failure policy.
    async fn fetch_all(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>, EvaluatorError> {
        let (creditor, creditor_account, debtor, debtor_account) = tokio::join!(
            self.fetch(&keys[0]),
            self.fetch(&keys[1]),
            self.fetch(&keys[2]),
            self.fetch(&keys[3]),
        );

        let mut records = Vec::with_capacity(keys.len());

        for (key, result) in keys
            .iter()
            .zip([creditor, creditor_account, debtor, debtor_account])
        {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    self.metrics.record_lookup_error();
                    match self.config.lookup_failure {
                        LookupFailurePolicy::Fail => return Err(e),
                        LookupFailurePolicy::Degrade => {
                            warn!(
                                key = %key,
                                error = %e,
                                rule_id = %self.config.rule_id(),
                                function_name = %self.config.function_name,
                                "Condition lookup failed, continuing without conditions"
                            );
                            records.push(None);
                        }
                    }
                }
            }
        }

        Ok(records)
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, EvaluatorError> {
        let lookup = self.store.get_buffer(key);

        let result = match self.config.lookup_timeout {
            Some(timeout) => tokio::time::timeout(timeout, lookup).await.map_err(|_| {
                EvaluatorError::LookupTimeout {
                    key: key.to_string(),
                    timeout,
                }
            })?,
            None => lookup.await,
        };

        result.map_err(|source| EvaluatorError::Lookup {
            key: key.to_string(),
            source,
        })
    }

    /// Decode a fetched record. Missing, empty, and undecodable records
    /// contribute no conditions.
    fn decode_record(&self, key: &str, record: Option<Vec<u8>>) -> Vec<Condition> {
        let Some(bytes) = record.filter(|b| !b.is_empty()) else {
            return Vec::new();
        };

        match self.decoder.decode(&bytes) {
            Ok(conditions) => conditions,
            Err(e) => {
                self.metrics.record_decode_error();
                error!(
                    key = %key,
                    error = %e,
                    rule_id = %self.config.rule_id(),
                    function_name = %self.config.function_name,
                    "Could not decode a condition"
                );
                Vec::new()
            }
        }
    }
}

/// Copy of `request` with `ruleResult` attached.
fn with_rule_result(request: &Value, rule_result: &RuleResult) -> Value {
    let result = rule_result.to_json();

    let mut fields = match request {
        Value::Object(fields) => fields.clone(),
        other => {
            let mut fields = Map::new();
            fields.insert("request".to_string(), other.clone());
            fields
        }
    };

    fields.insert("ruleResult".to_string(), result);
    Value::Object(fields)
}
