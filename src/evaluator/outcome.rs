use crate::config::{EvaluatorConfig, InterdictionMode};
use crate::domain::{ConditionType, SubRuleRef};

/// Combine applicable condition types into a sub-rule outcome.
///
/// Any block (overridable or not) sets `Block`. The override check runs
/// independently afterwards and only yields to a non-overridable block, so
/// `overridable-block` together with `override` resolves to `Override`.
pub fn resolve_sub_rule_ref(conditions: &[ConditionType]) -> SubRuleRef {
    let mut outcome = SubRuleRef::None;

    if conditions.iter().any(ConditionType::is_block) {
        outcome = SubRuleRef::Block;
    }

    let has_override = conditions.contains(&ConditionType::Override);
    let has_hard_block = conditions.contains(&ConditionType::NonOverridableBlock);

    if has_override && !has_hard_block {
        outcome = SubRuleRef::Override;
    }

    outcome
}

/// Subject interdiction alerts for `tenant_id` are routed to.
pub fn calculate_interdiction_destination(config: &EvaluatorConfig, tenant_id: &str) -> String {
    match config.interdiction_mode {
        InterdictionMode::Tenant => format!("{}-{}", config.interdiction_producer, tenant_id),
        InterdictionMode::Global => config.interdiction_producer.clone(),
    }
}
