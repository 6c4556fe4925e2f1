use chrono::{DateTime, Utc};

use crate::domain::{Condition, ConditionType, Side};

/// Reduce looked-up conditions to the types that apply to a transaction.
///
/// A condition applies when `transaction_date` lies in its validity window
/// and it has a perspective governing the side it was looked up under for
/// the transaction type (or the wildcard). Each matching perspective emits
/// the condition type once. Creditor-side results come first, then
/// debtor-side, each in input order.
pub fn sanitize_conditions(
    creditor_conditions: &[Condition],
    debtor_conditions: &[Condition],
    transaction_date: DateTime<Utc>,
    tx_type: &str,
) -> Vec<ConditionType> {
    let mut applicable = Vec::new();

    collect_side(
        &mut applicable,
        Side::Creditor,
        creditor_conditions,
        transaction_date,
        tx_type,
    );
    collect_side(
        &mut applicable,
        Side::Debtor,
        debtor_conditions,
        transaction_date,
        tx_type,
    );

    applicable
}

fn collect_side(
    out: &mut Vec<ConditionType>,
    side: Side,
    conditions: &[Condition],
    transaction_date: DateTime<Utc>,
    tx_type: &str,
) {
    for condition in conditions.iter().filter(|c| c.is_active_at(transaction_date)) {
        let matches = condition
            .perspectives
            .iter()
            .filter(|p| side.governs(&p.role) && p.matches_event_type(tx_type))
            .count();

        out.extend(std::iter::repeat(condition.condition_type.clone()).take(matches));
    }
}
