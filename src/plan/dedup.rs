//! Plan deduplication

use std::collections::HashSet;

use crate::core::types::Plan;

/// Keep the first plan of each (plan type, date) pair, preserving order.
///
/// Both parts compare exactly: the type case-sensitively and the date as the
/// raw serialized string, so two timestamps on the same day stay distinct.
pub fn dedup_plans(plans: Vec<Plan>) -> Vec<Plan> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(plans.len());
    let before = plans.len();

    let unique: Vec<Plan> = plans
        .into_iter()
        .filter(|plan| seen.insert((plan.plan_type.clone(), plan.date.clone())))
        .collect();

    if unique.len() != before {
        tracing::debug!(
            removed = before - unique.len(),
            kept = unique.len(),
            "Dropped duplicate plans"
        );
    }

    unique
}
