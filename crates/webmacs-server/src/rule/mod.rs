//! Pure predicate evaluator plus cooldown/action integration (§4.E).

mod throttle;

pub use throttle::ThrottleGate;

use diesel_async::AsyncPgConnection;
use jiff_diesel::Timestamp as DieselTimestamp;
use uuid::Uuid;
use webmacs_data::model::Rule;
use webmacs_data::query::RuleRepository;
use webmacs_data::types::RuleOperator;
use webmacs_webhook::{Dispatcher, WebhookPayload};

/// Tracing target for rule evaluation and trigger events.
pub const TRACING_TARGET: &str = "webmacs_server::rule";

/// `eval(value, operator, threshold, threshold_high)` — §4.E. A missing
/// `threshold_high` on an operator that requires one evaluates to `false`
/// rather than raising.
pub fn eval_predicate(
    value: f64,
    operator: RuleOperator,
    threshold: f64,
    threshold_high: Option<f64>,
) -> bool {
    match operator {
        RuleOperator::Gt => value > threshold,
        RuleOperator::Lt => value < threshold,
        RuleOperator::Gte => value >= threshold,
        RuleOperator::Lte => value <= threshold,
        RuleOperator::Eq => (value - threshold).abs() < 1e-9,
        RuleOperator::Between => match threshold_high {
            Some(high) => threshold <= value && value <= high,
            None => false,
        },
        RuleOperator::NotBetween => match threshold_high {
            Some(high) => value < threshold || value > high,
            None => false,
        },
    }
}

/// Whether a rule whose predicate just fired is still in its cooldown
/// window (§4.E: "last_triggered_at = null has no cooldown").
fn in_cooldown(rule: &Rule, now: jiff::Timestamp) -> bool {
    match rule.last_triggered_at {
        None => false,
        Some(last) => {
            let elapsed = now - jiff::Timestamp::from(last);
            elapsed.get_seconds() < rule.cooldown_seconds as i64
        }
    }
}

/// Default webhook event type for a triggered rule with no configured
/// override (§4.E).
const DEFAULT_TRIGGER_EVENT_TYPE: &str = "sensor.threshold_exceeded";

/// Evaluates every enabled rule for one event/value pair, firing actions
/// for those that trigger, and returns the trigger count (§4.E step 3).
///
/// Rule action execution never blocks the caller: webhook actions are
/// handed to `dispatcher` as a detached background task before this
/// function returns.
pub async fn evaluate_and_trigger(
    conn: &mut AsyncPgConnection,
    dispatcher: &Dispatcher,
    event_public_id: Uuid,
    value: f64,
) -> webmacs_data::PgResult<u32> {
    let rules = match find_rules_for_event(conn, event_public_id).await {
        Ok(rules) => rules,
        Err(err) => {
            tracing::error!(target: TRACING_TARGET, event_public_id = %event_public_id, error = %err, "rule lookup failed");
            return Err(err);
        }
    };

    let now = jiff::Timestamp::now();
    let mut triggered = 0u32;

    for rule in rules {
        if !eval_predicate(value, rule.operator, rule.threshold, rule.threshold_high) {
            continue;
        }
        if in_cooldown(&rule, now) {
            continue;
        }

        if let Err(err) = RuleRepository::mark_triggered(conn, rule.id, DieselTimestamp::from(now)).await {
            tracing::error!(target: TRACING_TARGET, rule_id = rule.id, error = %err, "failed to flush cooldown before firing rule action");
            continue;
        }

        triggered += 1;
        fire_action(dispatcher, &rule, event_public_id, value);
    }

    Ok(triggered)
}

/// Events are looked up by internal id in the repository layer; this
/// resolves `event_public_id` once per evaluation via the same connection
/// the ingestion pipeline already holds.
async fn find_rules_for_event(
    conn: &mut AsyncPgConnection,
    event_public_id: Uuid,
) -> webmacs_data::PgResult<Vec<Rule>> {
    let event = webmacs_data::query::EventRepository::find_by_public_id(conn, event_public_id).await?;
    RuleRepository::find_enabled_for_event(conn, event.id).await
}

/// The lowercase wire name for an operator, matching its `serde(rename)`
/// rather than the Rust variant's `Display` (which prints the variant
/// name, e.g. `Gt`).
fn operator_wire_name(operator: RuleOperator) -> String {
    serde_json::to_value(operator)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn fire_action(dispatcher: &Dispatcher, rule: &Rule, event_public_id: Uuid, value: f64) {
    use webmacs_data::types::RuleActionType;

    match rule.action_type {
        RuleActionType::Log => {
            tracing::warn!(
                target: TRACING_TARGET,
                rule_id = rule.id,
                rule_name = %rule.name,
                event_public_id = %event_public_id,
                value,
                "rule triggered"
            );
        }
        RuleActionType::Webhook => {
            let event_type = rule
                .webhook_event_type
                .clone()
                .unwrap_or_else(|| DEFAULT_TRIGGER_EVENT_TYPE.to_string());
            let payload = WebhookPayload::rule_triggered(
                Some(event_type.clone()),
                rule.name.clone(),
                operator_wire_name(rule.operator),
                rule.threshold,
                event_public_id,
                value,
            );
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.dispatch(&event_type, payload).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gt_is_strict() {
        assert!(eval_predicate(10.0, RuleOperator::Gt, 5.0, None));
        assert!(!eval_predicate(5.0, RuleOperator::Gt, 5.0, None));
    }

    #[test]
    fn gte_includes_equal() {
        assert!(eval_predicate(5.0, RuleOperator::Gte, 5.0, None));
    }

    #[test]
    fn lte_includes_equal() {
        assert!(eval_predicate(5.0, RuleOperator::Lte, 5.0, None));
    }

    #[test]
    fn eq_uses_epsilon_tolerance() {
        assert!(eval_predicate(5.0 + 1e-10, RuleOperator::Eq, 5.0, None));
        assert!(!eval_predicate(5.1, RuleOperator::Eq, 5.0, None));
    }

    #[test]
    fn between_is_inclusive_both_ends() {
        assert!(eval_predicate(0.0, RuleOperator::Between, 0.0, Some(10.0)));
        assert!(eval_predicate(10.0, RuleOperator::Between, 0.0, Some(10.0)));
        assert!(!eval_predicate(10.1, RuleOperator::Between, 0.0, Some(10.0)));
    }

    #[test]
    fn not_between_is_exclusive_both_ends() {
        assert!(eval_predicate(-0.1, RuleOperator::NotBetween, 0.0, Some(10.0)));
        assert!(eval_predicate(10.1, RuleOperator::NotBetween, 0.0, Some(10.0)));
        assert!(!eval_predicate(5.0, RuleOperator::NotBetween, 0.0, Some(10.0)));
    }

    #[test]
    fn missing_threshold_high_is_false_not_an_error() {
        assert!(!eval_predicate(5.0, RuleOperator::Between, 0.0, None));
        assert!(!eval_predicate(5.0, RuleOperator::NotBetween, 0.0, None));
    }

    fn rule_with(last_triggered_at: Option<jiff_diesel::Timestamp>, cooldown_seconds: i32) -> Rule {
        Rule {
            id: 1,
            public_id: Uuid::nil(),
            name: "r1".to_string(),
            event_id: 1,
            operator: RuleOperator::Gt,
            threshold: 100.0,
            threshold_high: None,
            action_type: webmacs_data::types::RuleActionType::Log,
            webhook_event_type: None,
            enabled: true,
            cooldown_seconds,
            last_triggered_at,
        }
    }

    #[test]
    fn never_triggered_has_no_cooldown() {
        let rule = rule_with(None, 30);
        assert!(!in_cooldown(&rule, jiff::Timestamp::now()));
    }

    #[test]
    fn recent_trigger_is_in_cooldown() {
        let now = jiff::Timestamp::now();
        let rule = rule_with(Some(DieselTimestamp::from(now)), 30);
        assert!(in_cooldown(&rule, now));
    }

    #[test]
    fn cooldown_expires_after_window() {
        let now = jiff::Timestamp::now();
        let last = now - jiff::SignedDuration::from_secs(31);
        let rule = rule_with(Some(DieselTimestamp::from(last)), 30);
        assert!(!in_cooldown(&rule, now));
    }
}
