//! Conditional-requiredness evaluator.
//!
//! Decides whether a question is effectively required given the answers
//! collected so far. Pure function of the current answer state; callers
//! re-evaluate on every answer change rather than caching.

use std::collections::HashMap;

use serde_json::Value;

use crate::question::{ConditionOp, Question};
use crate::types::DbId;

/// Coerce a JSON value to a finite number.
///
/// Numeric strings are tolerated (`"8"` -> 8.0) because clients send mixed
/// numeric/string representations for scale answers.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Loose equality between an actual answer and an expected rule value.
///
/// If both sides coerce to numbers, compare numerically (so numeric `8`
/// matches string `"8"`). Otherwise fall back to string, then exact JSON
/// comparison.
fn loose_eq(actual: &Value, expected: &Value) -> bool {
    if let (Some(a), Some(b)) = (coerce_number(actual), coerce_number(expected)) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (actual.as_str(), expected.as_str()) {
        return a == b;
    }
    actual == expected
}

/// Is this question effectively required, given the answers so far?
///
/// - A statically `required` question is always required.
/// - Without conditional logic, an optional question is never required.
/// - With conditional logic, the rule is evaluated against the dependency's
///   answer. An unanswered dependency means "not required": requiredness
///   cannot be determined before its prerequisite exists.
/// - Unknown operators evaluate to `false` (fail closed) so a misconfigured
///   rule never demands an unanswerable question.
pub fn is_required(question: &Question, answers_so_far: &HashMap<DbId, Value>) -> bool {
    if question.required {
        return true;
    }

    let Some(logic) = &question.conditional_logic else {
        return false;
    };

    let Some(actual) = answers_so_far.get(&logic.depends_on) else {
        return false;
    };
    if actual.is_null() {
        return false;
    }

    match logic.condition {
        ConditionOp::Eq => loose_eq(actual, &logic.value),
        ConditionOp::Lt | ConditionOp::Le | ConditionOp::Ge | ConditionOp::Gt => {
            let (Some(a), Some(b)) = (coerce_number(actual), coerce_number(&logic.value)) else {
                return false;
            };
            match logic.condition {
                ConditionOp::Lt => a < b,
                ConditionOp::Le => a <= b,
                ConditionOp::Ge => a >= b,
                ConditionOp::Gt => a > b,
                _ => unreachable!(),
            }
        }
        ConditionOp::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{ConditionalLogic, QuestionType};
    use serde_json::json;

    fn question(required: bool, logic: Option<ConditionalLogic>) -> Question {
        Question {
            id: 2,
            question_type: QuestionType::TextLong,
            text: "Tell us more".to_string(),
            required,
            display_order: 2,
            options: vec![],
            conditional_logic: logic,
        }
    }

    fn rule(op: ConditionOp, value: Value) -> ConditionalLogic {
        ConditionalLogic {
            depends_on: 1,
            condition: op,
            value,
        }
    }

    fn answers(value: Value) -> HashMap<DbId, Value> {
        HashMap::from([(1, value)])
    }

    #[test]
    fn static_required_short_circuits() {
        let q = question(true, Some(rule(ConditionOp::Unknown, json!(0))));
        assert!(is_required(&q, &HashMap::new()));
    }

    #[test]
    fn no_logic_means_never_required() {
        let q = question(false, None);
        assert!(!is_required(&q, &answers(json!(10))));
    }

    #[test]
    fn unanswered_dependency_means_not_required() {
        // Monotonic on dependency presence: false for any configured rule.
        for op in [
            ConditionOp::Lt,
            ConditionOp::Le,
            ConditionOp::Eq,
            ConditionOp::Ge,
            ConditionOp::Gt,
        ] {
            let q = question(false, Some(rule(op, json!(5))));
            assert!(!is_required(&q, &HashMap::new()));
            assert!(!is_required(&q, &answers(Value::Null)));
        }
    }

    #[test]
    fn low_nps_triggers_followup() {
        // Scenario A: question B depends on A via `< 7`.
        let q = question(false, Some(rule(ConditionOp::Lt, json!(7))));
        assert!(is_required(&q, &answers(json!(5))));
        assert!(!is_required(&q, &answers(json!(8))));
    }

    #[test]
    fn numeric_string_answers_are_coerced() {
        let q = question(false, Some(rule(ConditionOp::Lt, json!(7))));
        assert!(is_required(&q, &answers(json!("5"))));
        assert!(!is_required(&q, &answers(json!("8"))));
    }

    #[test]
    fn loose_equality_matches_number_and_string() {
        let q = question(false, Some(rule(ConditionOp::Eq, json!("8"))));
        assert!(is_required(&q, &answers(json!(8))));
        assert!(is_required(&q, &answers(json!("8"))));
        assert!(!is_required(&q, &answers(json!(7))));
    }

    #[test]
    fn loose_equality_on_plain_strings() {
        let q = question(false, Some(rule(ConditionOp::Eq, json!("Option A"))));
        assert!(is_required(&q, &answers(json!("Option A"))));
        assert!(!is_required(&q, &answers(json!("Option B"))));
    }

    #[test]
    fn boundary_operators() {
        let le = question(false, Some(rule(ConditionOp::Le, json!(6))));
        assert!(is_required(&le, &answers(json!(6))));
        assert!(!is_required(&le, &answers(json!(7))));

        let ge = question(false, Some(rule(ConditionOp::Ge, json!(9))));
        assert!(is_required(&ge, &answers(json!(9))));
        assert!(!is_required(&ge, &answers(json!(8))));

        let gt = question(false, Some(rule(ConditionOp::Gt, json!(8))));
        assert!(is_required(&gt, &answers(json!(9))));
        assert!(!is_required(&gt, &answers(json!(8))));
    }

    #[test]
    fn unknown_operator_fails_closed() {
        let q = question(false, Some(rule(ConditionOp::Unknown, json!(5))));
        assert!(!is_required(&q, &answers(json!(5))));
        assert!(!is_required(&q, &answers(json!("anything"))));
    }

    #[test]
    fn non_numeric_answer_on_ordering_rule_is_not_required() {
        let q = question(false, Some(rule(ConditionOp::Lt, json!(7))));
        assert!(!is_required(&q, &answers(json!("not a number"))));
        assert!(!is_required(&q, &answers(json!([1, 2]))));
    }
}
