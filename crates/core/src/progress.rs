//! Progress and completion calculation.
//!
//! Progress is answer coverage, not requirement coverage: every question on
//! the form counts toward the denominator, whether or not conditional logic
//! currently makes it required.

use std::collections::HashMap;

use serde_json::Value;

use crate::question::Question;
use crate::types::DbId;

/// Does this raw value count as an answer?
///
/// A finite number, a string that is non-empty after trimming, or an array
/// with at least one element.
pub fn is_answered(raw: &Value) -> bool {
    match raw {
        Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        _ => false,
    }
}

/// Count the questions with a raw submitted answer.
pub fn count_answered(questions: &[Question], values: &HashMap<DbId, Value>) -> usize {
    questions
        .iter()
        .filter(|q| values.get(&q.id).is_some_and(is_answered))
        .count()
}

/// Completion percentage: `round(answered / total * 100)`, 0 when the form
/// has no questions.
pub fn compute_progress(answered: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    (answered as f64 / total as f64 * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionType;
    use serde_json::json;

    fn q(id: DbId) -> Question {
        Question {
            id,
            question_type: QuestionType::TextShort,
            text: format!("Q{id}"),
            required: false,
            display_order: id as i32,
            options: vec![],
            conditional_logic: None,
        }
    }

    #[test]
    fn answered_detection() {
        assert!(is_answered(&json!(0)));
        assert!(is_answered(&json!("x")));
        assert!(is_answered(&json!(["a"])));
        assert!(!is_answered(&json!("   ")));
        assert!(!is_answered(&json!([])));
        assert!(!is_answered(&Value::Null));
        assert!(!is_answered(&json!(true)));
    }

    #[test]
    fn counts_only_answered_questions() {
        let questions = vec![q(1), q(2), q(3), q(4)];
        let values = HashMap::from([
            (1, json!("yes")),
            (2, json!("")),
            (3, json!(7)),
            // 4 absent
        ]);
        assert_eq!(count_answered(&questions, &values), 2);
    }

    #[test]
    fn answers_for_unknown_questions_do_not_count() {
        let questions = vec![q(1)];
        let values = HashMap::from([(1, json!("yes")), (99, json!("stray"))]);
        assert_eq!(count_answered(&questions, &values), 1);
    }

    #[test]
    fn progress_bounds() {
        assert_eq!(compute_progress(0, 0), 0);
        assert_eq!(compute_progress(0, 4), 0);
        assert_eq!(compute_progress(4, 4), 100);
        assert_eq!(compute_progress(1, 3), 33);
        assert_eq!(compute_progress(2, 3), 67);

        for answered in 0..=10 {
            for total in 0..=10 {
                let p = compute_progress(answered.min(total), total);
                assert!((0..=100).contains(&p));
            }
        }
    }
}
