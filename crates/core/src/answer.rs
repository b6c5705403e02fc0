//! Answer normalization and submission planning.
//!
//! Raw client answers are heterogeneous JSON (numbers, numeric strings,
//! strings, arrays). They normalize into [`AnswerValue`], a tagged union
//! mirroring the three nullable value columns on the `answers` table so
//! "exactly one populated" is enforced by construction.

use std::collections::HashMap;

use serde_json::Value;

use crate::conditional::coerce_number;
use crate::question::{Question, QuestionType};
use crate::types::DbId;

/// Normalized answer payload. Exactly one representation per answer row.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    /// Scale answers (NPS, 1-5 rating), rounded to the nearest integer.
    Numeric(i64),
    /// Free text, or a JSON-encoded array for multiple-choice selections.
    Text(String),
    /// A single selected option (single-choice, comparison).
    Selection(String),
}

impl AnswerValue {
    /// The three storage columns as a tuple of options: exactly one is `Some`.
    pub fn columns(&self) -> (Option<i64>, Option<&str>, Option<&str>) {
        match self {
            AnswerValue::Numeric(n) => (Some(*n), None, None),
            AnswerValue::Text(s) => (None, Some(s), None),
            AnswerValue::Selection(s) => (None, None, Some(s)),
        }
    }
}

/// One planned mutation of the answer set for a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOp {
    /// Delete any existing answer row for this question (no-op if absent).
    Clear(DbId),
    /// Upsert the answer row for this question with the given value.
    Store(DbId, AnswerValue),
}

/// Normalize a raw JSON answer for a question type.
///
/// Returns `None` when the raw value does not fit the declared type;
/// malformed fields are silently dropped rather than failing the whole
/// submission.
pub fn format_answer_value(question_type: QuestionType, raw: &Value) -> Option<AnswerValue> {
    match question_type {
        QuestionType::Nps | QuestionType::Rating1To5 => {
            let n = coerce_number(raw)?;
            Some(AnswerValue::Numeric(n.round() as i64))
        }
        QuestionType::TextShort | QuestionType::TextLong => {
            raw.as_str().map(|s| AnswerValue::Text(s.to_string()))
        }
        QuestionType::MultipleChoice => raw
            .as_array()
            .map(|arr| AnswerValue::Text(Value::Array(arr.clone()).to_string())),
        QuestionType::SingleChoice | QuestionType::Comparison => {
            raw.as_str().map(|s| AnswerValue::Selection(s.to_string()))
        }
    }
}

/// Is this raw value "cleared" -- an explicit request to remove the answer?
///
/// Null, empty or whitespace-only strings, and empty arrays all clear.
pub fn is_cleared(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(arr) => arr.is_empty(),
        _ => false,
    }
}

/// Plan the answer mutations for one submission.
///
/// For every question on the form: an absent or cleared value becomes a
/// [`AnswerOp::Clear`]; a value that fails normalization is skipped
/// entirely (neither written nor deleted); everything else becomes an
/// [`AnswerOp::Store`].
pub fn plan_submission(questions: &[Question], values: &HashMap<DbId, Value>) -> Vec<AnswerOp> {
    let mut ops = Vec::with_capacity(questions.len());
    for question in questions {
        match values.get(&question.id) {
            None => ops.push(AnswerOp::Clear(question.id)),
            Some(raw) if is_cleared(raw) => ops.push(AnswerOp::Clear(question.id)),
            Some(raw) => {
                if let Some(value) = format_answer_value(question.question_type, raw) {
                    ops.push(AnswerOp::Store(question.id, value));
                }
            }
        }
    }
    ops
}
