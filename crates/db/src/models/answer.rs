//! Answer entity model.
//!
//! Exactly one of `numeric_value` / `text_value` / `selected_option` is
//! populated, matching the owning question's type. The core
//! [`AnswerValue`] tagged union is the canonical in-memory shape; this row
//! struct only exists at the storage boundary.

use serde::Serialize;
use sqlx::FromRow;

use formpulse_core::answer::AnswerValue;
use formpulse_core::question::QuestionType;
use formpulse_core::types::{DbId, Timestamp};

/// An answer row from the `answers` table. Unique on
/// `(response_id, question_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Answer {
    pub id: DbId,
    pub response_id: DbId,
    pub question_id: DbId,
    pub numeric_value: Option<i64>,
    pub text_value: Option<String>,
    pub selected_option: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Answer {
    /// Reconstitute the tagged value from the three nullable columns.
    ///
    /// Returns `None` for a corrupt row where no column is populated.
    pub fn value(&self) -> Option<AnswerValue> {
        if let Some(n) = self.numeric_value {
            return Some(AnswerValue::Numeric(n));
        }
        if let Some(s) = &self.text_value {
            return Some(AnswerValue::Text(s.clone()));
        }
        self.selected_option
            .as_ref()
            .map(|s| AnswerValue::Selection(s.clone()))
    }

    /// The client-facing JSON value for echoing saved progress.
    ///
    /// Multiple-choice answers stored as a JSON-encoded string parse back
    /// into the array the client originally submitted.
    pub fn raw_value(&self, question_type: QuestionType) -> serde_json::Value {
        match self.value() {
            Some(AnswerValue::Numeric(n)) => serde_json::Value::from(n),
            Some(AnswerValue::Text(s)) => {
                if question_type == QuestionType::MultipleChoice {
                    serde_json::from_str(&s).unwrap_or(serde_json::Value::Null)
                } else {
                    serde_json::Value::String(s)
                }
            }
            Some(AnswerValue::Selection(s)) => serde_json::Value::String(s),
            None => serde_json::Value::Null,
        }
    }
}
