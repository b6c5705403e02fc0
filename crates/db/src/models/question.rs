//! Question entity model and DTOs.
//!
//! `options` and `conditional_logic` are JSONB columns; [`Question::to_domain`]
//! parses a row into the core [`formpulse_core::question::Question`] shape
//! that the evaluators consume.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use formpulse_core::error::CoreError;
use formpulse_core::question::{ConditionalLogic, QuestionType};
use formpulse_core::types::{DbId, Timestamp};

/// A question row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub form_id: DbId,
    pub question_type: String,
    pub text: String,
    pub required: bool,
    pub display_order: i32,
    pub options: Option<serde_json::Value>,
    pub conditional_logic: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Question {
    /// Convert the raw row into the core domain shape.
    pub fn to_domain(&self) -> Result<formpulse_core::question::Question, CoreError> {
        let question_type = QuestionType::parse(&self.question_type).ok_or_else(|| {
            CoreError::Internal(format!(
                "question {} has unknown type '{}'",
                self.id, self.question_type
            ))
        })?;

        let options: Vec<String> = match &self.options {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                CoreError::Internal(format!("question {} has malformed options: {e}", self.id))
            })?,
            None => vec![],
        };

        let conditional_logic: Option<ConditionalLogic> = match &self.conditional_logic {
            Some(value) => Some(serde_json::from_value(value.clone()).map_err(|e| {
                CoreError::Internal(format!(
                    "question {} has malformed conditional logic: {e}",
                    self.id
                ))
            })?),
            None => None,
        };

        Ok(formpulse_core::question::Question {
            id: self.id,
            question_type,
            text: self.text.clone(),
            required: self.required,
            display_order: self.display_order,
            options,
            conditional_logic,
        })
    }
}

/// DTO for creating a new question on a form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestion {
    pub question_type: QuestionType,
    #[validate(length(min = 1, max = 1000))]
    pub text: String,
    #[serde(default)]
    pub required: bool,
    pub display_order: i32,
    pub options: Option<Vec<String>>,
    pub conditional_logic: Option<ConditionalLogic>,
}

/// DTO for updating an existing question. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestion {
    #[validate(length(min = 1, max = 1000))]
    pub text: Option<String>,
    pub required: Option<bool>,
    pub display_order: Option<i32>,
    pub options: Option<Vec<String>>,
    pub conditional_logic: Option<ConditionalLogic>,
}
