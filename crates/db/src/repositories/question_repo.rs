//! Repository for the `questions` table.

use sqlx::PgPool;

use formpulse_core::types::DbId;

use crate::models::question::{CreateQuestion, Question, UpdateQuestion};

const COLUMNS: &str = "id, form_id, question_type, text, required, display_order, \
     options, conditional_logic, created_at, updated_at";

/// Provides CRUD operations for questions.
///
/// `display_order` uniqueness within a form is enforced by the
/// `uq_questions_form_order` constraint; violations surface as 409s through
/// the API error classifier.
pub struct QuestionRepo;

impl QuestionRepo {
    pub async fn create(
        pool: &PgPool,
        form_id: DbId,
        input: &CreateQuestion,
    ) -> Result<Question, sqlx::Error> {
        let options = input
            .options
            .as_ref()
            .map(|o| serde_json::to_value(o).expect("Vec<String> serializes"));
        let conditional_logic = input
            .conditional_logic
            .as_ref()
            .map(|c| serde_json::to_value(c).expect("ConditionalLogic serializes"));

        let query = format!(
            "INSERT INTO questions
                (form_id, question_type, text, required, display_order, options, conditional_logic)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(form_id)
            .bind(input.question_type.as_str())
            .bind(&input.text)
            .bind(input.required)
            .bind(input.display_order)
            .bind(options)
            .bind(conditional_logic)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a form's questions in display order.
    pub async fn list_by_form(pool: &PgPool, form_id: DbId) -> Result<Vec<Question>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM questions WHERE form_id = $1 ORDER BY display_order");
        sqlx::query_as::<_, Question>(&query)
            .bind(form_id)
            .fetch_all(pool)
            .await
    }

    /// Update a question. Only non-`None` fields in `input` apply; pass
    /// `conditional_logic` explicitly as JSON NULL to clear it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuestion,
    ) -> Result<Option<Question>, sqlx::Error> {
        let options = input
            .options
            .as_ref()
            .map(|o| serde_json::to_value(o).expect("Vec<String> serializes"));
        let conditional_logic = input
            .conditional_logic
            .as_ref()
            .map(|c| serde_json::to_value(c).expect("ConditionalLogic serializes"));

        let query = format!(
            "UPDATE questions SET
                text = COALESCE($2, text),
                required = COALESCE($3, required),
                display_order = COALESCE($4, display_order),
                options = COALESCE($5, options),
                conditional_logic = COALESCE($6, conditional_logic),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.required)
            .bind(input.display_order)
            .bind(options)
            .bind(conditional_logic)
            .fetch_optional(pool)
            .await
    }

    /// Delete a question and its answers (cascade). Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
