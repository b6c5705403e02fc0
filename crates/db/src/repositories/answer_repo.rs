//! Repository for the `answers` table.
//!
//! Upserts key on the `(response_id, question_id)` unique pair; at most one
//! answer row exists per question per response. The `_in_tx` functions are
//! building blocks for [`super::ResponseRepo::save_submission`].

use sqlx::{PgPool, Postgres, Transaction};

use formpulse_core::answer::AnswerValue;
use formpulse_core::types::DbId;

use crate::models::answer::Answer;

const COLUMNS: &str = "id, response_id, question_id, numeric_value, text_value, \
     selected_option, created_at, updated_at";

/// Provides read access and submission-transaction mutations for answers.
pub struct AnswerRepo;

impl AnswerRepo {
    /// List all answers for a response.
    pub async fn list_by_response(
        pool: &PgPool,
        response_id: DbId,
    ) -> Result<Vec<Answer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM answers WHERE response_id = $1");
        sqlx::query_as::<_, Answer>(&query)
            .bind(response_id)
            .fetch_all(pool)
            .await
    }
}

/// Upsert the answer row for `(response_id, question_id)`, replacing
/// whichever value column applies and nulling the others.
pub async fn upsert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    response_id: DbId,
    question_id: DbId,
    value: &AnswerValue,
) -> Result<(), sqlx::Error> {
    let (numeric_value, text_value, selected_option) = value.columns();
    sqlx::query(
        "INSERT INTO answers (response_id, question_id, numeric_value, text_value, selected_option)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT ON CONSTRAINT uq_answers_response_question DO UPDATE SET
            numeric_value = EXCLUDED.numeric_value,
            text_value = EXCLUDED.text_value,
            selected_option = EXCLUDED.selected_option,
            updated_at = NOW()",
    )
    .bind(response_id)
    .bind(question_id)
    .bind(numeric_value)
    .bind(text_value)
    .bind(selected_option)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Delete the answer row for `(response_id, question_id)`. Deleting a row
/// that does not exist is a no-op.
pub async fn delete_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    response_id: DbId,
    question_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM answers WHERE response_id = $1 AND question_id = $2")
        .bind(response_id)
        .bind(question_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
