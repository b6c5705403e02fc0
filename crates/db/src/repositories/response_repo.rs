//! Repository for the `responses` table, including the per-submission
//! transaction that keeps answer writes and progress updates atomic.

use sqlx::PgPool;

use formpulse_core::answer::AnswerOp;
use formpulse_core::lifecycle::ResponseStatus;
use formpulse_core::types::DbId;

use crate::models::response::Response;
use crate::repositories::answer_repo;

const COLUMNS: &str =
    "id, form_id, respondent_id, token, status, progress, started_at, completed_at";

/// Provides CRUD operations and the submission transaction for responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Mint a new response link. Starts IN_PROGRESS with zero progress.
    pub async fn create(
        pool: &PgPool,
        form_id: DbId,
        respondent_id: Option<DbId>,
        token: &str,
    ) -> Result<Response, sqlx::Error> {
        let query = format!(
            "INSERT INTO responses (form_id, respondent_id, token, status, progress)
             VALUES ($1, $2, $3, 'IN_PROGRESS', 0)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(form_id)
            .bind(respondent_id)
            .bind(token)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Response>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM responses WHERE id = $1");
        sqlx::query_as::<_, Response>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a response by its opaque token.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Response>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM responses WHERE token = $1");
        sqlx::query_as::<_, Response>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List a form's responses, newest first.
    pub async fn list_by_form(
        pool: &PgPool,
        form_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Response>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM responses WHERE form_id = $1
             ORDER BY started_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(form_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply one submission atomically: every answer mutation plus the
    /// response's status/progress update commit together or not at all, so
    /// `progress` never reflects a partially-written answer set.
    pub async fn save_submission(
        pool: &PgPool,
        response_id: DbId,
        ops: &[AnswerOp],
        progress: i32,
        completed: bool,
    ) -> Result<Response, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for op in ops {
            match op {
                AnswerOp::Clear(question_id) => {
                    answer_repo::delete_in_tx(&mut tx, response_id, *question_id).await?;
                }
                AnswerOp::Store(question_id, value) => {
                    answer_repo::upsert_in_tx(&mut tx, response_id, *question_id, value).await?;
                }
            }
        }

        let status = if completed {
            ResponseStatus::Completed
        } else {
            ResponseStatus::InProgress
        };
        let query = format!(
            "UPDATE responses SET
                status = $2,
                progress = $3,
                completed_at = CASE WHEN $4 THEN NOW() ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let response = sqlx::query_as::<_, Response>(&query)
            .bind(response_id)
            .bind(status.as_str())
            .bind(progress)
            .bind(completed)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(response)
    }
}
