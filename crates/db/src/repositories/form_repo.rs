//! Repository for the `forms` table.

use sqlx::PgPool;

use formpulse_core::lifecycle::FormStatus;
use formpulse_core::types::DbId;

use crate::models::form::{CreateForm, Form, UpdateForm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, status, expires_at, max_responses, created_by, created_at, updated_at";

/// Provides CRUD and lifecycle operations for forms.
pub struct FormRepo;

impl FormRepo {
    /// Insert a new form in DRAFT status, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        input: &CreateForm,
    ) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (title, description, status, expires_at, max_responses, created_by)
             VALUES ($1, $2, 'DRAFT', $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.expires_at)
            .bind(input.max_responses)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all forms ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms ORDER BY created_at DESC");
        sqlx::query_as::<_, Form>(&query).fetch_all(pool).await
    }

    /// Update a form's metadata. Only non-`None` fields in `input` apply.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateForm,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                expires_at = COALESCE($4, expires_at),
                max_responses = COALESCE($5, max_responses),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.expires_at)
            .bind(input.max_responses)
            .fetch_optional(pool)
            .await
    }

    /// Set a form's lifecycle status. Transition validity is checked by the
    /// caller against [`FormStatus::can_transition_to`].
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: FormStatus,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a form (cascades to questions, responses, answers).
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count COMPLETED responses for the capacity guard.
    pub async fn count_completed_responses(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM responses WHERE form_id = $1 AND status = 'COMPLETED'",
        )
        .bind(form_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
