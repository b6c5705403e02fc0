//! Repository for the `respondents` table.

use chrono::Utc;
use sqlx::PgPool;

use formpulse_core::types::DbId;

use crate::models::respondent::{CreateRespondent, Respondent, UpdateRespondent};

const COLUMNS: &str = "id, name, email, respondent_type, consented, consented_at, \
     created_at, updated_at";

/// Provides CRUD operations for respondents.
pub struct RespondentRepo;

impl RespondentRepo {
    pub async fn create(pool: &PgPool, input: &CreateRespondent) -> Result<Respondent, sqlx::Error> {
        let consented_at = input.consented.then(Utc::now);
        let query = format!(
            "INSERT INTO respondents (name, email, respondent_type, consented, consented_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Respondent>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.respondent_type)
            .bind(input.consented)
            .bind(consented_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Respondent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM respondents WHERE id = $1");
        sqlx::query_as::<_, Respondent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List respondents ordered by name, newest ties first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Respondent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM respondents ORDER BY name, created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Respondent>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a respondent. Consent gaining stamps `consented_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRespondent,
    ) -> Result<Option<Respondent>, sqlx::Error> {
        let query = format!(
            "UPDATE respondents SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                respondent_type = COALESCE($4, respondent_type),
                consented = COALESCE($5, consented),
                consented_at = CASE
                    WHEN $5 = TRUE AND consented = FALSE THEN NOW()
                    WHEN $5 = FALSE THEN NULL
                    ELSE consented_at
                END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Respondent>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.respondent_type)
            .bind(input.consented)
            .fetch_optional(pool)
            .await
    }

    /// Delete a respondent. Their responses survive anonymously: the
    /// `responses.respondent_id` FK is ON DELETE SET NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM respondents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
