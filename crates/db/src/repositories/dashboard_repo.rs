//! Read queries for the aggregation dashboard.

use sqlx::{FromRow, PgPool};

use formpulse_core::types::DbId;

/// One stored answer joined with its question and form, restricted to
/// COMPLETED responses. The API layer groups these rows and feeds them to
/// the core aggregation builder.
#[derive(Debug, Clone, FromRow)]
pub struct CompletedAnswerRow {
    pub form_id: DbId,
    pub form_title: String,
    pub question_id: DbId,
    pub question_type: String,
    pub question_text: String,
    pub required: bool,
    pub display_order: i32,
    pub options: Option<serde_json::Value>,
    pub conditional_logic: Option<serde_json::Value>,
    pub numeric_value: Option<i64>,
    pub text_value: Option<String>,
    pub selected_option: Option<String>,
}

/// Provides the dashboard scan query.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Fetch every answer from COMPLETED responses, optionally filtered to
    /// one form. Ordered by answer creation time so per-question answer
    /// lists arrive in submission order.
    pub async fn completed_answers(
        pool: &PgPool,
        form_id: Option<DbId>,
    ) -> Result<Vec<CompletedAnswerRow>, sqlx::Error> {
        let query = "SELECT
                f.id AS form_id,
                f.title AS form_title,
                q.id AS question_id,
                q.question_type,
                q.text AS question_text,
                q.required,
                q.display_order,
                q.options,
                q.conditional_logic,
                a.numeric_value,
                a.text_value,
                a.selected_option
             FROM answers a
             JOIN responses r ON r.id = a.response_id AND r.status = 'COMPLETED'
             JOIN questions q ON q.id = a.question_id
             JOIN forms f ON f.id = q.form_id
             WHERE ($1::BIGINT IS NULL OR f.id = $1)
             ORDER BY f.id, q.display_order, a.created_at";
        sqlx::query_as::<_, CompletedAnswerRow>(query)
            .bind(form_id)
            .fetch_all(pool)
            .await
    }
}
