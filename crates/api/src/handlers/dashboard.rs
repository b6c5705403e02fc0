//! Dashboard handler: turns the flat answer scan into per-form summaries.

use axum::extract::{Query, State};
use axum::Json;

use formpulse_core::aggregation::{build_dashboard, FormAggregate, FormSummary};
use formpulse_core::answer::AnswerValue;
use formpulse_core::error::CoreError;
use formpulse_core::question::{ConditionalLogic, Question, QuestionType};
use formpulse_db::repositories::dashboard_repo::CompletedAnswerRow;
use formpulse_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::DashboardParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// Aggregate completed responses into per-form, per-question summaries.
/// `?form_id=` narrows the scan to one form.
pub async fn dashboard(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DataResponse<Vec<FormSummary>>>> {
    let rows = DashboardRepo::completed_answers(&state.pool, params.form_id).await?;

    let aggregates = group_rows(rows)?;
    let summaries = build_dashboard(aggregates);

    Ok(Json(DataResponse { data: summaries }))
}

/// Group the ordered flat scan into one aggregate per form. Rows arrive
/// sorted by form, then question display order, so a simple run-length
/// grouping suffices.
fn group_rows(rows: Vec<CompletedAnswerRow>) -> Result<Vec<FormAggregate>, CoreError> {
    let mut aggregates: Vec<FormAggregate> = Vec::new();

    for row in rows {
        let value = row_value(&row);

        let form = match aggregates.last_mut() {
            Some(last) if last.form_id == row.form_id => last,
            _ => {
                aggregates.push(FormAggregate {
                    form_id: row.form_id,
                    title: row.form_title.clone(),
                    questions: Vec::new(),
                });
                aggregates.last_mut().expect("just pushed")
            }
        };

        match form
            .questions
            .iter_mut()
            .find(|(q, _)| q.id == row.question_id)
        {
            Some((_, answers)) => {
                if let Some(value) = value {
                    answers.push(value);
                }
            }
            None => {
                let question = row_question(&row)?;
                let answers = value.into_iter().collect();
                form.questions.push((question, answers));
            }
        }
    }

    Ok(aggregates)
}

/// Rebuild the core question shape from the scan row's question columns.
fn row_question(row: &CompletedAnswerRow) -> Result<Question, CoreError> {
    let question_type = QuestionType::parse(&row.question_type).ok_or_else(|| {
        CoreError::Internal(format!(
            "question {} has unknown type '{}'",
            row.question_id, row.question_type
        ))
    })?;

    let options: Vec<String> = match &row.options {
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            CoreError::Internal(format!(
                "question {} has malformed options: {e}",
                row.question_id
            ))
        })?,
        None => vec![],
    };

    let conditional_logic: Option<ConditionalLogic> = match &row.conditional_logic {
        Some(value) => serde_json::from_value(value.clone()).ok(),
        None => None,
    };

    Ok(Question {
        id: row.question_id,
        question_type,
        text: row.question_text.clone(),
        required: row.required,
        display_order: row.display_order,
        options,
        conditional_logic,
    })
}

/// Reconstitute the tagged answer value from the row's three nullable
/// columns. A row with no populated column is skipped.
fn row_value(row: &CompletedAnswerRow) -> Option<AnswerValue> {
    if let Some(n) = row.numeric_value {
        return Some(AnswerValue::Numeric(n));
    }
    if let Some(s) = &row.text_value {
        return Some(AnswerValue::Text(s.clone()));
    }
    row.selected_option
        .as_ref()
        .map(|s| AnswerValue::Selection(s.clone()))
}
