//! Handlers for questions nested under a form.
//!
//! Creation and update validate the question shape: choice types must
//! declare options, and conditional rules may only depend on an earlier
//! question of the same form.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use formpulse_core::error::CoreError;
use formpulse_core::question::{validate_conditional, ConditionalLogic, QuestionType};
use formpulse_core::types::DbId;
use formpulse_db::models::question::{CreateQuestion, Question, UpdateQuestion};
use formpulse_db::repositories::{FormRepo, QuestionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/forms/{form_id}/questions
pub async fn create_question(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(form_id): Path<DbId>,
    Json(input): Json<CreateQuestion>,
) -> AppResult<(StatusCode, Json<DataResponse<Question>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    // The parent form must exist.
    FormRepo::find_by_id(&state.pool, form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id: form_id,
        }))?;

    validate_shape(
        input.question_type,
        input.options.as_deref(),
        input.conditional_logic.as_ref(),
    )?;

    if let Some(logic) = &input.conditional_logic {
        validate_dependency(&state, form_id, logic, input.display_order).await?;
    }

    let question = QuestionRepo::create(&state.pool, form_id, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// GET /api/v1/forms/{form_id}/questions
///
/// List a form's questions in display order.
pub async fn list_questions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Question>>>> {
    FormRepo::find_by_id(&state.pool, form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id: form_id,
        }))?;

    let questions = QuestionRepo::list_by_form(&state.pool, form_id).await?;
    Ok(Json(DataResponse { data: questions }))
}

/// PUT /api/v1/forms/{form_id}/questions/{id}
pub async fn update_question(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((form_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateQuestion>,
) -> AppResult<Json<DataResponse<Question>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let existing = find_in_form(&state, form_id, id).await?;

    let question_type = QuestionType::parse(&existing.question_type)
        .ok_or_else(|| CoreError::Internal(format!("question {id} has unknown type")))?;

    // Validate against the post-update shape.
    let effective_options: Option<Vec<String>> = match &input.options {
        Some(options) => Some(options.clone()),
        None => existing
            .options
            .as_ref()
            .map(|v| serde_json::from_value(v.clone()).unwrap_or_default()),
    };
    validate_shape(
        question_type,
        effective_options.as_deref(),
        input.conditional_logic.as_ref(),
    )?;

    let effective_order = input.display_order.unwrap_or(existing.display_order);
    if let Some(logic) = &input.conditional_logic {
        validate_dependency(&state, form_id, logic, effective_order).await?;
    }

    let question = QuestionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id,
        }))?;

    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/v1/forms/{form_id}/questions/{id}
///
/// Delete a question and its answers. Returns 204 No Content.
pub async fn delete_question(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((form_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_in_form(&state, form_id, id).await?;

    let deleted = QuestionRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Fetch a question and confirm it belongs to the form in the path.
async fn find_in_form(
    state: &AppState,
    form_id: DbId,
    id: DbId,
) -> AppResult<formpulse_db::models::question::Question> {
    let question = QuestionRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|q| q.form_id == form_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id,
        }))?;
    Ok(question)
}

/// Choice types must carry at least two options; other types must not
/// carry any.
fn validate_shape(
    question_type: QuestionType,
    options: Option<&[String]>,
    conditional_logic: Option<&ConditionalLogic>,
) -> AppResult<()> {
    let option_count = options.map_or(0, <[String]>::len);

    if question_type.has_options() {
        if option_count < 2 {
            return Err(AppError::Core(CoreError::Validation(format!(
                "{} questions require at least two options",
                question_type.as_str()
            ))));
        }
    } else if option_count > 0 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} questions must not declare options",
            question_type.as_str()
        ))));
    }

    if let Some(logic) = conditional_logic {
        if logic.value.is_null() {
            return Err(AppError::Core(CoreError::Validation(
                "Conditional rules require a comparison value".into(),
            )));
        }
    }

    Ok(())
}

/// The dependency must be a question of the same form with a strictly
/// smaller display order.
async fn validate_dependency(
    state: &AppState,
    form_id: DbId,
    logic: &ConditionalLogic,
    own_order: i32,
) -> AppResult<()> {
    let dependency = QuestionRepo::find_by_id(&state.pool, logic.depends_on)
        .await?
        .filter(|q| q.form_id == form_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Conditional dependency {} is not a question of this form",
                logic.depends_on
            )))
        })?;

    validate_conditional(own_order, dependency.display_order)?;
    Ok(())
}
