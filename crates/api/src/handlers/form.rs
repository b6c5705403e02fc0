//! Handlers for the `/forms` resource (CRUD and lifecycle transitions).
//!
//! Mutations require `admin` or above; reads are open to any
//! authenticated user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use formpulse_core::error::CoreError;
use formpulse_core::lifecycle::FormStatus;
use formpulse_core::types::DbId;
use formpulse_db::models::form::{CreateForm, Form, UpdateForm};
use formpulse_db::repositories::FormRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/forms
///
/// Create a new form. Forms always start in DRAFT.
pub async fn create_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Form>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let form = FormRepo::create(&state.pool, admin.user_id, &input).await?;

    tracing::info!(form_id = form.id, user_id = admin.user_id, "Form created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: form })))
}

/// GET /api/v1/forms
///
/// List all forms, newest first.
pub async fn list_forms(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Form>>>> {
    let forms = FormRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: forms }))
}

/// GET /api/v1/forms/{id}
pub async fn get_form(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Form", id }))?;

    Ok(Json(DataResponse { data: form }))
}

/// PUT /api/v1/forms/{id}
///
/// Update a form's metadata. Status changes go through the dedicated
/// transition endpoints instead.
pub async fn update_form(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateForm>,
) -> AppResult<Json<DataResponse<Form>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let form = FormRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Form", id }))?;

    Ok(Json(DataResponse { data: form }))
}

/// DELETE /api/v1/forms/{id}
///
/// Permanently delete a form and everything under it (questions,
/// responses, answers). Returns 204 No Content.
pub async fn delete_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = FormRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Form", id }));
    }

    tracing::info!(form_id = id, user_id = admin.user_id, "Form deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/forms/{id}/publish
pub async fn publish_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    transition(&state, &admin, id, FormStatus::Published).await
}

/// POST /api/v1/forms/{id}/pause
pub async fn pause_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    transition(&state, &admin, id, FormStatus::Paused).await
}

/// POST /api/v1/forms/{id}/close
pub async fn close_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    transition(&state, &admin, id, FormStatus::Closed).await
}

/// POST /api/v1/forms/{id}/archive
pub async fn archive_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Form>>> {
    transition(&state, &admin, id, FormStatus::Archived).await
}

/// Validate and apply a lifecycle transition.
async fn transition(
    state: &AppState,
    admin: &AuthUser,
    id: DbId,
    to: FormStatus,
) -> AppResult<Json<DataResponse<Form>>> {
    let form = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Form", id }))?;

    let current = form.status()?;
    if !current.can_transition_to(to) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot transition form from {} to {}",
            current.as_str(),
            to.as_str()
        ))));
    }

    let form = FormRepo::set_status(&state.pool, id, to)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Form", id }))?;

    tracing::info!(
        form_id = id,
        user_id = admin.user_id,
        status = to.as_str(),
        "Form status changed"
    );

    Ok(Json(DataResponse { data: form }))
}
