//! Handlers for the `/respondents` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use formpulse_core::error::CoreError;
use formpulse_core::types::DbId;
use formpulse_db::models::respondent::{CreateRespondent, Respondent, UpdateRespondent};
use formpulse_db::repositories::RespondentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/respondents
pub async fn create_respondent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateRespondent>,
) -> AppResult<(StatusCode, Json<DataResponse<Respondent>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let respondent = RespondentRepo::create(&state.pool, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: respondent })))
}

/// GET /api/v1/respondents
///
/// List respondents with pagination.
pub async fn list_respondents(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Respondent>>>> {
    let (limit, offset) = params.clamp();
    let respondents = RespondentRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: respondents }))
}

/// GET /api/v1/respondents/{id}
pub async fn get_respondent(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Respondent>>> {
    let respondent = RespondentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Respondent",
            id,
        }))?;

    Ok(Json(DataResponse { data: respondent }))
}

/// PUT /api/v1/respondents/{id}
pub async fn update_respondent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRespondent>,
) -> AppResult<Json<DataResponse<Respondent>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let respondent = RespondentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Respondent",
            id,
        }))?;

    Ok(Json(DataResponse { data: respondent }))
}

/// DELETE /api/v1/respondents/{id}
///
/// Delete a respondent. Their responses survive anonymously. Returns
/// 204 No Content.
pub async fn delete_respondent(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = RespondentRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Respondent",
            id,
        }));
    }

    tracing::info!(respondent_id = id, user_id = admin.user_id, "Respondent deleted");

    Ok(StatusCode::NO_CONTENT)
}
