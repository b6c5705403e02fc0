//! Handlers for responses nested under a form (admin side).
//!
//! Minting a response creates the row and its unique access token; the
//! public respondent flow in [`super::respond`] consumes that token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Serialize;

use formpulse_core::error::CoreError;
use formpulse_core::types::DbId;
use formpulse_db::models::response::{CreateResponse, Response};
use formpulse_db::repositories::{FormRepo, RespondentRepo, ResponseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Length of the opaque access token embedded in respondent links.
const TOKEN_LENGTH: usize = 32;

/// Minted response plus the public path a respondent should be sent to.
#[derive(Debug, Serialize)]
pub struct MintedResponse {
    #[serde(flatten)]
    pub response: Response,
    pub link: String,
}

/// POST /api/v1/forms/{form_id}/responses
///
/// Mint a new response link for a form, optionally bound to a respondent.
pub async fn mint_response(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(form_id): Path<DbId>,
    Json(input): Json<CreateResponse>,
) -> AppResult<(StatusCode, Json<DataResponse<MintedResponse>>)> {
    FormRepo::find_by_id(&state.pool, form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id: form_id,
        }))?;

    if let Some(respondent_id) = input.respondent_id {
        RespondentRepo::find_by_id(&state.pool, respondent_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Respondent",
                id: respondent_id,
            }))?;
    }

    let token = generate_token();
    let response = ResponseRepo::create(&state.pool, form_id, input.respondent_id, &token).await?;

    tracing::info!(
        form_id,
        response_id = response.id,
        user_id = admin.user_id,
        "Response link minted"
    );

    let link = format!("/api/v1/respond/{token}");
    let minted = MintedResponse { response, link };

    Ok((StatusCode::CREATED, Json(DataResponse { data: minted })))
}

/// GET /api/v1/forms/{form_id}/responses
///
/// List a form's responses, newest first.
pub async fn list_responses(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Response>>>> {
    FormRepo::find_by_id(&state.pool, form_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Form",
            id: form_id,
        }))?;

    let (limit, offset) = params.clamp();
    let responses = ResponseRepo::list_by_form(&state.pool, form_id, limit, offset).await?;

    Ok(Json(DataResponse { data: responses }))
}

/// Generate an opaque alphanumeric access token.
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
