//! Public respondent flow, keyed by opaque response tokens.
//!
//! Both endpoints are unauthenticated and rate limited per client
//! identity. Unknown tokens answer after a randomized delay so that
//! response timing does not distinguish a missing token from a guarded
//! one.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use formpulse_core::answer::plan_submission;
use formpulse_core::conditional::is_required;
use formpulse_core::lifecycle::{check_resolution, check_submission, TokenContext, TokenError};
use formpulse_core::progress::{compute_progress, count_answered};
use formpulse_core::question::QuestionType;
use formpulse_core::types::DbId;
use formpulse_db::models::form::Form;
use formpulse_db::models::response::Response;
use formpulse_db::repositories::{AnswerRepo, FormRepo, QuestionRepo, ResponseRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Bounds of the randomized delay served on unknown tokens, in
/// milliseconds.
const ENUMERATION_DELAY_MS: (u64, u64) = (500, 1500);

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Form metadata shown to a respondent.
#[derive(Debug, Serialize)]
pub struct PublicForm {
    pub title: String,
    pub description: Option<String>,
}

/// One question as presented to a respondent. `currently_required`
/// reflects conditional rules evaluated against the saved answers.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: DbId,
    pub question_type: &'static str,
    pub text: String,
    pub display_order: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub currently_required: bool,
}

/// Payload for `GET /respond/{token}`.
#[derive(Debug, Serialize)]
pub struct ResolvePayload {
    pub form: PublicForm,
    pub questions: Vec<PublicQuestion>,
    /// Saved answers keyed by question id, in the shape the client
    /// originally submitted.
    pub answers: HashMap<DbId, Value>,
    pub progress: i32,
}

/// Request body for `POST /respond/{token}`.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Raw answer values keyed by question id. The map is the full
    /// answer set: questions left out of it are cleared, as are null,
    /// blank, or empty values.
    #[serde(default)]
    pub answers: HashMap<DbId, Value>,
    /// Marks the response COMPLETED when true.
    #[serde(default)]
    pub completed: bool,
}

/// Payload for `POST /respond/{token}`.
#[derive(Debug, Serialize)]
pub struct SubmitPayload {
    pub status: String,
    pub progress: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/respond/{token}
///
/// Resolve a response link: run the lifecycle guards and return the form
/// definition together with any saved answers.
pub async fn resolve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
) -> AppResult<Json<DataResponse<ResolvePayload>>> {
    enforce_rate_limit(&state, &headers)?;

    let (response, form) = resolve_token(&state, &token).await?;

    let completed_responses = FormRepo::count_completed_responses(&state.pool, form.id).await?;
    let ctx = TokenContext {
        form_status: form.status()?,
        expires_at: form.expires_at,
        max_responses: form.max_responses,
        completed_responses,
        response_status: response.status()?,
    };
    check_resolution(&ctx, Utc::now()).map_err(AppError::Token)?;

    let rows = QuestionRepo::list_by_form(&state.pool, form.id).await?;
    let answer_rows = AnswerRepo::list_by_response(&state.pool, response.id).await?;

    let mut questions = Vec::with_capacity(rows.len());
    let mut answers: HashMap<DbId, Value> = HashMap::new();

    let domain: Vec<formpulse_core::question::Question> = rows
        .iter()
        .map(|row| row.to_domain())
        .collect::<Result<_, _>>()?;

    let types: HashMap<DbId, QuestionType> =
        domain.iter().map(|q| (q.id, q.question_type)).collect();
    for row in &answer_rows {
        if let Some(question_type) = types.get(&row.question_id) {
            answers.insert(row.question_id, row.raw_value(*question_type));
        }
    }

    for question in &domain {
        questions.push(PublicQuestion {
            id: question.id,
            question_type: question.question_type.as_str(),
            text: question.text.clone(),
            display_order: question.display_order,
            options: question.options.clone(),
            currently_required: is_required(question, &answers),
        });
    }

    let payload = ResolvePayload {
        form: PublicForm {
            title: form.title,
            description: form.description,
        },
        questions,
        answers,
        progress: response.progress,
    };

    Ok(Json(DataResponse { data: payload }))
}

/// POST /api/v1/respond/{token}
///
/// Replace the response's answer set with the submitted batch and update
/// progress, atomically. The client's `completed` flag decides COMPLETED
/// vs IN_PROGRESS; the server does not re-check required coverage.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(token): Path<String>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<Json<DataResponse<SubmitPayload>>> {
    enforce_rate_limit(&state, &headers)?;

    let (response, form) = resolve_token(&state, &token).await?;

    check_submission(
        form.status()?,
        form.expires_at,
        response.status()?,
        Utc::now(),
    )
    .map_err(AppError::Token)?;

    let rows = QuestionRepo::list_by_form(&state.pool, form.id).await?;
    let questions: Vec<formpulse_core::question::Question> = rows
        .iter()
        .map(|row| row.to_domain())
        .collect::<Result<_, _>>()?;

    let ops = plan_submission(&questions, &input.answers);

    // The batch is authoritative: questions absent from it are cleared,
    // so progress counts the submitted values alone. Counting anything
    // else would let `progress` disagree with the answer rows the same
    // transaction commits.
    let answered = count_answered(&questions, &input.answers);
    let progress = compute_progress(answered, questions.len());

    let updated =
        ResponseRepo::save_submission(&state.pool, response.id, &ops, progress, input.completed)
            .await?;

    tracing::info!(
        response_id = updated.id,
        progress = updated.progress,
        status = %updated.status,
        "Submission saved"
    );

    Ok(Json(DataResponse {
        data: SubmitPayload {
            status: updated.status,
            progress: updated.progress,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rate limit by client identity, preferring proxy-provided headers.
fn enforce_rate_limit(state: &AppState, headers: &HeaderMap) -> AppResult<()> {
    let identity = client_identity(headers);
    let decision = state.rate_limiter.check(&identity);
    if !decision.allowed {
        tracing::warn!(identity = %identity, "Rate limit exceeded");
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        });
    }
    Ok(())
}

/// Derive the client identity from forwarding headers. Falls back to a
/// shared bucket when no header is present.
fn client_identity(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return real_ip.trim().to_string();
    }
    "unknown".to_string()
}

/// Look up the response and its form by token. An unknown token answers
/// only after a randomized delay, so timing does not reveal whether a
/// token exists.
async fn resolve_token(state: &AppState, token: &str) -> AppResult<(Response, Form)> {
    let Some(response) = ResponseRepo::find_by_token(&state.pool, token).await? else {
        let delay_ms = {
            let mut rng = rand::rng();
            rng.random_range(ENUMERATION_DELAY_MS.0..=ENUMERATION_DELAY_MS.1)
        };
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
        return Err(AppError::Token(TokenError::InvalidToken));
    };

    let form = FormRepo::find_by_id(&state.pool, response.form_id)
        .await?
        .ok_or(AppError::Token(TokenError::InvalidToken))?;

    Ok((response, form))
}
