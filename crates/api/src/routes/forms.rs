//! Route definitions for the `/forms` resource, including nested
//! questions and responses.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{form, question, response};
use crate::state::AppState;

/// Routes mounted at `/forms`.
///
/// ```text
/// GET    /                                   -> list_forms
/// POST   /                                   -> create_form (admin)
/// GET    /{id}                               -> get_form
/// PUT    /{id}                               -> update_form (admin)
/// DELETE /{id}                               -> delete_form (admin)
/// POST   /{id}/publish                       -> publish_form (admin)
/// POST   /{id}/pause                         -> pause_form (admin)
/// POST   /{id}/close                         -> close_form (admin)
/// POST   /{id}/archive                       -> archive_form (admin)
/// GET    /{form_id}/questions                -> list_questions
/// POST   /{form_id}/questions                -> create_question (admin)
/// PUT    /{form_id}/questions/{id}           -> update_question (admin)
/// DELETE /{form_id}/questions/{id}           -> delete_question (admin)
/// GET    /{form_id}/responses                -> list_responses
/// POST   /{form_id}/responses                -> mint_response (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form::list_forms).post(form::create_form))
        .route(
            "/{id}",
            get(form::get_form)
                .put(form::update_form)
                .delete(form::delete_form),
        )
        .route("/{id}/publish", post(form::publish_form))
        .route("/{id}/pause", post(form::pause_form))
        .route("/{id}/close", post(form::close_form))
        .route("/{id}/archive", post(form::archive_form))
        .route(
            "/{form_id}/questions",
            get(question::list_questions).post(question::create_question),
        )
        .route(
            "/{form_id}/questions/{id}",
            axum::routing::put(question::update_question).delete(question::delete_question),
        )
        .route(
            "/{form_id}/responses",
            get(response::list_responses).post(response::mint_response),
        )
}
