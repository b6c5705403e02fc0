pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod forms;
pub mod health;
pub mod respond;
pub mod respondents;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                            login (public)
/// /auth/refresh                          refresh (public)
/// /auth/logout                           logout (requires auth)
///
/// /admin/users                           list, create (super_admin only)
/// /admin/users/{id}                      get, update, deactivate
/// /admin/users/{id}/reset-password       reset password
///
/// /forms                                 list, create
/// /forms/{id}                            get, update, delete
/// /forms/{id}/publish|pause|close|archive  lifecycle transitions
/// /forms/{form_id}/questions[/{id}]      question CRUD
/// /forms/{form_id}/responses             list, mint token links
///
/// /respondents[/{id}]                    respondent CRUD
///
/// /respond/{token}                       public resolve + submit
///
/// /dashboard                             aggregated summaries
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/forms", forms::router())
        .nest("/respondents", respondents::router())
        .nest("/respond", respond::router())
        .nest("/dashboard", dashboard::router())
}
