//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /            -> dashboard (all forms)
/// GET /?form_id=N  -> dashboard (one form)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::dashboard))
}
