//! Route definitions for the public `/respond` endpoints.
//!
//! No authentication; the opaque token in the path is the credential.
//! Both endpoints are rate limited per client identity.

use axum::routing::get;
use axum::Router;

use crate::handlers::respond;
use crate::state::AppState;

/// Routes mounted at `/respond`.
///
/// ```text
/// GET  /{token}  -> resolve (form definition + saved answers)
/// POST /{token}  -> submit (save answers, update progress)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{token}", get(respond::resolve).post(respond::submit))
}
