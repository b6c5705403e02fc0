//! Route definitions for the `/admin` resource (user management).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the `super_admin` role.
///
/// ```text
/// GET  /users                      -> list_users
/// POST /users                      -> create_user
/// GET  /users/{id}                 -> get_user
/// PUT  /users/{id}                 -> update_user
/// DELETE /users/{id}               -> deactivate_user
/// POST /users/{id}/reset-password  -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
        .route("/users/{id}/reset-password", post(users::reset_password))
}
