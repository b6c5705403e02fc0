//! Route definitions for the `/respondents` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::respondent;
use crate::state::AppState;

/// Routes mounted at `/respondents`.
///
/// ```text
/// GET    /       -> list_respondents
/// POST   /       -> create_respondent (admin)
/// GET    /{id}   -> get_respondent
/// PUT    /{id}   -> update_respondent (admin)
/// DELETE /{id}   -> delete_respondent (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(respondent::list_respondents).post(respondent::create_respondent),
        )
        .route(
            "/{id}",
            get(respondent::get_respondent)
                .put(respondent::update_respondent)
                .delete(respondent::delete_respondent),
        )
}
