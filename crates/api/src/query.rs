//! Shared query parameter types for API handlers.

use serde::Deserialize;

use formpulse_core::types::DbId;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to sane bounds: limit in `1..=200` (default 50), offset >= 0.
    pub fn clamp(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(50).clamp(1, 200);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// Query parameters for the dashboard endpoint (`?form_id=`).
#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub form_id: Option<DbId>,
}
