//! Response entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use formpulse_core::error::CoreError;
use formpulse_core::lifecycle::ResponseStatus;
use formpulse_core::types::{DbId, Timestamp};

/// A response row from the `responses` table.
///
/// The opaque `token` stands in for authentication on the public
/// respondent endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Response {
    pub id: DbId,
    pub form_id: DbId,
    pub respondent_id: Option<DbId>,
    pub token: String,
    pub status: String,
    pub progress: i32,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl Response {
    pub fn status(&self) -> Result<ResponseStatus, CoreError> {
        ResponseStatus::parse(&self.status).ok_or_else(|| {
            CoreError::Internal(format!(
                "response {} has unknown status '{}'",
                self.id, self.status
            ))
        })
    }
}

/// Request body for minting a response link.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResponse {
    pub respondent_id: Option<DbId>,
}
