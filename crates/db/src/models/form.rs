//! Form entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use formpulse_core::error::CoreError;
use formpulse_core::lifecycle::FormStatus;
use formpulse_core::types::{DbId, Timestamp};

/// A form row from the `forms` table. `status` holds the SCREAMING_SNAKE
/// representation of [`FormStatus`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub expires_at: Option<Timestamp>,
    pub max_responses: Option<i32>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Form {
    /// Parse the stored status column. A value outside the known set is a
    /// data integrity problem, surfaced as an internal error.
    pub fn status(&self) -> Result<FormStatus, CoreError> {
        FormStatus::parse(&self.status).ok_or_else(|| {
            CoreError::Internal(format!("form {} has unknown status '{}'", self.id, self.status))
        })
    }
}

/// DTO for creating a new form. Forms always start in DRAFT.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateForm {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub expires_at: Option<Timestamp>,
    #[validate(range(min = 1))]
    pub max_responses: Option<i32>,
}

/// DTO for updating an existing form. All fields are optional; status
/// changes go through the dedicated transition endpoints instead.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateForm {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub expires_at: Option<Timestamp>,
    #[validate(range(min = 1))]
    pub max_responses: Option<i32>,
}
