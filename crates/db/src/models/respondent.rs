//! Respondent entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use formpulse_core::types::{DbId, Timestamp};

/// A respondent row from the `respondents` table.
///
/// Deleting a respondent does not delete their responses; the responses'
/// `respondent_id` is set to NULL and the answers persist anonymously.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Respondent {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub respondent_type: Option<String>,
    pub consented: bool,
    pub consented_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new respondent.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRespondent {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub respondent_type: Option<String>,
    #[serde(default)]
    pub consented: bool,
}

/// DTO for updating an existing respondent. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRespondent {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub respondent_type: Option<String>,
    pub consented: Option<bool>,
}
