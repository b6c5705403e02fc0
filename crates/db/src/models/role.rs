//! Role lookup table model.

use serde::Serialize;
use sqlx::FromRow;

use formpulse_core::types::{DbId, Timestamp};

/// A role row from the `roles` table (seeded: super_admin, admin, viewer).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
