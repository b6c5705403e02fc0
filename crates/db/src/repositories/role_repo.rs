//! Repository for the `roles` lookup table.

use sqlx::PgPool;

use formpulse_core::types::DbId;

use crate::models::role::Role;

/// Provides lookups for the seeded role rows.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name. Errors if the id does not exist.
    pub async fn resolve_name(pool: &PgPool, id: DbId) -> Result<String, sqlx::Error> {
        let row: (String,) = sqlx::query_as("SELECT name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Find a role by its name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name, created_at FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
