//! Well-known role name constants.
//!
//! These must match the seed data in the `create_roles` migration.

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_VIEWER: &str = "viewer";
