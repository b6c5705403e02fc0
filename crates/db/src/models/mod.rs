//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod answer;
pub mod form;
pub mod question;
pub mod respondent;
pub mod response;
pub mod role;
pub mod session;
pub mod user;
