//! Request handlers.
//!
//! Each submodule covers one resource. Handlers delegate to the
//! repositories in `formpulse_db` and the pure evaluators in
//! `formpulse_core`, mapping failures via [`crate::error::AppError`].

pub mod auth;
pub mod dashboard;
pub mod form;
pub mod question;
pub mod respond;
pub mod respondent;
pub mod response;
pub mod users;
