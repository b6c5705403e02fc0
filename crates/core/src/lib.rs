//! Domain logic for the formpulse survey platform.
//!
//! Everything in this crate is pure: no I/O, no database handles. The `db`
//! crate maps rows into these types and the `api` crate drives the
//! evaluators from request handlers.

pub mod aggregation;
pub mod answer;
pub mod conditional;
pub mod error;
pub mod lifecycle;
pub mod nps;
pub mod progress;
pub mod question;
pub mod roles;
pub mod types;
