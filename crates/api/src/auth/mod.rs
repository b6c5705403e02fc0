//! Credentials for the management console.
//!
//! Only console users authenticate; respondents reach their form through
//! an opaque response token instead.
//!
//! - [`password`] -- Argon2id hashing plus the account password policy.
//! - [`jwt`] -- access-token claims and opaque refresh-token helpers.

pub mod jwt;
pub mod password;
