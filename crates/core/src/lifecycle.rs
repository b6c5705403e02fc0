//! Form and response lifecycle states, plus the token resolution guards.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Form lifecycle. Only `PUBLISHED` forms accept submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormStatus {
    Draft,
    Published,
    Paused,
    Closed,
    Archived,
}

impl FormStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(Self::Draft),
            "PUBLISHED" => Some(Self::Published),
            "PAUSED" => Some(Self::Paused),
            "CLOSED" => Some(Self::Closed),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
            Self::Paused => "PAUSED",
            Self::Closed => "CLOSED",
            Self::Archived => "ARCHIVED",
        }
    }

    /// Valid lifecycle transitions.
    ///
    /// A form publishes from DRAFT or PAUSED, and may be paused, closed, or
    /// archived from any non-archived state. ARCHIVED is terminal.
    pub fn can_transition_to(self, to: FormStatus) -> bool {
        if self == FormStatus::Archived {
            return false;
        }
        match to {
            FormStatus::Draft => false,
            FormStatus::Published => matches!(self, FormStatus::Draft | FormStatus::Paused),
            FormStatus::Paused | FormStatus::Closed | FormStatus::Archived => self != to,
        }
    }
}

/// Response lifecycle. A COMPLETED response rejects further mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl ResponseStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "ABANDONED" => Some(Self::Abandoned),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Abandoned => "ABANDONED",
        }
    }
}

/// Distinct, externally observable failures of token resolution.
///
/// `InvalidToken` is the only variant whose response timing is deliberately
/// randomized (handled at the HTTP layer) to blunt token enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid or expired link")]
    InvalidToken,

    #[error("This form is no longer accepting responses (expired)")]
    Expired,

    #[error("This form is not currently available")]
    Unavailable,

    #[error("This form has reached its maximum number of responses")]
    CapacityReached,

    #[error("This response has already been submitted")]
    AlreadyCompleted,
}

/// Everything the read-path guards need to know about a resolved token.
#[derive(Debug, Clone, Copy)]
pub struct TokenContext {
    pub form_status: FormStatus,
    pub expires_at: Option<Timestamp>,
    pub max_responses: Option<i32>,
    pub completed_responses: i64,
    pub response_status: ResponseStatus,
}

/// Run the full resolution guard sequence, short-circuiting on the first
/// failure. Ordering matters and is externally observable: expiry is
/// checked before publication status, capacity before the response's own
/// completion state.
pub fn check_resolution(ctx: &TokenContext, now: Timestamp) -> Result<(), TokenError> {
    check_form_open(ctx.form_status, ctx.expires_at, now)?;
    if let Some(cap) = ctx.max_responses {
        if ctx.completed_responses >= i64::from(cap) {
            return Err(TokenError::CapacityReached);
        }
    }
    if ctx.response_status == ResponseStatus::Completed {
        return Err(TokenError::AlreadyCompleted);
    }
    Ok(())
}

/// Guards re-run on the write path before any answer mutation.
///
/// The capacity check is resolution-only: a response created under the cap
/// is entitled to complete.
pub fn check_submission(
    form_status: FormStatus,
    expires_at: Option<Timestamp>,
    response_status: ResponseStatus,
    now: Timestamp,
) -> Result<(), TokenError> {
    check_form_open(form_status, expires_at, now)?;
    if response_status == ResponseStatus::Completed {
        return Err(TokenError::AlreadyCompleted);
    }
    Ok(())
}

/// Expiry precedes publication status: a respondent holding a token to an
/// expired form learns it expired even if the form was also unpublished.
fn check_form_open(
    status: FormStatus,
    expires_at: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), TokenError> {
    if let Some(expires_at) = expires_at {
        if expires_at < now {
            return Err(TokenError::Expired);
        }
    }
    if status != FormStatus::Published {
        return Err(TokenError::Unavailable);
    }
    Ok(())
}
