use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ratelimit::FixedWindowLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: formpulse_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Per-IP fixed-window rate limiter for the public respond endpoints.
    /// Injected here rather than living as a module singleton so tests can
    /// swap policies.
    pub rate_limiter: Arc<FixedWindowLimiter>,
}
