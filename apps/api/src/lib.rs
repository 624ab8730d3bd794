//! # Kasir API
//!
//! HTTP server for the Kasir point-of-sale backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir API Server                                 │
//! │                                                                         │
//! │  Client ──► TraceLayer ──► TimeoutLayer ──► Router                      │
//! │                                               │                         │
//! │                     /health, /  ◄─────────────┤                         │
//! │                                               ▼                         │
//! │                                   /api/* ── API key ──► handlers        │
//! │                                                            │            │
//! │                                                            ▼            │
//! │                                             kasir-db (SQLite, WAL)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config::AppConfig`]):
//! - `APP_ENV` - Environment name; selects `.env.<APP_ENV>` (default: development)
//! - `HOST` / `PORT` - Bind address (default: 0.0.0.0:8080)
//! - `DATABASE_PATH` - SQLite file (default: ./kasir.db)
//! - `DB_LOCK_TIMEOUT_MS` - Bound on checkout lock waits (default: 5000)
//! - `API_KEY` - Required for `/api/*` when set; mandatory in production

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::StatusCode;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::AppConfig;
pub use error::ApiError;
pub use state::AppState;

/// Builds the full application router with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .merge(routes::public_routes())
        .nest("/api", routes::api_routes(state.clone()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
