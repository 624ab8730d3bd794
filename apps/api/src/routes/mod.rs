//! Route table.
//!
//! ```text
//! /                         index (plain text)
//! /health                   health check
//! /api  ── API key check ─┬ /product            GET list, POST create
//!                         ├ /product/{id}       GET, PUT, DELETE
//!                         ├ /checkout           POST
//!                         ├ /transaction/{id}   GET
//!                         ├ /report/today       GET  (alias /report/hari-ini)
//!                         └ /report             GET ?start_date&end_date
//! ```

pub mod checkout;
pub mod health;
pub mod products;
pub mod reports;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::auth::require_api_key;
use crate::state::AppState;

/// Routes under `/api`, guarded by the API key check.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/product", get(products::list).post(products::create))
        .route(
            "/product/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/checkout", post(checkout::checkout))
        .route("/transaction/{id}", get(checkout::get_transaction))
        .route("/report/today", get(reports::today))
        .route("/report/hari-ini", get(reports::today))
        .route("/report", get(reports::range))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}

/// Unauthenticated routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
}
