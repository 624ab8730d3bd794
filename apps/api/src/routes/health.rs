//! Health check and endpoint index.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: String,
    pub env: String,
    /// `up` when a trivial query succeeds.
    pub database: &'static str,
    pub timestamp: String,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_up = state.db.health_check().await;

    Json(HealthResponse {
        status: if db_up { "healthy" } else { "degraded" },
        service: state.config.name.clone(),
        version: state.config.version.clone(),
        env: state.config.env.clone(),
        database: if db_up { "up" } else { "down" },
        timestamp: Utc::now().to_rfc3339(),
    })
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/health", "Health check"),
    ("GET", "/api/product", "List products (?name=)"),
    ("POST", "/api/product", "Create product"),
    ("GET", "/api/product/{id}", "Get product by ID"),
    ("PUT", "/api/product/{id}", "Update product"),
    ("DELETE", "/api/product/{id}", "Delete product"),
    ("POST", "/api/checkout", "Checkout transaction"),
    ("GET", "/api/transaction/{id}", "Get transaction by ID"),
    ("GET", "/api/report/today", "Today's sales report"),
    ("GET", "/api/report", "Sales report (?start_date=&end_date=)"),
];

/// GET /
pub async fn index(State(state): State<AppState>) -> String {
    let rule = "=".repeat(60);
    let mut out = format!(
        "{rule}\n  {} v{} ({})\n{rule}\n\nENDPOINTS:\n",
        state.config.name, state.config.version, state.config.env
    );
    for (method, path, what) in ENDPOINTS {
        out.push_str(&format!("  {method:<7}{path:<24}{what}\n"));
    }
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out
}
