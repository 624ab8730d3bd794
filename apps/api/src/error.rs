//! # API Error Type
//!
//! Every handler returns [`ApiResult`]. Errors become a JSON body with a
//! stable `kind`:
//!
//! ```text
//! ┌───────────────────────┬────────┬────────────────────────────────────┐
//! │ kind                  │ status │ raised by                          │
//! ├───────────────────────┼────────┼────────────────────────────────────┤
//! │ validation            │  400   │ bad body/query, ValidationError    │
//! │ unauthorized          │  401   │ API key check                      │
//! │ not_found             │  404   │ unknown product / transaction id   │
//! │ product_not_found     │  404   │ checkout line for unknown product  │
//! │ insufficient_stock    │  409   │ checkout line beyond stock         │
//! │ product_in_use        │  409   │ delete of a product in the ledger  │
//! │ busy                  │  503   │ lock wait exceeded lock_timeout    │
//! │ internal              │  500   │ anything else (details logged)     │
//! └───────────────────────┴────────┴────────────────────────────────────┘
//!
//! { "kind": "insufficient_stock",
//!   "message": "Insufficient stock for product 'Indomie' (1): ...",
//!   "details": { "product_id": 1, "available": 50, "requested": 100 } }
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kasir_core::{CoreError, ValidationError};
use kasir_db::{CatalogError, CheckoutError, DbError};
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input failed a domain validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body, path or query could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ApiError::NotFound { entity, id }
    }

    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => "validation",
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Checkout(err) => err.kind(),
            ApiError::Catalog(err) => match err {
                CatalogError::Validation(_) => "validation",
                CatalogError::NotFound(_) => "not_found",
                CatalogError::InUse(_) => "product_in_use",
                CatalogError::Db(db) => db_kind(db),
            },
            ApiError::Db(db) => db_kind(db),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            "validation" => StatusCode::BAD_REQUEST,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "not_found" | "product_not_found" => StatusCode::NOT_FOUND,
            "insufficient_stock" | "product_in_use" => StatusCode::CONFLICT,
            "busy" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured fields clients can act on without parsing the message.
    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Checkout(CheckoutError::Rejected(CoreError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            })) => Some(json!({
                "product_id": product_id,
                "product_name": product_name,
                "available": available,
                "requested": requested,
            })),
            ApiError::Checkout(CheckoutError::Rejected(CoreError::ProductNotFound(id))) => {
                Some(json!({ "product_id": id }))
            }
            ApiError::Catalog(CatalogError::InUse(id)) => Some(json!({ "product_id": id })),
            _ => None,
        }
    }
}

fn db_kind(err: &DbError) -> &'static str {
    match err {
        DbError::NotFound { .. } => "not_found",
        e if e.is_busy() => "busy",
        _ => "internal",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let message = match kind {
            "internal" => {
                tracing::error!(error = %self, "Internal error");
                "An internal error occurred".to_string()
            }
            "busy" => {
                tracing::warn!(error = %self, "Request failed on a busy database");
                "The store is busy, try again".to_string()
            }
            _ => self.to_string(),
        };

        let mut body = json!({
            "kind": kind,
            "message": message,
        });
        if let Some(details) = self.details() {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
