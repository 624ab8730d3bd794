//! Integration tests for the HTTP surface, driven through the full router.

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use kasir_api::{build_router, AppConfig, AppState};
use kasir_db::{Database, DbConfig};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn test_app_with_key(api_key: Option<&str>) -> Router {
    let config = AppConfig::from_source(|key| match key {
        "API_KEY" => api_key.map(str::to_string),
        "DATABASE_PATH" => Some(":memory:".to_string()),
        _ => None,
    })
    .unwrap();

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db, config))
}

async fn test_app() -> Router {
    test_app_with_key(None).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn create_product(app: &Router, name: &str, price: i64, stock: i64) -> i64 {
    let response = post(
        app,
        "/api/product",
        json!({ "name": name, "price": price, "stock": stock }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Health and index
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_service_and_database() {
    let app = test_app().await;
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "kasir-api");
    assert_eq!(json["database"], "up");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn index_lists_endpoints() {
    let app = test_app().await;
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(response).await;
    assert!(text.contains("/api/checkout"));
    assert!(text.contains("/api/report"));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = test_app().await;
    let response = get(&app, "/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Product catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn product_crud_round_trip() {
    let app = test_app().await;
    let id = create_product(&app, "Indomie", 3000, 50).await;
    create_product(&app, "Teh Botol", 5000, 10).await;

    let response = get(&app, &format!("/api/product/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Indomie");
    assert_eq!(json["stock"], 50);

    let response = get(&app, "/api/product?name=teh").await;
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Teh Botol");

    let response = send(
        &app,
        Method::PUT,
        &format!("/api/product/{id}"),
        Some(json!({ "name": "Indomie Goreng", "price": 3500, "stock": 40 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["price"], 3500);

    let response = send(&app, Method::DELETE, &format!("/api/product/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/product/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["kind"], "not_found");
}

#[tokio::test]
async fn product_validation_errors_are_400() {
    let app = test_app().await;

    for body in [
        json!({ "name": "", "price": 3000, "stock": 1 }),
        json!({ "name": "Indomie", "price": 0, "stock": 1 }),
        json!({ "name": "Indomie", "price": 3000, "stock": -1 }),
        json!({ "name": "Indomie" }),
    ] {
        let response = post(&app, "/api/product", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "validation");
    }

    let response = get(&app, "/api/product/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkout_commits_and_decrements_stock() {
    let app = test_app().await;
    let id = create_product(&app, "Indomie", 3000, 50).await;

    let response = post(
        &app,
        "/api/checkout",
        json!({ "items": [{ "product_id": id, "quantity": 2 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let tx = body_json(response).await;
    assert_eq!(tx["total_amount"], 6000);
    assert_eq!(tx["details"].as_array().unwrap().len(), 1);
    assert_eq!(tx["details"][0]["product_id"], id);
    assert_eq!(tx["details"][0]["quantity"], 2);
    assert_eq!(tx["details"][0]["subtotal"], 6000);
    assert!(tx["created_at"].is_string());

    let product = body_json(get(&app, &format!("/api/product/{id}")).await).await;
    assert_eq!(product["stock"], 48);

    let tx_id = tx["id"].as_i64().unwrap();
    let response = get(&app, &format!("/api/transaction/{tx_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, tx);

    let response = get(&app, "/api/transaction/9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_rejections_carry_kind_and_details() {
    let app = test_app().await;
    let id = create_product(&app, "Indomie", 3000, 50).await;

    let response = post(
        &app,
        "/api/checkout",
        json!({ "items": [{ "product_id": id, "quantity": 100 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let err = body_json(response).await;
    assert_eq!(err["kind"], "insufficient_stock");
    assert_eq!(err["details"]["product_id"], id);
    assert_eq!(err["details"]["available"], 50);
    assert_eq!(err["details"]["requested"], 100);

    let response = post(
        &app,
        "/api/checkout",
        json!({ "items": [{ "product_id": 999, "quantity": 1 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let err = body_json(response).await;
    assert_eq!(err["kind"], "product_not_found");
    assert_eq!(err["details"]["product_id"], 999);

    let response = post(&app, "/api/checkout", json!({ "items": [] })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "validation");

    let response = post(&app, "/api/checkout", json!({ "cart": "nope" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let product = body_json(get(&app, &format!("/api/product/{id}")).await).await;
    assert_eq!(product["stock"], 50);
}

#[tokio::test]
async fn product_in_ledger_cannot_be_deleted() {
    let app = test_app().await;
    let id = create_product(&app, "Indomie", 3000, 50).await;
    post(
        &app,
        "/api/checkout",
        json!({ "items": [{ "product_id": id, "quantity": 1 }] }),
    )
    .await;

    let response = send(&app, Method::DELETE, &format!("/api/product/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["kind"], "product_in_use");
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn today_report_and_alias_agree() {
    let app = test_app().await;

    let empty = body_json(get(&app, "/api/report/today").await).await;
    assert_eq!(empty["total_revenue"], 0);
    assert_eq!(empty["total_transactions"], 0);
    assert!(empty.get("best_selling_product").is_none());

    let a = create_product(&app, "A", 1000, 5).await;
    let b = create_product(&app, "B", 2000, 5).await;
    let response = post(
        &app,
        "/api/checkout",
        json!({ "items": [
            { "product_id": a, "quantity": 2 },
            { "product_id": b, "quantity": 1 }
        ] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let today = body_json(get(&app, "/api/report/today").await).await;
    assert_eq!(today["total_revenue"], 4000);
    assert_eq!(today["total_transactions"], 1);
    assert_eq!(today["best_selling_product"]["name"], "A");
    assert_eq!(today["best_selling_product"]["quantity"], 2);

    let alias = body_json(get(&app, "/api/report/hari-ini").await).await;
    assert_eq!(alias, today);

    let date = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let range = body_json(
        get(
            &app,
            &format!("/api/report?start_date={date}&end_date={date}"),
        )
        .await,
    )
    .await;
    assert_eq!(range, today);
}

#[tokio::test]
async fn range_report_validates_dates() {
    let app = test_app().await;

    for uri in [
        "/api/report",
        "/api/report?start_date=2026-01-01",
        "/api/report?start_date=01-01-2026&end_date=2026-01-31",
        "/api/report?start_date=2026-02-01&end_date=2026-01-01",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["kind"], "validation");
    }

    let response = get(&app, "/api/report?start_date=2020-01-01&end_date=2020-12-31").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total_transactions"], 0);
}

// ---------------------------------------------------------------------------
// API key
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_key_guards_api_routes_only() {
    let app = test_app_with_key(Some("rahasia")).await;

    let response = get(&app, "/api/product").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["kind"], "unauthorized");

    let request = Request::builder()
        .uri("/api/product")
        .header("x-api-key", "wrong")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/product")
        .header("X-API-Key", "rahasia")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}
