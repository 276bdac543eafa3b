use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use oderly_domain::order::OrderStatus;
use oderly_shop::handlers::extract::parse_query;
use oderly_shop::router::build_router;
use oderly_shop::state::AppState;
use oderly_testing::auth::{MockAuth, TEST_JWT_SECRET};

/// Router over a connection that was never opened: every request in this
/// file must be answered before the store is touched.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn assert_error(body: &Value, kind: &str, code: u64) {
    assert_eq!(body["kind"], kind, "body: {body}");
    assert_eq!(body["code"], code, "body: {body}");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn should_answer_liveness_and_report_unready_store() {
    let server = server();
    server.get("/healthz").await.assert_status_ok();
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_stamp_request_id_on_responses() {
    let res = server().get("/healthz").await;
    let id = res.header("x-request-id");
    assert!(id.to_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn should_reject_anonymous_caller_on_protected_routes() {
    let server = server();
    for path in ["/cart/getCart", "/orders/getAll", "/auth/profile"] {
        let res = server.get(path).await;
        res.assert_status(StatusCode::UNAUTHORIZED);
        assert_error(&res.json::<Value>(), "UNAUTHORIZED", 1006);
    }
}

#[tokio::test]
async fn should_reject_bad_credentials_before_lookup() {
    let server = server();

    let res = server
        .get("/cart/getCart")
        .authorization("Basic dXNlcjpwYXNz")
        .await;
    res.assert_status(StatusCode::UNAUTHORIZED);

    let forged = MockAuth::admin(Uuid::now_v7()).token() + "tampered";
    let res = server.get("/orders").authorization_bearer(forged).await;
    res.assert_status(StatusCode::UNAUTHORIZED);
    assert_error(&res.json::<Value>(), "UNAUTHORIZED", 1006);
}

#[tokio::test]
async fn should_map_malformed_json_to_validation_error() {
    let res = server()
        .post("/auth/signup")
        .text("{\"email\": ")
        .content_type("application/json")
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&res.json::<Value>(), "BAD_REQUEST", 1004);
}

#[tokio::test]
async fn should_map_missing_json_fields_to_validation_error() {
    let res = server()
        .post("/auth/login")
        .json(&serde_json::json!({ "email": "jane@example.com" }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_error(&res.json::<Value>(), "BAD_REQUEST", 1004);
}

// ── Query parsing ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct Listing {
    status: Option<OrderStatus>,
    page: Option<u32>,
}

#[test]
fn should_parse_status_and_page_from_query() {
    let q: Listing = parse_query(Some("status=OUT_FOR_DELIVERY&page=3")).unwrap();
    assert_eq!(q.status, Some(OrderStatus::OutForDelivery));
    assert_eq!(q.page, Some(3));
}

#[test]
fn should_default_when_query_absent() {
    let q: Listing = parse_query(None).unwrap();
    assert!(q.status.is_none() && q.page.is_none());
}

#[test]
fn should_reject_unknown_status_in_query() {
    let err = parse_query::<Listing>(Some("status=SHIPPED")).unwrap_err();
    assert_eq!(err.code(), 1004);
}
