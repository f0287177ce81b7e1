//! Error, not-found, and health page tests.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};

use mother_vegetables_integration_tests::{TestContext, body_text, set_session_cookie};
use mother_vegetables_storefront::middleware::{REQUEST_ID_HEADER, issuance_error_location};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_error_page_shows_message_without_session() {
    let ctx = TestContext::new().await;
    ctx.expect_token_issuance(0).await;

    let response = ctx.send(get(&issuance_error_location())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_session_cookie(&response).is_none());
    let html = body_text(response).await;
    assert!(html.contains("Make sure you are using a valid CLIENT_ID"));
}

#[tokio::test]
async fn test_error_page_escapes_message() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(get("/internal/error?message=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await;

    let html = body_text(response).await;
    assert!(!html.contains("<script>alert(1)</script>"));
}

#[tokio::test]
async fn test_error_page_without_message() {
    let ctx = TestContext::new().await;

    let response = ctx.send(get("/internal/error")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Something went wrong"));
}

#[tokio::test]
async fn test_error_page_shows_request_id() {
    let ctx = TestContext::new().await;

    let mut request = get("/internal/error");
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, "req-abc123".parse().unwrap());
    let response = ctx.send(request).await;

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "req-abc123"
    );
    assert!(body_text(response).await.contains("req-abc123"));
}

#[tokio::test]
async fn test_not_found_page_names_app() {
    let ctx = TestContext::new().await;

    let response = ctx.send(get("/404?app=Store")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("The Store app is not installed"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.send(get("/no-such-page")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(set_session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::without_client_id().await;

    let response = ctx.send(get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
