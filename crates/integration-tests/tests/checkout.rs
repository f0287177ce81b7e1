//! Checkout tests.

#![allow(clippy::unwrap_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use mother_vegetables_integration_tests::{
    BASE_URL, SITE_ID, TestContext, body_text, location, session_cookie_for, valid_tokens,
};

const HOSTED_CHECKOUT: &str = "https://www.wix.com/checkout/co-1";

fn checkout_request(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/checkout")
        .header(header::COOKIE, session_cookie_for(&valid_tokens()))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn mount_create_checkout(ctx: &TestContext, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/ecom/v1/carts/current/create-checkout"))
        .and(body_json(serde_json::json!({"channelType": "WEB"})))
        .respond_with(response)
        .expect(times)
        .mount(&ctx.wix)
        .await;
}

async fn mount_redirect_session(ctx: &TestContext, post_flow_url: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/redirect-session/v1/redirect-session"))
        .and(body_json(serde_json::json!({
            "ecomCheckout": {"checkoutId": "co-1"},
            "callbacks": {"postFlowUrl": post_flow_url}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "redirectSession": {"id": "rs-1", "fullUrl": HOSTED_CHECKOUT}
        })))
        .expect(times)
        .mount(&ctx.wix)
        .await;
}

fn checkout_created() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({"checkoutId": "co-1"}))
}

#[tokio::test]
async fn test_checkout_redirects_to_hosted_page() {
    let ctx = TestContext::new().await;
    mount_create_checkout(&ctx, checkout_created(), 1).await;
    mount_redirect_session(&ctx, "http://localhost:3000/?shade=light", 1).await;

    let response = ctx
        .send(checkout_request(
            "return_url=http%3A%2F%2Flocalhost%3A3000%2F%3Fshade%3Dlight",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).unwrap(), HOSTED_CHECKOUT);
}

#[tokio::test]
async fn test_checkout_falls_back_to_referer() {
    let ctx = TestContext::new().await;
    mount_create_checkout(&ctx, checkout_created(), 1).await;
    mount_redirect_session(&ctx, "http://localhost:3000/sale", 1).await;

    let mut request = checkout_request("");
    request.headers_mut().insert(
        header::REFERER,
        "http://localhost:3000/sale".parse().unwrap(),
    );
    let response = ctx.send(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).unwrap(), HOSTED_CHECKOUT);
}

#[tokio::test]
async fn test_checkout_ignores_non_http_return_url() {
    let ctx = TestContext::new().await;
    mount_create_checkout(&ctx, checkout_created(), 1).await;
    mount_redirect_session(&ctx, BASE_URL, 1).await;

    let response = ctx
        .send(checkout_request("return_url=javascript%3Aalert(1)"))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_checkout_failure_shows_plan_fallback() {
    let ctx = TestContext::new().await;
    mount_create_checkout(
        &ctx,
        ResponseTemplate::new(428).set_body_json(serde_json::json!({
            "message": "",
            "details": {"applicationError": {"code": "SITE_MUST_ACCEPT_PAYMENTS"}}
        })),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/redirect-session/v1/redirect-session"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.wix)
        .await;

    let response = ctx
        .send(checkout_request("return_url=http%3A%2F%2Flocalhost%3A3000%2F"))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(location(&response).is_none());
    let html = body_text(response).await;
    assert!(html.contains(&format!("siteGuid={SITE_ID}")));
    assert!(html.contains("premium-purchase-plan"));
    assert!(html.contains("target=\"_blank\""));
}

#[tokio::test]
async fn test_redirect_session_failure_shows_plan_fallback() {
    let ctx = TestContext::new().await;
    mount_create_checkout(&ctx, checkout_created(), 1).await;
    Mock::given(method("POST"))
        .and(path("/redirect-session/v1/redirect-session"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ctx.wix)
        .await;

    let response = ctx.send(checkout_request("")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("premium-purchase-plan"));
}
