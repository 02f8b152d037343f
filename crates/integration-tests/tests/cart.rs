//! Cart mutations through the storefront.

use ever_and_always_integration_tests::{ISSUED_TOKEN, TestApp, location, set_cookies};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_add_to_cart_json_sets_session_cookie() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/cart/add"))
        .header("Accept", "application/json")
        .form(&[("variant_id", "v1"), ("quantity", "2")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let cookies = set_cookies(&resp);
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with(&format!("vendure-auth-token={ISSUED_TOKEN}")))
    );

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["cart_quantity"], 2);

    // The cookie now rides along as a bearer token.
    app.get("/cart").await;
    let order_calls = app.shop.calls_to("GetActiveOrder");
    assert_eq!(
        order_calls.last().unwrap().bearer.as_deref(),
        Some(ISSUED_TOKEN)
    );
}

#[tokio::test]
async fn test_add_to_cart_error_result_is_reported() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/cart/add"))
        .header("Accept", "application/json")
        .form(&[("variant_id", "v2")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("insufficient stock"));
}

#[tokio::test]
async fn test_malformed_add_to_cart_answers_json() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/cart/add"))
        .header("Accept", "application/json")
        .form(&[("quantity", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("select options"));
    assert!(app.shop.calls_to("AddItemToOrder").is_empty());
}

#[tokio::test]
async fn test_add_to_cart_form_redirects() {
    let app = TestApp::spawn().await;

    let resp = app.post_form("/cart/add", &[("variant_id", "v1")]).await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/cart");

    let resp = app.post_form("/cart/add", &[("variant_id", "")]).await;
    assert!(resp.status().is_redirection());
    assert!(location(&resp).starts_with("/cart?error="));
    assert_eq!(app.shop.calls_to("AddItemToOrder").len(), 1);
}
