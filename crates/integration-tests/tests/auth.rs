//! Sign-in, sign-out, rate limiting and channel preferences.

use ever_and_always_integration_tests::{
    ISSUED_TOKEN, TestApp, VALID_PASSWORD, location, set_cookies,
};
use reqwest::StatusCode;

#[tokio::test]
async fn test_sign_in_validation_skips_shop_api() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/sign-in", &[("email", "not-an-email"), ("password", "x")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Please enter a valid email address")
    );
    assert!(app.shop.calls_to("Login").is_empty());
}

#[tokio::test]
async fn test_sign_in_shows_invalid_credentials() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/sign-in",
            &[("email", "ada@example.com"), ("password", "wrong")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("The provided credentials are invalid")
    );
}

#[tokio::test]
async fn test_sign_in_then_profile_then_sign_out() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/sign-in",
            &[
                ("email", "ada@example.com"),
                ("password", VALID_PASSWORD),
                ("redirectTo", "//evil.example"),
            ],
        )
        .await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/account");
    assert!(
        set_cookies(&resp)
            .iter()
            .any(|c| c.starts_with(&format!("vendure-auth-token={ISSUED_TOKEN}")))
    );

    let resp = app.get("/account/profile").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("ada@example.com"));

    let resp = app.post_form("/sign-out", &[]).await;
    assert!(resp.status().is_redirection());
    assert_eq!(app.shop.calls_to("Logout").len(), 1);
    assert!(
        set_cookies(&resp)
            .iter()
            .any(|c| c.starts_with("vendure-auth-token=;") && c.contains("Max-Age=0"))
    );
}

#[tokio::test]
async fn test_account_requires_session() {
    let app = TestApp::spawn().await;

    let resp = app.get("/account/profile").await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/sign-in?redirectTo=%2Faccount%2Fprofile");
}

#[tokio::test]
async fn test_profile_fetch_failure_redirects_to_sign_in() {
    let app = TestApp::spawn().await;

    app.post_form(
        "/sign-in",
        &[("email", "ada@example.com"), ("password", VALID_PASSWORD)],
    )
    .await;
    app.shop.set_unavailable(true);

    let resp = app.get("/account/profile").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/sign-in?redirectTo=%2Faccount%2Fprofile");
    let customer_calls = app.shop.calls_to("GetActiveCustomer");
    assert_eq!(
        customer_calls.last().unwrap().bearer.as_deref(),
        Some(ISSUED_TOKEN)
    );
}

#[tokio::test]
async fn test_auth_posts_are_rate_limited() {
    let app = TestApp::spawn().await;

    let mut statuses = Vec::new();
    for _ in 0..8 {
        let resp = app
            .post_form("/forgot-password", &[("email", "not-an-email")])
            .await;
        statuses.push(resp.status());
    }
    assert!(statuses.contains(&StatusCode::TOO_MANY_REQUESTS));

    // Pages stay reachable.
    assert_eq!(app.get("/forgot-password").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_currency_preference_is_validated_and_applied() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/settings/currency", &[("code", "GBP")])
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .post_form(
            "/settings/currency",
            &[("code", "EUR"), ("redirect", "/search?q=ring")],
        )
        .await;
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/search?q=ring");
    assert!(set_cookies(&resp).iter().any(|c| c.contains("=EUR")));

    app.get("/search?q=ring").await;
    let search = app.shop.calls_to("SearchProducts");
    assert!(
        search
            .last()
            .unwrap()
            .query
            .as_deref()
            .is_some_and(|q| q.contains("currencyCode=EUR"))
    );
}
