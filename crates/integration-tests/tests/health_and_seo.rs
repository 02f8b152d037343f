//! Liveness, readiness, crawler files and the not-found page.

use ever_and_always_integration_tests::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_is_ok_without_the_shop_api() {
    let app = TestApp::spawn().await;
    app.shop.set_unavailable(true);

    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_readiness_follows_the_shop_api() {
    let app = TestApp::spawn().await;
    app.shop.set_unavailable(true);
    assert_eq!(
        app.get("/health/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );

    app.shop.set_unavailable(false);
    assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_robots_points_at_sitemap() {
    let app = TestApp::spawn().await;

    let resp = app.get("/robots.txt").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.starts_with("User-agent: *\nAllow: /"));
    assert!(body.contains(&format!("Sitemap: {}/sitemap.xml", app.base_url)));
}

#[tokio::test]
async fn test_sitemap_lists_content_urls() {
    let app = TestApp::spawn().await;

    let resp = app.get("/sitemap.xml").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );

    let body = resp.text().await.unwrap();
    assert!(body.contains("<urlset"));
    assert!(body.contains(&format!("<loc>{}/</loc>", app.base_url)));
    assert!(body.contains("/collections/engagement-rings</loc>"));
    assert!(body.contains("/price/diamond-rings-under-1000</loc>"));
    assert!(body.contains("/blog/lab-grown-vs-natural-diamonds</loc>"));
}

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let app = TestApp::spawn().await;

    let resp = app.get("/no/such/page").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
}

#[tokio::test]
async fn test_pages_carry_security_headers_and_request_id() {
    let app = TestApp::spawn().await;

    let resp = app.get("/about-us").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
    let csp = headers["content-security-policy"].to_str().unwrap();
    assert!(csp.contains("'nonce-"));
}
