//! Catalogue pages rendered against the fake shop API.

use ever_and_always_integration_tests::{PRODUCT_SLUG, TestApp};
use reqwest::StatusCode;

#[tokio::test]
async fn test_home_page_renders_top_collections() {
    let app = TestApp::spawn().await;

    let resp = app.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Engagement Rings"));
    assert!(body.contains("/collection/engagement-rings"));
}

#[tokio::test]
async fn test_search_forwards_term_and_facets() {
    let app = TestApp::spawn().await;

    let resp = app.get("/search?q=oval&facets=10&sort=price-asc").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Oval Solitaire"));
    assert!(body.contains("Platinum"));

    let searches = app.shop.calls_to("SearchProducts");
    let input = &searches.last().unwrap().variables["input"];
    assert_eq!(input["term"], "oval");
    assert_eq!(input["facetValueFilters"][0]["and"], "10");
    assert_eq!(input["groupByProduct"], true);
}

#[tokio::test]
async fn test_collection_page_and_unknown_collection() {
    let app = TestApp::spawn().await;

    let resp = app.get("/collection/engagement-rings").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Engagement Rings"));

    let resp = app.get("/collection/no-such-collection").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seo_landing_and_price_pages() {
    let app = TestApp::spawn().await;

    assert_eq!(
        app.get("/collections/engagement-rings").await.status(),
        StatusCode::OK
    );
    assert_eq!(
        app.get("/price/diamond-rings-under-1000").await.status(),
        StatusCode::OK
    );
    assert_eq!(
        app.get("/collections/not-a-landing").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_unknown_price_page_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/price/no-such-tier").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(app.shop.calls_to("SearchProducts").is_empty());
}

#[tokio::test]
async fn test_product_page_resolves_selected_variant() {
    let app = TestApp::spawn().await;

    let resp = app.get(&format!("/product/{PRODUCT_SLUG}?metal=platinum")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Oval Solitaire"));
    assert!(body.contains(r#"name="variant_id" value="v1""#));
    assert!(body.contains("application/ld+json"));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/product/no-such-ring").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blog_and_content_pages() {
    let app = TestApp::spawn().await;

    let resp = app.get("/blog").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("/blog/lab-grown-vs-natural-diamonds")
    );

    assert_eq!(
        app.get("/blog/lab-grown-vs-natural-diamonds").await.status(),
        StatusCode::OK
    );
    assert_eq!(app.get("/blog/no-such-post").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/consultation").await.status(), StatusCode::OK);
}
