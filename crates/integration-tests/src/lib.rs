//! Integration test harness for the Ever and Always storefront.
//!
//! Each test spawns the real storefront router on an ephemeral port, wired to
//! an in-process fake of the Vendure shop API. The fake answers by GraphQL
//! `operationName` with a small fixed catalogue and records every call.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ever-and-always-integration-tests
//! ```
//!
//! # Fixture catalogue
//!
//! - Product `oval-solitaire` with a platinum variant (`v1`, in stock) and a
//!   yellow gold variant (`v2`, out of stock)
//! - Collection `engagement-rings`
//! - Login succeeds for password [`VALID_PASSWORD`]

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use ever_and_always_storefront::config::StorefrontConfig;
use ever_and_always_storefront::state::AppState;
use reqwest::Client;
use serde_json::{Value, json};

/// Password the fake shop API accepts on `Login`.
pub const VALID_PASSWORD: &str = "correct-horse";

/// Session token the fake issues on login and cart creation.
pub const ISSUED_TOKEN: &str = "test-session-token";

/// Slug of the fixture product.
pub const PRODUCT_SLUG: &str = "oval-solitaire";

/// A shop API call as the fake received it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub variables: Value,
    /// Bearer token, when the storefront sent one.
    pub bearer: Option<String>,
    /// Query string on the endpoint (currency and language preferences).
    pub query: Option<String>,
}

/// In-process fake of the Vendure shop API.
#[derive(Clone, Default)]
pub struct FakeShop {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    unavailable: Arc<AtomicBool>,
}

impl FakeShop {
    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls for one operation.
    #[must_use]
    pub fn calls_to(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == operation)
            .collect()
    }

    /// Make every operation fail with HTTP 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn serve(self) -> SocketAddr {
        let router = Router::new()
            .route("/shop-api", post(graphql))
            .with_state(self);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }
}

async fn graphql(
    State(shop): State<FakeShop>,
    uri: axum::http::Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    let variables = body["variables"].clone();
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    shop.calls.lock().unwrap().push(RecordedCall {
        operation: operation.clone(),
        variables: variables.clone(),
        bearer: bearer.clone(),
        query: uri.query().map(str::to_string),
    });

    if shop.unavailable.load(Ordering::SeqCst) {
        return (axum::http::StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }

    let (data, issues_token) = respond(&operation, &variables, bearer.is_some());
    let mut response = Json(data).into_response();
    if issues_token {
        response
            .headers_mut()
            .insert("vendure-auth-token", ISSUED_TOKEN.parse().unwrap());
    }
    response
}

/// Canned answer for an operation, and whether it issues a session token.
fn respond(operation: &str, variables: &Value, signed_in: bool) -> (Value, bool) {
    match operation {
        "GetActiveChannel" => (json!({ "data": { "activeChannel": channel() } }), false),
        "GetTopCollections" => (
            json!({ "data": { "collections": { "items": [collection_summary()] } } }),
            false,
        ),
        "GetCollection" => {
            let collection = (variables["slug"] == "engagement-rings").then(|| {
                json!({
                    "id": "2",
                    "name": "Engagement Rings",
                    "slug": "engagement-rings",
                    "description": "<p>Rings for the question.</p>",
                    "featuredAsset": null
                })
            });
            (json!({ "data": { "collection": collection } }), false)
        }
        "SearchProducts" => (json!({ "data": { "search": search_result() } }), false),
        "GetProduct" => {
            let found = (variables["slug"] == PRODUCT_SLUG).then(product);
            (json!({ "data": { "product": found } }), false)
        }
        "GetActiveOrder" => (json!({ "data": { "activeOrder": null } }), false),
        "GetActiveCustomer" => {
            let customer = signed_in.then(|| {
                json!({
                    "id": "7",
                    "title": null,
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "emailAddress": "ada@example.com",
                    "phoneNumber": null
                })
            });
            (json!({ "data": { "activeCustomer": customer } }), false)
        }
        "AddItemToOrder" => {
            let result = if variables["variantId"] == "v1" {
                let quantity = variables["quantity"].as_u64().unwrap_or(1);
                order(quantity)
            } else {
                json!({
                    "__typename": "InsufficientStockError",
                    "errorCode": "INSUFFICIENT_STOCK_ERROR",
                    "message": "Only 0 items were added to the order due to insufficient stock"
                })
            };
            (json!({ "data": { "addItemToOrder": result } }), true)
        }
        "Login" => {
            if variables["password"] == VALID_PASSWORD {
                let user = json!({
                    "__typename": "CurrentUser",
                    "id": "7",
                    "identifier": variables["username"]
                });
                (json!({ "data": { "login": user } }), true)
            } else {
                let error = json!({
                    "__typename": "InvalidCredentialsError",
                    "errorCode": "INVALID_CREDENTIALS_ERROR",
                    "message": "The provided credentials are invalid"
                });
                (json!({ "data": { "login": error } }), false)
            }
        }
        "Logout" => (json!({ "data": { "logout": { "success": true } } }), false),
        other => (
            json!({ "errors": [{ "message": format!("{other} is not faked") }] }),
            false,
        ),
    }
}

fn channel() -> Value {
    json!({
        "id": "1",
        "code": "__default_channel__",
        "defaultCurrencyCode": "USD",
        "availableCurrencyCodes": ["USD", "EUR"],
        "defaultLanguageCode": "en",
        "availableLanguageCodes": ["en"]
    })
}

fn collection_summary() -> Value {
    json!({
        "id": "2",
        "name": "Engagement Rings",
        "slug": "engagement-rings",
        "featuredAsset": null
    })
}

fn search_result() -> Value {
    json!({
        "totalItems": 1,
        "items": [{
            "productId": "1",
            "productName": "Oval Solitaire",
            "slug": PRODUCT_SLUG,
            "productAsset": { "preview": "/assets/preview/oval.jpg" },
            "priceWithTax": { "__typename": "PriceRange", "min": 120_000, "max": 150_000 },
            "currencyCode": "USD"
        }],
        "facetValues": [{
            "count": 1,
            "facetValue": { "id": "10", "name": "Platinum", "facet": { "id": "3", "name": "Metal" } }
        }]
    })
}

fn product() -> Value {
    let asset = json!({
        "id": "a1",
        "preview": "/assets/preview/oval.jpg",
        "source": "/assets/source/oval.jpg"
    });
    json!({
        "id": "1",
        "name": "Oval Solitaire",
        "slug": PRODUCT_SLUG,
        "description": "<p>A classic oval diamond on a slim band.</p>",
        "featuredAsset": asset,
        "assets": [asset],
        "collections": [{
            "id": "2",
            "name": "Engagement Rings",
            "slug": "engagement-rings",
            "parent": { "id": "1" }
        }],
        "optionGroups": [{
            "id": "g1",
            "code": "metal",
            "name": "Metal",
            "options": [
                { "id": "o1", "code": "platinum", "name": "Platinum" },
                { "id": "o2", "code": "yellow-gold", "name": "Yellow Gold" }
            ]
        }],
        "variants": [
            {
                "id": "v1",
                "name": "Oval Solitaire Platinum",
                "sku": "OS-PT",
                "priceWithTax": 150_000,
                "currencyCode": "USD",
                "stockLevel": "IN_STOCK",
                "options": [{ "id": "o1", "code": "platinum", "name": "Platinum", "groupId": "g1" }]
            },
            {
                "id": "v2",
                "name": "Oval Solitaire Yellow Gold",
                "sku": "OS-YG",
                "priceWithTax": 120_000,
                "currencyCode": "USD",
                "stockLevel": "OUT_OF_STOCK",
                "options": [{ "id": "o2", "code": "yellow-gold", "name": "Yellow Gold", "groupId": "g1" }]
            }
        ]
    })
}

fn order(quantity: u64) -> Value {
    json!({
        "__typename": "Order",
        "id": "100",
        "code": "EA100",
        "totalQuantity": quantity,
        "subTotalWithTax": 150_000 * quantity,
        "shippingWithTax": 0,
        "totalWithTax": 150_000 * quantity,
        "currencyCode": "USD",
        "lines": [{
            "id": "l1",
            "quantity": quantity,
            "unitPriceWithTax": 150_000,
            "linePriceWithTax": 150_000 * quantity,
            "featuredAsset": null,
            "productVariant": {
                "id": "v1",
                "name": "Oval Solitaire Platinum",
                "sku": "OS-PT",
                "product": { "name": "Oval Solitaire", "slug": PRODUCT_SLUG }
            }
        }]
    })
}

/// A running storefront backed by a [`FakeShop`].
pub struct TestApp {
    /// Storefront origin, e.g. `http://127.0.0.1:49152`.
    pub base_url: String,
    /// Client that keeps cookies and does not follow redirects.
    pub client: Client,
    pub shop: FakeShop,
}

impl TestApp {
    /// Start the fake shop API and the storefront.
    pub async fn spawn() -> Self {
        let shop = FakeShop::default();
        let shop_addr = shop.clone().serve().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shop_api_url = format!("http://{shop_addr}/shop-api");
        let site_url = format!("http://{addr}");
        let crate_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront");
        let content_dir = format!("{crate_dir}/content");
        let static_dir = format!("{crate_dir}/static");

        let config = StorefrontConfig::from_lookup(|key| match key {
            "VENDURE_SHOP_API_URL" => Some(shop_api_url.clone()),
            "SITE_URL" => Some(site_url.clone()),
            "STOREFRONT_CONTENT_DIR" => Some(content_dir.clone()),
            "STOREFRONT_STATIC_DIR" => Some(static_dir.clone()),
            _ => None,
        })
        .unwrap();

        let state = AppState::new(config).unwrap();
        let app = ever_and_always_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url: site_url,
            client,
            shop,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// POST a form to a path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// All `Set-Cookie` header values of a response.
#[must_use]
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}
