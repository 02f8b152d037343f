//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (shop API reachable)
//!
//! # Catalogue
//! GET  /search                    - Search with facets, sort and price filter
//! GET  /collection/{slug}         - Shop API collection
//! GET  /collections/{slug}        - SEO collection landing
//! GET  /price/{slug}              - Price landing
//! GET  /product/{slug}            - Product detail
//!
//! # Cart
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add to cart (JSON or redirect)
//! POST /cart/adjust               - Change line quantity
//! POST /cart/remove               - Remove line
//!
//! # Auth (POSTs rate limited)
//! GET  /sign-in                   - Sign-in form
//! POST /sign-in                   - Sign in
//! GET  /sign-in/google            - Google OAuth hand-off
//! GET  /register                  - Registration form
//! POST /register                  - Register
//! GET  /verify                    - Verify account from email link
//! GET  /forgot-password           - Reset request form
//! POST /forgot-password           - Request reset email
//! GET  /reset-password            - New password form
//! POST /reset-password            - Set new password
//! POST /sign-out                  - Sign out
//!
//! # Account
//! GET  /account                   - Redirect to profile
//! GET  /account/profile           - Profile
//! POST /account/profile           - Update name and phone
//! POST /account/email             - Request email change
//! POST /account/password          - Change password
//!
//! # Preferences
//! POST /settings/currency         - Set currency cookie
//! POST /settings/language         - Set language cookie
//!
//! # Content
//! GET  /blog                      - Blog index
//! GET  /blog/{slug}               - Blog post
//! GET  /blog/category/{category}  - Blog category
//! GET  /about-us, /custom, /consultation
//! GET  /sitemap.xml, /robots.txt
//! ```

pub mod account;
pub mod auth;
pub mod blog;
pub mod cart;
pub mod collections;
pub mod home;
pub mod layout;
pub mod listing;
pub mod pages;
pub mod price;
pub mod products;
pub mod search;
pub mod settings;
pub mod sitemap;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::error::AppError;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;
use crate::vendure::{RequestContext, VendureError};

/// Map a shop API "not found" to a 404 for `what`; other failures pass through.
pub fn not_found_from(what: String) -> impl FnOnce(VendureError) -> AppError {
    move |e| match e {
        VendureError::NotFound(_) => AppError::NotFound(what),
        other => AppError::Vendure(other),
    }
}

/// Create the auth routes router.
///
/// Only the form submissions are rate limited; the pages themselves are not.
pub fn auth_routes() -> Router<AppState> {
    let limiter = auth_rate_limiter();

    Router::new()
        .route(
            "/sign-in",
            get(auth::sign_in_page).merge(post(auth::sign_in).layer(limiter.clone())),
        )
        .route("/sign-in/google", get(auth::google))
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(limiter.clone())),
        )
        .route("/verify", get(auth::verify))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page)
                .merge(post(auth::forgot_password).layer(limiter.clone())),
        )
        .route(
            "/reset-password",
            get(auth::reset_password_page).merge(post(auth::reset_password).layer(limiter)),
        )
        .route("/sign-out", post(auth::sign_out))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route(
            "/profile",
            get(account::profile).post(account::update_profile),
        )
        .route("/email", post(account::update_email))
        .route("/password", post(account::update_password))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/adjust", post(cart::adjust))
        .route("/remove", post(cart::remove))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
        .route("/category/{category}", get(blog::category))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Catalogue
        .route(search::PATH, get(search::search))
        .route("/collection/{slug}", get(collections::show))
        .route("/collections/{slug}", get(collections::landing))
        .route("/price/{slug}", get(price::show))
        .route("/product/{slug}", get(products::show))
        // Cart, account and preferences
        .nest("/cart", cart_routes())
        .nest("/account", account_routes())
        .merge(auth_routes())
        .route("/settings/currency", post(settings::currency))
        .route("/settings/language", post(settings::language))
        // Content
        .nest("/blog", blog_routes())
        .route("/about-us", get(pages::about_us))
        .route("/custom", get(pages::custom))
        .route("/consultation", get(pages::consultation))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/robots.txt", get(sitemap::robots))
        .fallback(not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the shop API cannot answer
/// `activeChannel`.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state
        .shop()
        .get_active_channel(&RequestContext::anonymous())
        .await
    {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_from_maps_only_not_found() {
        let err = not_found_from("product x".to_string())(VendureError::NotFound("x".into()));
        assert!(matches!(err, AppError::NotFound(what) if what == "product x"));

        let err = not_found_from("product x".to_string())(VendureError::RateLimited(1));
        assert!(matches!(err, AppError::Vendure(VendureError::RateLimited(1))));
    }
}
