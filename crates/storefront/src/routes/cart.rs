//! Cart route handlers.
//!
//! The cart is the shop API's active order. The first mutation for a new
//! visitor opens a session; the issued token is stored in the auth cookie so
//! later requests see the same order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
    http::{HeaderMap, header::ACCEPT},
    response::{IntoResponse, Redirect, Response},
};
use ever_and_always_core::{OrderLineId, VariantId, format_price};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CspNonce, Shopper, with_session};
use crate::routes::layout::Layout;
use crate::seo::PageMeta;
use crate::state::AppState;
use crate::vendure::{Order, types::normalize_asset_url};

/// Fallback when the shop API gives no shopper-facing message.
const ADD_FAILED: &str = "Could not add this item to your cart. Please try again.";
const UPDATE_FAILED: &str = "Could not update your cart. Please try again.";

/// An order line for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub url: String,
    pub variant_name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// The active order for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub quantity: u32,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl From<&Order> for CartView {
    fn from(order: &Order) -> Self {
        let currency = order.currency_code.as_str();
        Self {
            lines: order
                .lines
                .iter()
                .map(|line| CartLineView {
                    id: line.id.to_string(),
                    name: line.product_variant.product.name.clone(),
                    url: format!("/product/{}", line.product_variant.product.slug),
                    variant_name: line.product_variant.name.clone(),
                    sku: line.product_variant.sku.clone(),
                    quantity: line.quantity,
                    unit_price: format_price(line.unit_price_with_tax, currency),
                    line_price: format_price(line.line_price_with_tax, currency),
                    image: line
                        .featured_asset
                        .as_ref()
                        .map(|a| normalize_asset_url(&a.preview)),
                })
                .collect(),
            quantity: order.total_quantity,
            subtotal: format_price(order.sub_total_with_tax, currency),
            shipping: format_price(order.shipping_with_tax, currency),
            total: format_price(order.total_with_tax, currency),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub layout: Layout,
    /// `None` renders the empty state.
    pub cart: Option<CartView>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub error: Option<String>,
}

/// Display the cart.
#[instrument(skip(state, ctx, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Query(query): Query<CartQuery>,
) -> Result<CartTemplate> {
    let order = state.shop().get_active_order(&ctx).await?;
    let cart = order
        .as_ref()
        .filter(|o| !o.lines.is_empty())
        .map(CartView::from);

    let meta = PageMeta::new("Shopping Cart", "Review the items in your cart.")
        .canonical(state.config().absolute_url("/cart"))
        .noindex();
    let layout = Layout::load(&state, &ctx, nonce, meta, "/cart").await;

    Ok(CartTemplate {
        layout,
        cart,
        error: query.error.filter(|e| !e.is_empty()),
    })
}

/// Form data for adding to cart.
///
/// Every field is optional so malformed posts still get a `{success, error}`
/// answer instead of a plaintext rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub variant_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Requested quantity; blank, non-numeric or zero values mean one.
fn parse_quantity(raw: Option<&str>) -> u32 {
    raw.and_then(|q| q.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1)
}

/// JSON answer for script callers.
#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Units in the cart after the change.
    pub cart_quantity: u32,
}

/// Whether the caller asked for JSON (the product page script does).
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Redirect back to the cart with an error banner.
fn cart_with_error(message: &str) -> Redirect {
    Redirect::to(&format!("/cart?error={}", urlencoding::encode(message)))
}

/// Add a variant to the cart.
///
/// Answers JSON `{success, error}` when `Accept: application/json`,
/// otherwise redirects to `/cart`.
#[instrument(skip(state, ctx, headers))]
pub async fn add(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    headers: HeaderMap,
    form: std::result::Result<Form<AddToCartForm>, FormRejection>,
) -> Response {
    let json = wants_json(&headers);
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable add to cart body");
            AddToCartForm::default()
        }
    };
    let quantity = parse_quantity(form.quantity.as_deref());
    let variant_id = VariantId::new(form.variant_id.trim());

    if variant_id.as_str().is_empty() {
        let message = "Please select options before adding to cart.";
        return if json {
            Json(AddToCartResponse {
                success: false,
                error: Some(message.to_string()),
                cart_quantity: 0,
            })
            .into_response()
        } else {
            cart_with_error(message).into_response()
        };
    }

    match state.shop().add_item_to_order(&variant_id, quantity, &ctx).await {
        Ok(result) => {
            add_breadcrumb("cart", "Added item", Some(&[("variant_id", variant_id.as_str())]));
            let token = result.auth_token.as_deref();
            if json {
                with_session(
                    state.config(),
                    token,
                    Json(AddToCartResponse {
                        success: true,
                        error: None,
                        cart_quantity: result.value.total_quantity,
                    }),
                )
            } else {
                with_session(state.config(), token, Redirect::to("/cart"))
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Add to cart failed");
            let message = e.user_message(ADD_FAILED);
            if json {
                Json(AddToCartResponse {
                    success: false,
                    error: Some(message),
                    cart_quantity: 0,
                })
                .into_response()
            } else {
                cart_with_error(&message).into_response()
            }
        }
    }
}

/// Form data for changing a line's quantity.
#[derive(Debug, Deserialize)]
pub struct AdjustLineForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip(state, ctx))]
pub async fn adjust(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    Form(form): Form<AdjustLineForm>,
) -> Response {
    let line_id = OrderLineId::new(form.line_id);
    let result = if form.quantity == 0 {
        state.shop().remove_order_line(&line_id, &ctx).await
    } else {
        state
            .shop()
            .adjust_order_line(&line_id, form.quantity, &ctx)
            .await
    };

    match result {
        Ok(result) => with_session(state.config(), result.auth_token.as_deref(), Redirect::to("/cart")),
        Err(e) => {
            tracing::warn!(error = %e, "Adjust order line failed");
            cart_with_error(&e.user_message(UPDATE_FAILED)).into_response()
        }
    }
}

/// Form data for removing a line.
#[derive(Debug, Deserialize)]
pub struct RemoveLineForm {
    pub line_id: String,
}

/// Remove a line from the cart.
#[instrument(skip(state, ctx))]
pub async fn remove(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    Form(form): Form<RemoveLineForm>,
) -> Response {
    let line_id = OrderLineId::new(form.line_id);
    match state.shop().remove_order_line(&line_id, &ctx).await {
        Ok(result) => with_session(state.config(), result.auth_token.as_deref(), Redirect::to("/cart")),
        Err(e) => {
            tracing::warn!(error = %e, "Remove order line failed");
            cart_with_error(&e.user_message(UPDATE_FAILED)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_wants_json() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        assert!(wants_json(&headers));
    }

    #[test]
    fn test_cart_error_redirect_is_encoded() {
        let response = cart_with_error("Only 2 left & more").into_response();
        let location = response.headers().get("location").and_then(|v| v.to_str().ok());
        assert_eq!(location, Some("/cart?error=Only%202%20left%20%26%20more"));
    }

    #[test]
    fn test_parse_quantity_is_lenient() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some("abc")), 1);
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("-2")), 1);
        assert_eq!(parse_quantity(Some(" 3 ")), 3);
    }
}
