//! Shop API client implementation.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Catalogue reads are cached in `moka` under tagged keys.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, PathFragment, Response};
use moka::future::Cache;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use ever_and_always_core::{OrderLineId, VariantId};

use crate::config::VendureConfig;
use crate::vendure::types::{
    Channel, Collection, CollectionSummary, CurrentUser, Customer, Order, Product,
    RegisterCustomerInput, SearchInput, SearchResult, UpdateCustomerInput,
};
use crate::vendure::{GraphQLError, GraphQLErrorLocation, VendureError};

pub use cache::{TAG_CHANNEL, TAG_COLLECTIONS, TAG_PRODUCTS};
use cache::{CacheValue, TagExpiry, cache_key, has_tag};
use conversions::{resolve_success, resolve_union};
use queries::{
    AddItemToOrder, AdjustOrderLine, GetActiveChannel, GetActiveCustomer, GetActiveOrder,
    GetCollection, GetProduct, GetTopCollections, Login, Logout, NoVariables,
    RegisterCustomerAccount, RemoveOrderLine, RequestPasswordReset,
    RequestUpdateCustomerEmailAddress, ResetPassword, SearchProducts, UpdateCustomer,
    UpdateCustomerPassword, VerifyCustomerAccount, add_item_to_order, adjust_order_line,
    get_collection, get_product, login, register_customer_account, remove_order_line,
    request_password_reset, request_update_customer_email_address, reset_password,
    search_products, update_customer, update_customer_password, verify_customer_account,
};

/// Response header carrying the session token in bearer mode.
pub const AUTH_TOKEN_HEADER: &str = "vendure-auth-token";

/// Request header selecting the channel.
const CHANNEL_TOKEN_HEADER: &str = "vendure-token";

// =============================================================================
// RequestContext
// =============================================================================

/// Per-request shopper context: session token and channel preferences.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Session token from the auth cookie.
    pub auth_token: Option<String>,
    /// Preferred currency code.
    pub currency: Option<String>,
    /// Preferred language code.
    pub language: Option<String>,
}

impl RequestContext {
    /// Context with no session and channel defaults.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Same preferences, different session token.
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Whether a session token is present.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Cache scope segment: `{currency}:{language}`, `-` for unset.
    fn cache_scope(&self) -> String {
        format!(
            "{}:{}",
            self.currency.as_deref().unwrap_or("-"),
            self.language.as_deref().unwrap_or("-")
        )
    }
}

/// A result together with the session token the shop API issued, if any.
#[derive(Debug, Clone)]
pub struct WithToken<T> {
    /// The operation result.
    pub value: T,
    /// New `vendure-auth-token`, to be written to the auth cookie.
    pub auth_token: Option<String>,
}

impl<T> WithToken<T> {
    fn try_map<U>(
        self,
        f: impl FnOnce(T) -> Result<U, VendureError>,
    ) -> Result<WithToken<U>, VendureError> {
        Ok(WithToken {
            value: f(self.value)?,
            auth_token: self.auth_token,
        })
    }
}

// =============================================================================
// ShopClient
// =============================================================================

/// Client for the Vendure shop API.
///
/// Cheap to clone; all clones share the HTTP pool and the response cache.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    client: reqwest::Client,
    endpoint: Url,
    channel_token: Option<SecretString>,
    cache: Cache<String, CacheValue>,
}

impl ShopClient {
    /// Create a new shop API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured shop API URL does not parse.
    pub fn new(config: &VendureConfig) -> Result<Self, url::ParseError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .expire_after(TagExpiry)
            .support_invalidation_closures()
            .build();

        Ok(Self {
            inner: Arc::new(ShopClientInner {
                client: reqwest::Client::new(),
                endpoint: Url::parse(&config.shop_api_url)?,
                channel_token: config.channel_token.clone(),
                cache,
            }),
        })
    }

    /// Drop every cached response under `tag`.
    pub fn invalidate_tag(&self, tag: &'static str) {
        match self
            .inner
            .cache
            .invalidate_entries_if(move |key, _| has_tag(key, tag))
        {
            Ok(_) => debug!(tag, "Cache tag invalidated"),
            Err(e) => tracing::warn!(tag, error = %e, "Cache tag invalidation failed"),
        }
    }

    fn endpoint_for(&self, ctx: &RequestContext) -> Url {
        let mut url = self.inner.endpoint.clone();
        if ctx.currency.is_some() || ctx.language.is_some() {
            let mut pairs = url.query_pairs_mut();
            if let Some(currency) = &ctx.currency {
                pairs.append_pair("currencyCode", currency);
            }
            if let Some(language) = &ctx.language {
                pairs.append_pair("languageCode", language);
            }
        }
        url
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        ctx: &RequestContext,
    ) -> Result<WithToken<Q::ResponseData>, VendureError> {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(self.endpoint_for(ctx))
            .header("Content-Type", "application/json");

        if let Some(token) = &ctx.auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(channel) = &self.inner.channel_token {
            request = request.header(CHANNEL_TOKEN_HEADER, channel.expose_secret());
        }

        let response = request.json(&request_body).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(VendureError::RateLimited(retry_after));
        }

        let auth_token = issued_token(response.headers());
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Shop API returned non-success status"
            );
            return Err(VendureError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            ))]));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %truncate(&response_text, 500),
                    "Failed to parse shop API response"
                );
                return Err(VendureError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(VendureError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        let data = response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Shop API response has no data and no errors"
            );
            VendureError::GraphQL(vec![GraphQLError::message("No data in response")])
        })?;

        Ok(WithToken {
            value: data,
            auth_token,
        })
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Search the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input, ctx), fields(term = ?input.term, collection = ?input.collection_slug))]
    pub async fn search(
        &self,
        input: SearchInput,
        ctx: &RequestContext,
    ) -> Result<SearchResult, VendureError> {
        let identity = format!("search:{}", serde_json::to_string(&input)?);
        let key = cache_key(TAG_PRODUCTS, &ctx.cache_scope(), &identity);

        if let Some(CacheValue::Search(result)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for search");
            return Ok(*result);
        }

        let data = self
            .execute::<SearchProducts>(search_products::Variables { input }, ctx)
            .await?
            .value;

        self.inner
            .cache
            .insert(key, CacheValue::Search(Box::new(data.search.clone())))
            .await;

        Ok(data.search)
    }

    /// Get a product by slug.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::NotFound`] when no product has this slug.
    #[instrument(skip(self, ctx), fields(slug = %slug))]
    pub async fn get_product(
        &self,
        slug: &str,
        ctx: &RequestContext,
    ) -> Result<Product, VendureError> {
        let key = cache_key(TAG_PRODUCTS, &ctx.cache_scope(), &format!("product:{slug}"));

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = get_product::Variables {
            slug: slug.to_string(),
        };
        let product = self
            .execute::<GetProduct>(variables, ctx)
            .await?
            .value
            .product
            .ok_or_else(|| VendureError::NotFound(format!("Product not found: {slug}")))?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a collection by slug.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::NotFound`] when no collection has this slug.
    #[instrument(skip(self, ctx), fields(slug = %slug))]
    pub async fn get_collection(
        &self,
        slug: &str,
        ctx: &RequestContext,
    ) -> Result<Collection, VendureError> {
        let key = cache_key(
            TAG_COLLECTIONS,
            &ctx.cache_scope(),
            &format!("collection:{slug}"),
        );

        if let Some(CacheValue::Collection(collection)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for collection");
            return Ok(*collection);
        }

        let variables = get_collection::Variables {
            slug: slug.to_string(),
        };
        let collection = self
            .execute::<GetCollection>(variables, ctx)
            .await?
            .value
            .collection
            .ok_or_else(|| VendureError::NotFound(format!("Collection not found: {slug}")))?;

        self.inner
            .cache
            .insert(key, CacheValue::Collection(Box::new(collection.clone())))
            .await;

        Ok(collection)
    }

    /// Get the top-level collections for the menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ctx))]
    pub async fn get_top_collections(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<CollectionSummary>, VendureError> {
        let key = cache_key(TAG_COLLECTIONS, &ctx.cache_scope(), "top");

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for top collections");
            return Ok(collections);
        }

        let items = self
            .execute::<GetTopCollections>(NoVariables::default(), ctx)
            .await?
            .value
            .collections
            .items;

        self.inner
            .cache
            .insert(key, CacheValue::Collections(items.clone()))
            .await;

        Ok(items)
    }

    /// Get the active channel's currency and language settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ctx))]
    pub async fn get_active_channel(&self, ctx: &RequestContext) -> Result<Channel, VendureError> {
        let key = cache_key(TAG_CHANNEL, &ctx.cache_scope(), "active");

        if let Some(CacheValue::Channel(channel)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for channel");
            return Ok(*channel);
        }

        let channel = self
            .execute::<GetActiveChannel>(NoVariables::default(), ctx)
            .await?
            .value
            .active_channel;

        self.inner
            .cache
            .insert(key, CacheValue::Channel(Box::new(channel.clone())))
            .await;

        Ok(channel)
    }

    // =========================================================================
    // Session reads (never cached)
    // =========================================================================

    /// Get the signed-in customer. `None` without a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ctx))]
    pub async fn get_active_customer(
        &self,
        ctx: &RequestContext,
    ) -> Result<Option<Customer>, VendureError> {
        if !ctx.has_session() {
            return Ok(None);
        }
        Ok(self
            .execute::<GetActiveCustomer>(NoVariables::default(), ctx)
            .await?
            .value
            .active_customer)
    }

    /// Get the shopper's active order. `None` without a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ctx))]
    pub async fn get_active_order(
        &self,
        ctx: &RequestContext,
    ) -> Result<Option<Order>, VendureError> {
        if !ctx.has_session() {
            return Ok(None);
        }
        Ok(self
            .execute::<GetActiveOrder>(NoVariables::default(), ctx)
            .await?
            .value
            .active_order)
    }

    // =========================================================================
    // Order mutations
    // =========================================================================

    /// Add a variant to the active order, creating the order if needed.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] for stock and order-state failures.
    #[instrument(skip(self, ctx), fields(variant_id = %variant_id))]
    pub async fn add_item_to_order(
        &self,
        variant_id: &VariantId,
        quantity: u32,
        ctx: &RequestContext,
    ) -> Result<WithToken<Order>, VendureError> {
        let variables = add_item_to_order::Variables {
            variant_id: variant_id.clone(),
            quantity,
        };
        self.execute::<AddItemToOrder>(variables, ctx)
            .await?
            .try_map(|data| resolve_union("addItemToOrder", data.add_item_to_order))
    }

    /// Set the quantity of an order line.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] for stock and order-state failures.
    #[instrument(skip(self, ctx), fields(line_id = %line_id))]
    pub async fn adjust_order_line(
        &self,
        line_id: &OrderLineId,
        quantity: u32,
        ctx: &RequestContext,
    ) -> Result<WithToken<Order>, VendureError> {
        let variables = adjust_order_line::Variables {
            order_line_id: line_id.clone(),
            quantity,
        };
        self.execute::<AdjustOrderLine>(variables, ctx)
            .await?
            .try_map(|data| resolve_union("adjustOrderLine", data.adjust_order_line))
    }

    /// Remove an order line.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] when the order can no longer change.
    #[instrument(skip(self, ctx), fields(line_id = %line_id))]
    pub async fn remove_order_line(
        &self,
        line_id: &OrderLineId,
        ctx: &RequestContext,
    ) -> Result<WithToken<Order>, VendureError> {
        let variables = remove_order_line::Variables {
            order_line_id: line_id.clone(),
        };
        self.execute::<RemoveOrderLine>(variables, ctx)
            .await?
            .try_map(|data| resolve_union("removeOrderLine", data.remove_order_line))
    }

    // =========================================================================
    // Account mutations
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] for invalid credentials or an
    /// unverified account.
    #[instrument(skip(self, password, ctx))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember_me: bool,
        ctx: &RequestContext,
    ) -> Result<WithToken<CurrentUser>, VendureError> {
        let variables = login::Variables {
            username: username.to_string(),
            password: password.to_string(),
            remember_me,
        };
        self.execute::<Login>(variables, ctx)
            .await?
            .try_map(|data| resolve_union("login", data.login))
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ctx))]
    pub async fn logout(&self, ctx: &RequestContext) -> Result<(), VendureError> {
        let data = self
            .execute::<Logout>(NoVariables::default(), ctx)
            .await?
            .value;
        resolve_success("logout", data.logout)
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] when the password is rejected or
    /// the address is already registered.
    #[instrument(skip(self, input, ctx))]
    pub async fn register_customer_account(
        &self,
        input: RegisterCustomerInput,
        ctx: &RequestContext,
    ) -> Result<(), VendureError> {
        let data = self
            .execute::<RegisterCustomerAccount>(register_customer_account::Variables { input }, ctx)
            .await?
            .value;
        resolve_success("registerCustomerAccount", data.register_customer_account)
    }

    /// Verify a newly registered account; signs the customer in.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] for invalid or expired tokens.
    #[instrument(skip(self, token, password, ctx))]
    pub async fn verify_customer_account(
        &self,
        token: &str,
        password: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<WithToken<CurrentUser>, VendureError> {
        let variables = verify_customer_account::Variables {
            token: token.to_string(),
            password: password.map(ToString::to_string),
        };
        self.execute::<VerifyCustomerAccount>(variables, ctx)
            .await?
            .try_map(|data| resolve_union("verifyCustomerAccount", data.verify_customer_account))
    }

    /// Email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, email_address, ctx))]
    pub async fn request_password_reset(
        &self,
        email_address: &str,
        ctx: &RequestContext,
    ) -> Result<(), VendureError> {
        let variables = request_password_reset::Variables {
            email_address: email_address.to_string(),
        };
        let data = self
            .execute::<RequestPasswordReset>(variables, ctx)
            .await?
            .value;
        resolve_success("requestPasswordReset", data.request_password_reset)
    }

    /// Set a new password using a reset token; signs the customer in.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] for invalid or expired tokens.
    #[instrument(skip(self, token, password, ctx))]
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        ctx: &RequestContext,
    ) -> Result<WithToken<CurrentUser>, VendureError> {
        let variables = reset_password::Variables {
            token: token.to_string(),
            password: password.to_string(),
        };
        self.execute::<ResetPassword>(variables, ctx)
            .await?
            .try_map(|data| resolve_union("resetPassword", data.reset_password))
    }

    /// Update the signed-in customer's name and phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input, ctx))]
    pub async fn update_customer(
        &self,
        input: UpdateCustomerInput,
        ctx: &RequestContext,
    ) -> Result<Customer, VendureError> {
        Ok(self
            .execute::<UpdateCustomer>(update_customer::Variables { input }, ctx)
            .await?
            .value
            .update_customer)
    }

    /// Change the signed-in customer's password.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] when the current password is wrong
    /// or the new one is rejected.
    #[instrument(skip_all)]
    pub async fn update_customer_password(
        &self,
        current_password: &str,
        new_password: &str,
        ctx: &RequestContext,
    ) -> Result<(), VendureError> {
        let variables = update_customer_password::Variables {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        let data = self
            .execute::<UpdateCustomerPassword>(variables, ctx)
            .await?
            .value;
        resolve_success("updateCustomerPassword", data.update_customer_password)
    }

    /// Start an email change; the new address receives a confirmation link.
    ///
    /// # Errors
    ///
    /// Returns [`VendureError::UserError`] when the password is wrong or the
    /// address is taken.
    #[instrument(skip_all)]
    pub async fn request_update_customer_email_address(
        &self,
        password: &str,
        new_email_address: &str,
        ctx: &RequestContext,
    ) -> Result<(), VendureError> {
        let variables = request_update_customer_email_address::Variables {
            password: password.to_string(),
            new_email_address: new_email_address.to_string(),
        };
        let data = self
            .execute::<RequestUpdateCustomerEmailAddress>(variables, ctx)
            .await?
            .value;
        resolve_success(
            "requestUpdateCustomerEmailAddress",
            data.request_update_customer_email_address,
        )
    }
}

fn issued_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    PathFragment::Key(s) => serde_json::Value::String(s),
                    PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn client() -> ShopClient {
        ShopClient::new(&VendureConfig {
            shop_api_url: "http://localhost:3000/shop-api".to_string(),
            channel_token: None,
            auth_token_cookie: crate::config::DEFAULT_AUTH_TOKEN_COOKIE.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_without_preferences() {
        let url = client().endpoint_for(&RequestContext::anonymous());
        assert_eq!(url.as_str(), "http://localhost:3000/shop-api");
    }

    #[test]
    fn test_endpoint_carries_channel_preferences() {
        let ctx = RequestContext {
            currency: Some("EUR".to_string()),
            language: Some("fr".to_string()),
            ..RequestContext::default()
        };
        let url = client().endpoint_for(&ctx);
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/shop-api?currencyCode=EUR&languageCode=fr"
        );
    }

    #[test]
    fn test_cache_scope_defaults() {
        assert_eq!(RequestContext::anonymous().cache_scope(), "-:-");
        let ctx = RequestContext {
            currency: Some("GBP".to_string()),
            ..RequestContext::default()
        };
        assert_eq!(ctx.cache_scope(), "GBP:-");
    }

    #[test]
    fn test_issued_token_ignores_empty_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(issued_token(&headers), None);
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(issued_token(&headers), None);
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("abc123"));
        assert_eq!(issued_token(&headers).as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_invalidate_tag_keeps_other_tags() {
        let client = client();
        let cache = &client.inner.cache;
        cache
            .insert(
                cache_key(TAG_COLLECTIONS, "-:-", "top"),
                CacheValue::Collections(Vec::new()),
            )
            .await;
        cache
            .insert(
                cache_key(TAG_CHANNEL, "-:-", "active"),
                CacheValue::Collections(Vec::new()),
            )
            .await;

        client.invalidate_tag(TAG_COLLECTIONS);
        cache.run_pending_tasks().await;

        assert!(cache.get(&cache_key(TAG_COLLECTIONS, "-:-", "top")).await.is_none());
        assert!(cache.get(&cache_key(TAG_CHANNEL, "-:-", "active")).await.is_some());
    }
}
