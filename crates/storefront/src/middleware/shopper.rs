//! Shopper context from cookies: the shop API session token and channel
//! preferences.
//!
//! The shop API runs in bearer mode. Whatever `vendure-auth-token` it issues
//! is stored in an `HttpOnly` cookie and replayed as `Authorization: Bearer`.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};

use crate::config::StorefrontConfig;
use crate::state::AppState;
use crate::vendure::RequestContext;

/// Cookie holding the preferred currency code.
pub const CURRENCY_COOKIE: &str = "currency-code";

/// Cookie holding the preferred language code.
pub const LANGUAGE_COOKIE: &str = "language-code";

/// Session cookie lifetime, matching the shop API's remembered sessions.
const SESSION_MAX_AGE: u32 = 60 * 60 * 24 * 365;

/// Preference cookie lifetime.
const PREFERENCE_MAX_AGE: u32 = 60 * 60 * 24 * 180;

/// Extractor for the shopper's [`RequestContext`].
///
/// Never rejects: a visitor without cookies gets an anonymous context.
#[derive(Debug, Clone)]
pub struct Shopper(pub RequestContext);

impl FromRequestParts<AppState> for Shopper {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(request_context(
            &parts.headers,
            &state.config().vendure.auth_token_cookie,
        )))
    }
}

/// Build the context from request cookies.
#[must_use]
pub fn request_context(headers: &HeaderMap, auth_cookie: &str) -> RequestContext {
    RequestContext {
        auth_token: cookie_value(headers, auth_cookie),
        currency: cookie_value(headers, CURRENCY_COOKIE),
        language: cookie_value(headers, LANGUAGE_COOKIE),
    }
}

/// Value of the named cookie across every `Cookie` header. Empty values
/// count as absent.
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn set_cookie(name: &str, value: &str, max_age: u32, secure: bool) -> Option<HeaderValue> {
    let secure = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{name}={value}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax{secure}"
    ))
    .map_err(|e| tracing::error!(cookie = name, error = %e, "Invalid cookie value"))
    .ok()
}

/// `Set-Cookie` storing the session token.
#[must_use]
pub fn session_cookie(config: &StorefrontConfig, token: &str) -> Option<HeaderValue> {
    set_cookie(
        &config.vendure.auth_token_cookie,
        token,
        SESSION_MAX_AGE,
        config.secure_cookies(),
    )
}

/// `Set-Cookie` expiring the session token.
#[must_use]
pub fn clear_session_cookie(config: &StorefrontConfig) -> Option<HeaderValue> {
    set_cookie(
        &config.vendure.auth_token_cookie,
        "",
        0,
        config.secure_cookies(),
    )
}

/// `Set-Cookie` storing a channel preference.
#[must_use]
pub fn preference_cookie(config: &StorefrontConfig, name: &str, value: &str) -> Option<HeaderValue> {
    set_cookie(name, value, PREFERENCE_MAX_AGE, config.secure_cookies())
}

/// Attach the session cookie when the shop API issued a token.
pub fn with_session(
    config: &StorefrontConfig,
    token: Option<&str>,
    response: impl IntoResponse,
) -> Response {
    let mut response = response.into_response();
    if let Some(cookie) = token.and_then(|t| session_cookie(config, t)) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}
