//! Security headers middleware for XSS, clickjacking, and isolation protection.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::middleware::CspNonce;
use crate::state::AppState;

/// Cache policy for content-hashed assets under `/static/**/derived/`.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the `Content-Security-Policy` value.
///
/// Scripts are limited to same-origin files plus inline blocks carrying the
/// request nonce; images may also come from the shop API's asset server.
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>, asset_origin: &str) -> String {
    let script_src = nonce.map_or_else(|| "'self'".to_string(), |n| format!("'self' {}", n.source()));
    let img_src = if asset_origin.is_empty() {
        "'self' data:".to_string()
    } else {
        format!("'self' data: {asset_origin}")
    };

    format!(
        "default-src 'none'; \
         script-src {script_src}; \
         style-src 'self'; \
         font-src 'self'; \
         img-src {img_src}; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
///
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Content-Security-Policy` from [`content_security_policy`]
/// - `Permissions-Policy` denying device features
/// - `Cache-Control`: immutable for hashed assets, `no-store` for pages
/// - `Cross-Origin-Opener-Policy: same-origin`
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let hashed_asset = {
        let path = request.uri().path();
        path.starts_with("/static/") && path.contains("/derived/")
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    let policy = content_security_policy(nonce.as_ref(), &state.config().vendure.origin());
    match HeaderValue::from_str(&policy) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!(error = %e, "Invalid CSP header value"),
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "accelerometer=(), \
             camera=(), \
             display-capture=(), \
             geolocation=(), \
             gyroscope=(), \
             magnetometer=(), \
             microphone=(), \
             payment=(), \
             usb=(), \
             browsing-topics=()",
        ),
    );

    if hashed_asset {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE));
    } else if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_includes_nonce_and_asset_origin() {
        let nonce = CspNonce("abc123==".to_string());
        let policy = content_security_policy(Some(&nonce), "https://admin.everandalways.com");
        assert!(policy.contains("script-src 'self' 'nonce-abc123=='"));
        assert!(policy.contains("img-src 'self' data: https://admin.everandalways.com;"));
        assert!(policy.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn test_policy_without_nonce() {
        let policy = content_security_policy(None, "");
        assert!(policy.contains("script-src 'self';"));
        assert!(policy.contains("img-src 'self' data:;"));
    }
}
