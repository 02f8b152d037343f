//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry hub and HTTP transaction layers
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID
//! 4. CSP nonce
//! 5. Security headers (reads the nonce)
//! 6. Rate limiting on authentication POST routes

pub mod csp;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod shopper;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use shopper::{
    CURRENCY_COOKIE, LANGUAGE_COOKIE, Shopper, clear_session_cookie, preference_cookie,
    with_session,
};
