//! Vendure shop API client.
//!
//! # Architecture
//!
//! - `graphql_client` request/response envelopes with hand-written operation
//!   documents; HTTP via `reqwest` 0.13
//! - Vendure is the source of truth - NO local sync, direct API calls
//! - Read-only catalogue responses are cached in `moka` under tagged keys so a
//!   whole tag (e.g. `collections`) can be dropped at once
//!
//! # Sessions
//!
//! The shop API runs in bearer-token mode: the first request that needs a
//! session (adding to cart, logging in) answers with a `vendure-auth-token`
//! header. The route layer stores it in a cookie and hands it back on every
//! call that acts for the shopper.
//!
//! # Example
//!
//! ```rust,ignore
//! use ever_and_always_storefront::vendure::{RequestContext, ShopClient};
//!
//! let client = ShopClient::new(&config.vendure)?;
//! let ctx = RequestContext::anonymous();
//!
//! let product = client.get_product("classic-solitaire", &ctx).await?;
//! let outcome = client
//!     .add_item_to_order(&product.variants[0].id, 1, &ctx)
//!     .await?;
//! if let Some(token) = outcome.auth_token {
//!     // persist in the auth cookie
//! }
//! ```

mod client;
pub mod types;

pub use client::{
    AUTH_TOKEN_HEADER, RequestContext, ShopClient, TAG_CHANNEL, TAG_COLLECTIONS, TAG_PRODUCTS,
    WithToken,
};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Error)]
pub enum VendureError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the shop API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A mutation answered with one of its `ErrorResult` union members.
    #[error("{code}: {message}")]
    UserError {
        /// Vendure `ErrorCode`, e.g. `INVALID_CREDENTIALS_ERROR`.
        code: String,
        /// Human readable message from the server.
        message: String,
    },
}

impl VendureError {
    /// Message that is safe to show to the shopper.
    ///
    /// Only `ErrorResult` messages are written for end users; everything else
    /// collapses to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::UserError { message, .. } if !message.is_empty() => message.clone(),
            Self::RateLimited(_) => "Too many requests. Please wait a moment and try again.".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Whether this is the given `ErrorResult` code.
    #[must_use]
    pub fn is_code(&self, expected: &str) -> bool {
        matches!(self, Self::UserError { code, .. } if code == expected)
    }
}

/// A GraphQL error returned by the shop API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// Error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendure_error_display() {
        let err = VendureError::NotFound("product classic-solitaire".to_string());
        assert_eq!(err.to_string(), "Not found: product classic-solitaire");
    }

    #[test]
    fn test_user_error_display_and_message() {
        let err = VendureError::UserError {
            code: "INVALID_CREDENTIALS_ERROR".to_string(),
            message: "The provided credentials are invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "INVALID_CREDENTIALS_ERROR: The provided credentials are invalid"
        );
        assert_eq!(
            err.user_message("fallback"),
            "The provided credentials are invalid"
        );
        assert!(err.is_code("INVALID_CREDENTIALS_ERROR"));
    }

    #[test]
    fn test_user_message_hides_transport_errors() {
        let err = VendureError::GraphQL(vec![GraphQLError::message("Cannot query field")]);
        assert_eq!(err.user_message("Failed to add to cart"), "Failed to add to cart");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError::message("Field not found"),
            GraphQLError::message("Invalid ID"),
        ];
        let err = VendureError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 3, column: 7 }],
            path: vec![
                serde_json::Value::String("search".to_string()),
                serde_json::Value::String("items".to_string()),
                serde_json::Value::Number(2.into()),
            ],
        }];
        let err = VendureError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: search.items.2 at line 3:7"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = VendureError::GraphQL(vec![GraphQLError::message("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = VendureError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = VendureError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }
}
