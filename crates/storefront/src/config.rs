//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VENDURE_SHOP_API_URL` - Vendure shop API GraphQL endpoint (e.g., `https://api.example.com/shop-api`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SITE_URL` - Public origin used for canonical URLs, sitemap and JSON-LD
//!   (default: `https://everandalways.com`)
//! - `VENDURE_AUTH_TOKEN_COOKIE` - Cookie holding the shop API session token
//!   (default: `vendure-auth-token`)
//! - `VENDURE_CHANNEL_TOKEN` - Channel token sent as the `vendure-token` header
//! - `STOREFRONT_CONTENT_DIR` - Markdown content root (default: `crates/storefront/content`)
//! - `STOREFRONT_STATIC_DIR` - Static asset root (default: `crates/storefront/static`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default name of the cookie that carries the shop API session token.
pub const DEFAULT_AUTH_TOKEN_COOKIE: &str = "vendure-auth-token";

/// Default public origin.
pub const DEFAULT_SITE_URL: &str = "https://everandalways.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public origin without a trailing slash
    pub site_url: String,
    /// Vendure shop API configuration
    pub vendure: VendureConfig,
    /// Markdown content root
    pub content_dir: PathBuf,
    /// Static asset root served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Vendure shop API configuration.
///
/// Implements `Debug` manually to redact the channel token.
#[derive(Clone)]
pub struct VendureConfig {
    /// Shop API GraphQL endpoint
    pub shop_api_url: String,
    /// Channel token for multi-channel servers
    pub channel_token: Option<SecretString>,
    /// Name of the cookie that stores the customer's session token
    pub auth_token_cookie: String,
}

impl std::fmt::Debug for VendureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendureConfig")
            .field("shop_api_url", &self.shop_api_url)
            .field(
                "channel_token",
                &self.channel_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("auth_token_cookie", &self.auth_token_cookie)
            .finish()
    }
}

impl VendureConfig {
    /// Server origin that hosts the shop API, i.e. the endpoint without its
    /// `/shop-api` path. OAuth plugins mount their routes here.
    #[must_use]
    pub fn server_base_url(&self) -> &str {
        let trimmed = self.shop_api_url.trim_end_matches('/');
        trimmed.strip_suffix("/shop-api").unwrap_or(trimmed)
    }

    /// Origin of the shop API server, which also serves product assets.
    #[must_use]
    pub fn origin(&self) -> String {
        url::Url::parse(&self.shop_api_url)
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_default()
    }

    /// Where the browser is sent to start Google sign-in.
    #[must_use]
    pub fn google_sign_in_url(&self) -> String {
        format!("{}/auth/google", self.server_base_url())
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string()))?;

        let site_url = env.or_default("SITE_URL", DEFAULT_SITE_URL);
        parse_url("SITE_URL", &site_url)?;
        let site_url = site_url.trim_end_matches('/').to_string();

        let vendure = VendureConfig::from_env(&env)?;

        let content_dir = PathBuf::from(env.or_default("STOREFRONT_CONTENT_DIR", "crates/storefront/content"));
        let static_dir = PathBuf::from(env.or_default("STOREFRONT_STATIC_DIR", "crates/storefront/static"));

        Ok(Self {
            host,
            port,
            site_url,
            vendure,
            content_dir,
            static_dir,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.site_url.starts_with("https://")
    }

    /// Absolute URL for a site path.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.site_url)
        } else {
            format!("{}/{path}", self.site_url)
        }
    }
}

impl VendureConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let shop_api_url = env.required("VENDURE_SHOP_API_URL")?;
        parse_url("VENDURE_SHOP_API_URL", &shop_api_url)?;

        let auth_token_cookie = env.or_default("VENDURE_AUTH_TOKEN_COOKIE", DEFAULT_AUTH_TOKEN_COOKIE);
        if !is_cookie_name(&auth_token_cookie) {
            return Err(ConfigError::InvalidEnvVar(
                "VENDURE_AUTH_TOKEN_COOKIE".to_string(),
                "must be a non-empty cookie token".to_string(),
            ));
        }

        Ok(Self {
            shop_api_url,
            channel_token: env.optional("VENDURE_CHANNEL_TOKEN").map(SecretString::from),
            auth_token_cookie,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with the storefront's defaulting rules.
///
/// Empty values count as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a sampling rate in `0.0..=1.0`.
    fn sample_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        let rate = raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if (0.0..=1.0).contains(&rate) {
            Ok(rate)
        } else {
            Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("{rate} is outside 0.0..=1.0"),
            ))
        }
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// RFC 6265 cookie-name token characters.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("VENDURE_SHOP_API_URL", "http://localhost:3001/shop-api")]).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.site_url, "https://everandalways.com");
        assert_eq!(config.vendure.auth_token_cookie, "vendure-auth-token");
        assert!(config.vendure.channel_token.is_none());
        assert!(config.secure_cookies());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_shop_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "VENDURE_SHOP_API_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[
            ("VENDURE_SHOP_API_URL", "http://localhost:3001/shop-api"),
            ("STOREFRONT_PORT", "eighty"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_custom_cookie_and_site_url() {
        let config = load(&[
            ("VENDURE_SHOP_API_URL", "http://localhost:3001/shop-api"),
            ("VENDURE_AUTH_TOKEN_COOKIE", "ea-session"),
            ("SITE_URL", "http://localhost:3000/"),
            ("VENDURE_CHANNEL_TOKEN", "ea-channel"),
        ])
        .unwrap();

        assert_eq!(config.vendure.auth_token_cookie, "ea-session");
        assert_eq!(config.site_url, "http://localhost:3000");
        assert!(!config.secure_cookies());
        assert_eq!(
            config.vendure.channel_token.unwrap().expose_secret(),
            "ea-channel"
        );
    }

    #[test]
    fn test_rejects_cookie_name_with_separators() {
        let err = load(&[
            ("VENDURE_SHOP_API_URL", "http://localhost:3001/shop-api"),
            ("VENDURE_AUTH_TOKEN_COOKIE", "bad name;"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_sample_rate_bounds() {
        let err = load(&[
            ("VENDURE_SHOP_API_URL", "http://localhost:3001/shop-api"),
            ("SENTRY_TRACES_SAMPLE_RATE", "1.5"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SENTRY_TRACES_SAMPLE_RATE"));
    }

    #[test]
    fn test_google_sign_in_url_strips_shop_api_path() {
        let config = VendureConfig {
            shop_api_url: "https://api.everandalways.com/shop-api/".to_string(),
            channel_token: None,
            auth_token_cookie: DEFAULT_AUTH_TOKEN_COOKIE.to_string(),
        };
        assert_eq!(
            config.google_sign_in_url(),
            "https://api.everandalways.com/auth/google"
        );
    }

    #[test]
    fn test_absolute_url() {
        let config = load(&[("VENDURE_SHOP_API_URL", "http://localhost:3001/shop-api")]).unwrap();
        assert_eq!(
            config.absolute_url("/blog"),
            "https://everandalways.com/blog"
        );
        assert_eq!(
            config.absolute_url("logo.png"),
            "https://everandalways.com/logo.png"
        );
    }

    #[test]
    fn test_vendure_config_debug_redacts_channel_token() {
        let config = VendureConfig {
            shop_api_url: "http://localhost:3001/shop-api".to_string(),
            channel_token: Some(SecretString::from("super-secret-channel")),
            auth_token_cookie: DEFAULT_AUTH_TOKEN_COOKIE.to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:3001"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-channel"));
    }
}
