//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::vendure::ShopClient;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid shop API URL: {0}")]
    InvalidShopUrl(#[from] url::ParseError),
    #[error("failed to load content: {0}")]
    Content(#[from] ContentError),
}

/// Application state shared across all handlers.
///
/// Cheap to clone via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: ShopClient,
    content: ContentStore,
}

impl AppState {
    /// Build the state: shop API client plus content loaded from
    /// `config.content_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop API URL is invalid or content cannot be
    /// read.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let shop = ShopClient::new(&config.vendure)?;
        let content = ContentStore::load(&config.content_dir)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shop,
                content,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shop API client.
    #[must_use]
    pub fn shop(&self) -> &ShopClient {
        &self.inner.shop
    }

    /// Get a reference to the loaded content.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
