//! Tagged response cache for catalogue queries.

use std::time::{Duration, Instant};

use moka::Expiry;

use crate::vendure::types::{Channel, Collection, CollectionSummary, Product, SearchResult};

/// Collection menus and details.
pub const TAG_COLLECTIONS: &str = "collections";
/// Active channel settings.
pub const TAG_CHANNEL: &str = "channel";
/// Product detail and search results.
pub const TAG_PRODUCTS: &str = "products";

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Search(Box<SearchResult>),
    Product(Box<Product>),
    Collection(Box<Collection>),
    Collections(Vec<CollectionSummary>),
    Channel(Box<Channel>),
}

impl CacheValue {
    const fn ttl(&self) -> Duration {
        match self {
            Self::Collection(_) | Self::Collections(_) => Duration::from_secs(24 * 60 * 60),
            Self::Channel(_) | Self::Search(_) | Self::Product(_) => Duration::from_secs(60 * 60),
        }
    }
}

/// Build a cache key: `{tag}:{scope}:{identity}`.
///
/// `scope` carries the currency and language so that switching either never
/// serves a response fetched for the other.
#[must_use]
pub fn cache_key(tag: &str, scope: &str, identity: &str) -> String {
    format!("{tag}:{scope}:{identity}")
}

/// Whether `key` belongs to `tag`.
#[must_use]
pub fn has_tag(key: &str, tag: &str) -> bool {
    key.strip_prefix(tag).is_some_and(|rest| rest.starts_with(':'))
}

/// Per-entry expiry derived from the value's tag.
pub struct TagExpiry;

impl Expiry<String, CacheValue> for TagExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl())
    }
}
