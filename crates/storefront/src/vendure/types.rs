//! Domain types for shop API responses.
//!
//! These types deserialize straight from the shop API's camelCase JSON and are
//! what the rest of the storefront works with. Prices are minor units.

use ever_and_always_core::{
    CollectionId, CustomerId, FacetValueId, Money, OptionGroupId, OptionId, OrderLineId,
    PriceSummary, ProductId, StockLevel, VariantId,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Assets
// =============================================================================

/// An image asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Asset ID.
    pub id: String,
    /// Preview URL served by the asset server.
    pub preview: String,
    /// Original upload URL.
    #[serde(default)]
    pub source: Option<String>,
}

impl Asset {
    /// Browser-safe preview URL.
    #[must_use]
    pub fn url(&self) -> String {
        normalize_asset_url(&self.preview)
    }
}

/// Local asset servers on Windows hosts hand out backslash paths.
#[must_use]
pub fn normalize_asset_url(url: &str) -> String {
    url.replace('\\', "/")
}

/// Asset reference that only carries a preview URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPreview {
    /// Preview URL.
    pub preview: String,
}

// =============================================================================
// Search
// =============================================================================

/// Input for the `search` query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    /// Free-text term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    /// Restrict results to a collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_slug: Option<String>,
    /// Facet filters. Omitted entirely when nothing is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_value_filters: Option<Vec<FacetValueFilter>>,
    /// Collapse variants into one result per product.
    pub group_by_product: bool,
    /// Page size.
    pub take: u32,
    /// Offset.
    pub skip: u32,
    /// Sort order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SearchSort>,
}

/// A single facet filter clause. Each clause must match (`and`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetValueFilter {
    /// Facet value ID that results must carry.
    pub and: FacetValueId,
}

/// Sort field and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchSort {
    /// Sort by product name.
    Name(SortOrder),
    /// Sort by price.
    Price(SortOrder),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

/// Result of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Total number of matching products across all pages.
    pub total_items: u32,
    /// The requested page of products.
    pub items: Vec<SearchResultItem>,
    /// Facet values present in the full result set, with counts.
    pub facet_values: Vec<FacetValueResult>,
}

/// A product summary returned by search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Product slug.
    pub slug: String,
    /// Featured image.
    #[serde(default)]
    pub product_asset: Option<AssetPreview>,
    /// Price or price range including tax.
    pub price_with_tax: PriceSummary,
    /// Currency of `price_with_tax`.
    pub currency_code: String,
}

/// A facet value with its result count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetValueResult {
    /// Number of products carrying this value.
    pub count: u32,
    /// The value.
    #[serde(rename = "facetValue")]
    pub facet_value: FacetValue,
}

/// A filterable attribute value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetValue {
    /// Facet value ID.
    pub id: FacetValueId,
    /// Display name (e.g. "Rose Gold").
    pub name: String,
    /// Parent facet.
    pub facet: Facet,
}

/// A filter dimension (e.g. "Metal").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facet {
    /// Facet ID.
    pub id: String,
    /// Display name.
    pub name: String,
}

// =============================================================================
// Products
// =============================================================================

/// Full product detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// HTML description.
    #[serde(default)]
    pub description: String,
    /// Featured image.
    #[serde(default)]
    pub featured_asset: Option<Asset>,
    /// All images.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Collections containing this product.
    #[serde(default)]
    pub collections: Vec<CollectionSummary>,
    /// Option dimensions.
    #[serde(default)]
    pub option_groups: Vec<OptionGroup>,
    /// Purchasable variants.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// The collection used for breadcrumbs and related products: the first
    /// nested collection, else the first collection.
    #[must_use]
    pub fn primary_collection(&self) -> Option<&CollectionSummary> {
        self.collections
            .iter()
            .find(|c| c.parent.is_some())
            .or_else(|| self.collections.first())
    }

    /// Image URLs for the gallery and structured data.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        let urls: Vec<String> = self.assets.iter().map(Asset::url).collect();
        if urls.is_empty() {
            self.featured_asset.iter().map(Asset::url).collect()
        } else {
            urls
        }
    }
}

/// A product option dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionGroup {
    /// Group ID.
    pub id: OptionGroupId,
    /// Machine code, used as the URL parameter name.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Selectable values.
    pub options: Vec<ProductOption>,
}

/// A value within an option group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    /// Option ID.
    pub id: OptionId,
    /// Machine code, used as the URL parameter value.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Owning group, when requested.
    #[serde(default)]
    pub group_id: Option<OptionGroupId>,
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Price including tax.
    pub price_with_tax: Money,
    /// Currency of `price_with_tax`.
    pub currency_code: String,
    /// Stock availability.
    pub stock_level: StockLevel,
    /// One option per group.
    #[serde(default)]
    pub options: Vec<ProductOption>,
}

// =============================================================================
// Collections
// =============================================================================

/// A collection as listed in menus and on products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    /// Collection ID.
    pub id: CollectionId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Parent, when nested.
    #[serde(default)]
    pub parent: Option<CollectionParent>,
    /// Featured image.
    #[serde(default)]
    pub featured_asset: Option<AssetPreview>,
}

/// Reference to a parent collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionParent {
    /// Parent ID.
    pub id: CollectionId,
}

/// Collection detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Collection ID.
    pub id: CollectionId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// HTML description.
    #[serde(default)]
    pub description: String,
    /// Featured image.
    #[serde(default)]
    pub featured_asset: Option<AssetPreview>,
}

// =============================================================================
// Channel
// =============================================================================

/// The channel the storefront sells through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Channel ID.
    pub id: String,
    /// Channel code.
    pub code: String,
    /// Default currency.
    pub default_currency_code: String,
    /// Currencies shoppers may choose.
    #[serde(default)]
    pub available_currency_codes: Vec<String>,
    /// Default language.
    pub default_language_code: String,
    /// Languages shoppers may choose.
    #[serde(default)]
    pub available_language_codes: Vec<String>,
}

// =============================================================================
// Customers
// =============================================================================

/// The signed-in customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Title (Mr, Ms, ...).
    #[serde(default)]
    pub title: Option<String>,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email_address: String,
    /// Phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Input for `registerCustomerAccount`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerInput {
    /// Email address.
    pub email_address: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Password (omitted when the server verifies first).
    pub password: String,
}

/// Input for `updateCustomer`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// The user record returned by `login`, `resetPassword` and verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: String,
    /// Login identifier (email).
    pub identifier: String,
}

// =============================================================================
// Orders
// =============================================================================

/// The shopper's active order (cart).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    pub id: String,
    /// Order code.
    pub code: String,
    /// Total number of units.
    pub total_quantity: u32,
    /// Subtotal including tax.
    pub sub_total_with_tax: Money,
    /// Shipping including tax.
    #[serde(default)]
    pub shipping_with_tax: Money,
    /// Grand total including tax.
    pub total_with_tax: Money,
    /// Order currency.
    pub currency_code: String,
    /// Order lines.
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

/// A line in an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Line ID.
    pub id: OrderLineId,
    /// Units on this line.
    pub quantity: u32,
    /// Unit price including tax.
    pub unit_price_with_tax: Money,
    /// Line total including tax.
    pub line_price_with_tax: Money,
    /// Line image.
    #[serde(default)]
    pub featured_asset: Option<AssetPreview>,
    /// The variant ordered.
    pub product_variant: OrderLineVariant,
}

/// Variant details carried on an order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Owning product.
    pub product: OrderLineProduct,
}

/// Product details carried on an order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineProduct {
    /// Product name.
    pub name: String,
    /// Product slug.
    pub slug: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_search_input_omits_unset_fields() {
        let input = SearchInput {
            group_by_product: true,
            take: 12,
            skip: 0,
            ..SearchInput::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"groupByProduct": true, "take": 12, "skip": 0})
        );
    }

    #[test]
    fn test_search_input_wire_shape() {
        let input = SearchInput {
            term: Some("halo".to_string()),
            collection_slug: Some("engagement".to_string()),
            facet_value_filters: Some(vec![FacetValueFilter {
                and: FacetValueId::new("7"),
            }]),
            group_by_product: true,
            take: 12,
            skip: 24,
            sort: Some(SearchSort::Price(SortOrder::Desc)),
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "term": "halo",
                "collectionSlug": "engagement",
                "facetValueFilters": [{"and": "7"}],
                "groupByProduct": true,
                "take": 12,
                "skip": 24,
                "sort": {"price": "DESC"}
            })
        );
    }

    #[test]
    fn test_primary_collection_prefers_nested() {
        let product: Product = serde_json::from_value(json!({
            "id": "1",
            "name": "Classic Solitaire",
            "slug": "classic-solitaire",
            "collections": [
                {"id": "1", "name": "Rings", "slug": "rings", "parent": null},
                {"id": "4", "name": "Solitaire", "slug": "solitaire", "parent": {"id": "1"}}
            ]
        }))
        .unwrap();
        assert_eq!(product.primary_collection().unwrap().slug, "solitaire");
    }

    #[test]
    fn test_primary_collection_falls_back_to_first() {
        let product: Product = serde_json::from_value(json!({
            "id": "1",
            "name": "Band",
            "slug": "band",
            "collections": [
                {"id": "2", "name": "Wedding", "slug": "wedding"},
                {"id": "3", "name": "Bands", "slug": "bands"}
            ]
        }))
        .unwrap();
        assert_eq!(product.primary_collection().unwrap().slug, "wedding");
    }

    #[test]
    fn test_asset_url_normalizes_backslashes() {
        let asset = Asset {
            id: "1".to_string(),
            preview: "http://localhost:3000/assets\\preview\\ring.jpg".to_string(),
            source: None,
        };
        assert_eq!(asset.url(), "http://localhost:3000/assets/preview/ring.jpg");
    }
}
