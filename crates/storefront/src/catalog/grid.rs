//! Product grids: cards, post-fetch price filtering and pagination.
//!
//! The shop API search has no price filter in this integration, so listing
//! pages with a price range fetch a normal page of results and filter it in
//! memory. Pagination is then recomputed over the filtered set, which means a
//! page can render fewer than `take` products, or none, when the filter drops
//! most of the fetched batch.

use ever_and_always_core::format_price;

use crate::catalog::search::SearchParams;
use crate::vendure::SearchResultItem;
use crate::vendure::types::normalize_asset_url;

// =============================================================================
// Product cards
// =============================================================================

/// A product tile.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub name: String,
    pub url: String,
    /// Image URL, `None` renders the "No image" placeholder.
    pub image: Option<String>,
    /// Formatted lowest price.
    pub price: String,
    /// Variants are priced differently, shown as "from {price}".
    pub from: bool,
}

impl ProductCard {
    /// Card for a search result.
    #[must_use]
    pub fn from_item(item: &SearchResultItem) -> Self {
        Self {
            name: item.product_name.clone(),
            url: format!("/product/{}", item.slug),
            image: item
                .product_asset
                .as_ref()
                .map(|a| normalize_asset_url(&a.preview))
                .filter(|url| !url.is_empty()),
            price: format_price(item.price_with_tax.lowest(), &item.currency_code),
            from: item.price_with_tax.is_range(),
        }
    }
}

// =============================================================================
// Price filtering
// =============================================================================

/// Price range in display units (dollars).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBounds {
    /// Parse `minPrice`/`maxPrice` values. Empty, unparsable and non-positive
    /// values count as absent.
    #[must_use]
    pub fn from_params(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(parse_bound),
            max: max.and_then(parse_bound),
        }
    }

    /// Bounds read from a query string.
    #[must_use]
    pub fn from_query(params: &SearchParams) -> Self {
        Self::from_params(params.get("minPrice"), params.get("maxPrice"))
    }

    /// Only an upper bound.
    #[must_use]
    pub const fn up_to(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `price` lies in `[min or 0, max or infinity]`.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min.unwrap_or(0.0) && price <= self.max.unwrap_or(f64::INFINITY)
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Keep items whose lowest price lies within `bounds`.
///
/// Unbounded filters return every item unchanged.
#[must_use]
pub fn filter_by_price<'a>(
    items: &'a [SearchResultItem],
    bounds: &PriceBounds,
) -> Vec<&'a SearchResultItem> {
    if bounds.is_unbounded() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| bounds.contains(item.price_with_tax.lowest_major()))
        .collect()
}

/// One page of a filtered result set.
#[derive(Debug, Clone)]
pub struct FilteredPage<'a> {
    /// Visible slice.
    pub items: Vec<&'a SearchResultItem>,
    /// Size of the filtered set.
    pub total_filtered: usize,
    /// `ceil(total_filtered / take)`.
    pub total_pages: u32,
    /// Page the slice was taken for.
    pub current_page: u32,
}

/// Slice `filtered[(page-1)*take .. page*take]`.
#[must_use]
pub fn paginate_filtered(
    filtered: Vec<&SearchResultItem>,
    page: u32,
    take: u32,
) -> FilteredPage<'_> {
    let total_filtered = filtered.len();
    let take_len = take as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(take_len);

    FilteredPage {
        items: filtered.into_iter().skip(start).take(take_len).collect(),
        total_filtered,
        total_pages: total_pages(total_filtered, take),
        current_page: page.max(1),
    }
}

/// Number of pages needed for `total` items.
#[must_use]
pub fn total_pages(total: usize, take: u32) -> u32 {
    if take == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(take as usize)).unwrap_or(u32::MAX)
}

// =============================================================================
// Pagination links
// =============================================================================

/// A numbered page link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: u32,
    pub url: String,
    pub current: bool,
}

/// Pagination controls.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    /// Hidden on the first page.
    pub previous_url: Option<String>,
    /// Hidden on the last page.
    pub next_url: Option<String>,
    pub pages: Vec<PageLink>,
}

impl Pagination {
    /// Links for `path`, keeping every other query parameter. `None` when
    /// everything fits on one page.
    #[must_use]
    pub fn build(path: &str, params: &SearchParams, current_page: u32, total_pages: u32) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }
        let url_for = |page: u32| params.with_page(page).to_url(path);

        Some(Self {
            current_page,
            total_pages,
            previous_url: (current_page > 1).then(|| url_for(current_page - 1)),
            next_url: (current_page < total_pages).then(|| url_for(current_page + 1)),
            pages: (1..=total_pages)
                .map(|number| PageLink {
                    number,
                    url: url_for(number),
                    current: number == current_page,
                })
                .collect(),
        })
    }
}

/// A rendered grid: cards plus pagination.
#[derive(Debug, Clone)]
pub struct ProductGrid {
    pub cards: Vec<ProductCard>,
    /// Total matching products (filtered count for price-filtered grids).
    pub total: usize,
    pub pagination: Option<Pagination>,
    /// Message for the empty state.
    pub empty_message: &'static str,
}

impl ProductGrid {
    /// Grid paginated by the server's `totalItems`.
    #[must_use]
    pub fn plain(
        items: &[SearchResultItem],
        total_items: u32,
        take: u32,
        path: &str,
        params: &SearchParams,
        current_page: u32,
    ) -> Self {
        let pages = total_pages(total_items as usize, take);
        Self {
            cards: items.iter().map(ProductCard::from_item).collect(),
            total: total_items as usize,
            pagination: Pagination::build(path, params, current_page, pages),
            empty_message: "No products found",
        }
    }

    /// Grid filtered by price after the fetch and paginated over the filtered set.
    #[must_use]
    pub fn filtered(
        items: &[SearchResultItem],
        bounds: &PriceBounds,
        take: u32,
        path: &str,
        params: &SearchParams,
        current_page: u32,
    ) -> Self {
        let page = paginate_filtered(filter_by_price(items, bounds), current_page, take);
        Self {
            cards: page.items.into_iter().map(ProductCard::from_item).collect(),
            total: page.total_filtered,
            pagination: Pagination::build(path, params, page.current_page, page.total_pages),
            empty_message: "No products found matching your filters",
        }
    }

    /// Whether the empty state renders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.total == 0
    }

    /// "1 product" / "n products".
    #[must_use]
    pub fn count_label(&self) -> String {
        if self.total == 1 {
            "1 product".to_string()
        } else {
            format!("{} products", self.total)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use ever_and_always_core::{Money, PriceSummary, ProductId};

    use super::*;
    use crate::vendure::AssetPreview;

    pub fn item(slug: &str, cents: i64) -> SearchResultItem {
        SearchResultItem {
            product_id: ProductId::new(slug),
            product_name: slug.to_uppercase(),
            slug: slug.to_string(),
            product_asset: None,
            price_with_tax: PriceSummary::Single {
                value: Money::from_minor(cents),
            },
            currency_code: "USD".to_string(),
        }
    }

    fn twenty_items() -> Vec<SearchResultItem> {
        // 15 at or under $500, 5 above
        (0..20)
            .map(|i| {
                let cents = if i < 15 { 20_000 + i * 2_000 } else { 60_000 + i * 1_000 };
                item(&format!("ring-{i}"), cents)
            })
            .collect()
    }

    #[test]
    fn test_bounds_ignore_non_positive_and_garbage() {
        assert!(PriceBounds::from_params(Some("0"), Some("abc")).is_unbounded());
        assert!(PriceBounds::from_params(Some("-5"), Some("")).is_unbounded());
        assert_eq!(
            PriceBounds::from_params(Some("100"), Some("499.5")),
            PriceBounds { min: Some(100.0), max: Some(499.5) }
        );
    }

    #[test]
    fn test_unbounded_passes_through() {
        let items = twenty_items();
        assert_eq!(filter_by_price(&items, &PriceBounds::default()).len(), 20);
    }

    #[test]
    fn test_filtered_items_lie_within_bounds() {
        let items = twenty_items();
        let bounds = PriceBounds::from_params(Some("250"), Some("500"));
        let filtered = filter_by_price(&items, &bounds);
        assert!(filtered.len() <= items.len());
        for item in filtered {
            let price = item.price_with_tax.lowest_major();
            assert!((250.0..=500.0).contains(&price));
        }
    }

    #[test]
    fn test_range_uses_minimum() {
        let mut ranged = item("band", 0);
        ranged.price_with_tax = PriceSummary::Range {
            min: Money::from_minor(40_000),
            max: Money::from_minor(90_000),
        };
        let items = vec![ranged];
        assert_eq!(filter_by_price(&items, &PriceBounds::up_to(500.0)).len(), 1);
    }

    #[test]
    fn test_under_500_pages() {
        let items = twenty_items();
        let bounds = PriceBounds::up_to(500.0);

        let first = paginate_filtered(filter_by_price(&items, &bounds), 1, 12);
        assert_eq!(first.total_filtered, 15);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 12);

        let second = paginate_filtered(filter_by_price(&items, &bounds), 2, 12);
        assert_eq!(second.items.len(), 3);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items = twenty_items();
        let page = paginate_filtered(filter_by_price(&items, &PriceBounds::up_to(500.0)), 5, 12);
        assert!(page.items.is_empty());
        assert_eq!(page.total_filtered, 15);
    }

    #[test]
    fn test_pagination_links() {
        let params = SearchParams::from_query("q=halo&page=1");
        let pagination = Pagination::build("/search", &params, 1, 3).unwrap();
        assert_eq!(pagination.previous_url, None);
        assert_eq!(pagination.next_url.as_deref(), Some("/search?q=halo&page=2"));
        assert_eq!(pagination.pages.len(), 3);
        assert!(pagination.pages[0].current);

        let last = Pagination::build("/search", &params, 3, 3).unwrap();
        assert_eq!(last.next_url, None);
        assert_eq!(last.previous_url.as_deref(), Some("/search?q=halo&page=2"));
    }

    #[test]
    fn test_single_page_has_no_pagination() {
        assert!(Pagination::build("/search", &SearchParams::default(), 1, 1).is_none());
    }

    #[test]
    fn test_card_shows_from_for_ranges() {
        let mut ranged = item("band", 0);
        ranged.price_with_tax = PriceSummary::Range {
            min: Money::from_minor(129_900),
            max: Money::from_minor(250_000),
        };
        ranged.product_asset = Some(AssetPreview {
            preview: "http://assets\\band.jpg".to_string(),
        });
        let card = ProductCard::from_item(&ranged);
        assert!(card.from);
        assert_eq!(card.price, "$1,299.00");
        assert_eq!(card.url, "/product/band");
        assert_eq!(card.image.as_deref(), Some("http://assets/band.jpg"));
    }

    #[test]
    fn test_count_label() {
        let items = vec![item("solo", 100)];
        let grid = ProductGrid::plain(&items, 1, 12, "/search", &SearchParams::default(), 1);
        assert_eq!(grid.count_label(), "1 product");
        assert!(grid.pagination.is_none());
    }
}
