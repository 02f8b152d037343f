//! Shared listing body for search, collection and price pages: facet
//! panel, sort menu and product grid.

use crate::catalog::{
    FacetPanel, PriceBounds, ProductGrid, SearchOptions, SearchParams, SortOption,
    build_search_input, current_page,
};
use crate::error::Result;
use crate::state::AppState;
use crate::vendure::{RequestContext, SearchResult};

/// A sort menu entry.
#[derive(Debug, Clone)]
pub struct SortLink {
    pub label: &'static str,
    pub url: String,
    pub selected: bool,
}

/// Sort links for `path`; choosing one resets to page 1.
#[must_use]
pub fn sort_links(path: &str, params: &SearchParams) -> Vec<SortLink> {
    let active = params.sort();
    SortOption::ALL
        .iter()
        .map(|option| {
            let mut next = params.clone();
            next.set("sort", option.as_param());
            next.remove("page");
            SortLink {
                label: option.label(),
                url: next.to_url(path),
                selected: *option == active,
            }
        })
        .collect()
}

/// How the grid paginates.
#[derive(Debug, Clone, Copy)]
pub enum GridMode {
    /// Server `totalItems`.
    Plain,
    /// Post-fetch price filter over the returned batch.
    Filtered(PriceBounds),
}

impl GridMode {
    /// Filter only when the URL carries a usable price bound.
    #[must_use]
    pub fn from_query(params: &SearchParams) -> Self {
        let bounds = PriceBounds::from_query(params);
        if bounds.is_unbounded() {
            Self::Plain
        } else {
            Self::Filtered(bounds)
        }
    }
}

/// A rendered listing.
#[derive(Debug, Clone)]
pub struct Listing {
    pub grid: ProductGrid,
    pub facets: Option<FacetPanel>,
    pub sort_links: Vec<SortLink>,
    pub sort_label: &'static str,
    /// The raw search result, for JSON-LD item lists.
    pub result: SearchResult,
}

impl Listing {
    /// Run the search for `params` and lay out the result under `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop API search fails.
    pub async fn fetch(
        state: &AppState,
        ctx: &RequestContext,
        path: &str,
        params: &SearchParams,
        options: &SearchOptions,
        mode: GridMode,
    ) -> Result<Self> {
        let input = build_search_input(params, options);
        let result = state.shop().search(input, ctx).await?;
        Ok(Self::from_result(result, path, params, options, mode))
    }

    /// Lay out an already fetched result.
    #[must_use]
    pub fn from_result(
        result: SearchResult,
        path: &str,
        params: &SearchParams,
        options: &SearchOptions,
        mode: GridMode,
    ) -> Self {
        let page = current_page(params);
        let grid = match mode {
            GridMode::Plain => ProductGrid::plain(
                &result.items,
                result.total_items,
                options.take,
                path,
                params,
                page,
            ),
            GridMode::Filtered(bounds) => {
                ProductGrid::filtered(&result.items, &bounds, options.take, path, params, page)
            }
        };

        Self {
            facets: FacetPanel::build(&result.facet_values, path, params),
            sort_links: sort_links(path, params),
            sort_label: params.sort().label(),
            grid,
            result,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::grid::tests::item;

    #[test]
    fn test_sort_links_reset_page() {
        let params = SearchParams::from_query("q=oval&page=3&sort=price-asc");
        let links = sort_links("/search", &params);
        assert_eq!(links.len(), 4);
        assert_eq!(links[3].url, "/search?q=oval&sort=price-desc");
        assert!(links[2].selected);
        assert!(!links[0].selected);
    }

    #[test]
    fn test_grid_mode_from_query() {
        assert!(matches!(
            GridMode::from_query(&SearchParams::from_query("q=ring")),
            GridMode::Plain
        ));
        assert!(matches!(
            GridMode::from_query(&SearchParams::from_query("maxPrice=0")),
            GridMode::Plain
        ));
        assert!(matches!(
            GridMode::from_query(&SearchParams::from_query("maxPrice=500")),
            GridMode::Filtered(_)
        ));
    }

    #[test]
    fn test_filtered_listing_counts_filtered_set() {
        let items: Vec<_> = (0..20)
            .map(|i| item(&format!("ring-{i}"), if i < 15 { 40_000 } else { 90_000 }))
            .collect();
        let result = SearchResult {
            total_items: 20,
            items,
            facet_values: Vec::new(),
        };
        let params = SearchParams::from_query("maxPrice=500");
        let listing = Listing::from_result(
            result,
            "/search",
            &params,
            &SearchOptions::default(),
            GridMode::from_query(&params),
        );
        assert_eq!(listing.grid.total, 15);
        assert_eq!(listing.grid.cards.len(), 12);
        assert!(listing.facets.is_none());
        assert_eq!(listing.sort_label, "Name: A to Z");
    }
}
