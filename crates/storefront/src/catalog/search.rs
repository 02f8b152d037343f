//! URL query parameters to shop API search input.
//!
//! Filter, sort and page state live only in the query string. Every page that
//! lists products parses it with [`SearchParams::from_query`] and rebuilds
//! links by editing the parsed pairs.

use ever_and_always_core::FacetValueId;
use url::form_urlencoded;

use crate::vendure::{FacetValueFilter, SearchInput, SearchSort, SortOrder};

/// Products per page.
pub const PAGE_SIZE: u32 = 12;

/// Parsed query string, preserving order and repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// Parse a raw query string (without the leading `?`).
    #[must_use]
    pub fn from_query(raw: &str) -> Self {
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all<'a, 'k>(
        &'a self,
        key: &'k str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'k> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The value for `key` only when it appears exactly once.
    #[must_use]
    pub fn get_single(&self, key: &str) -> Option<&str> {
        let mut values = self.get_all(key);
        match (values.next(), values.next()) {
            (Some(value), None) => Some(value),
            _ => None,
        }
    }

    /// Remove every value for `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Append a value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replace `key` with a single value, keeping the first occurrence's
    /// position (appending when absent).
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let mut placed = false;
        self.pairs.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            if placed {
                return false;
            }
            v.clone_from(&value);
            placed = true;
            true
        });
        if !placed {
            self.append(key, value);
        }
    }

    /// Free-text term, when non-empty.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.get("q").map(str::trim).filter(|q| !q.is_empty())
    }

    /// Selected facet value IDs, in URL order.
    #[must_use]
    pub fn facets(&self) -> Vec<FacetValueId> {
        self.get_all("facets")
            .filter(|id| !id.is_empty())
            .map(FacetValueId::from)
            .collect()
    }

    /// Whether `id` is among the selected facets.
    #[must_use]
    pub fn has_facet(&self, id: &FacetValueId) -> bool {
        self.get_all("facets").any(|v| v == id.as_str())
    }

    /// Requested sort order.
    #[must_use]
    pub fn sort(&self) -> SortOption {
        self.get("sort").map(SortOption::from_param).unwrap_or_default()
    }

    /// Serialize back to a query string (without `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// `path` with this query string appended, omitting an empty `?`.
    #[must_use]
    pub fn to_url(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }

    /// Same parameters with `page` set.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        let mut params = self.clone();
        params.set("page", page.to_string());
        params
    }
}

/// Effective 1-based page. Missing, non-numeric, zero or negative values are page 1.
#[must_use]
pub fn current_page(params: &SearchParams) -> u32 {
    params
        .get("page")
        .and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p > 0)
        .and_then(|p| u32::try_from(p).ok())
        .unwrap_or(1)
}

/// Sort options offered on listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl SortOption {
    /// All options, in menu order.
    pub const ALL: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::PriceAsc, Self::PriceDesc];

    /// Parse the `sort` URL parameter. Unknown values use the default.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value {
            "name-desc" => Self::NameDesc,
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::NameAsc,
        }
    }

    /// Value of the `sort` URL parameter.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NameAsc => "Name: A to Z",
            Self::NameDesc => "Name: Z to A",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
        }
    }

    /// Shop API sort clause.
    #[must_use]
    pub const fn to_search_sort(self) -> SearchSort {
        match self {
            Self::NameAsc => SearchSort::Name(SortOrder::Asc),
            Self::NameDesc => SearchSort::Name(SortOrder::Desc),
            Self::PriceAsc => SearchSort::Price(SortOrder::Asc),
            Self::PriceDesc => SearchSort::Price(SortOrder::Desc),
        }
    }
}

/// Page-level options that do not come from the URL.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Restrict to a collection.
    pub collection_slug: Option<String>,
    /// Page size.
    pub take: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            collection_slug: None,
            take: PAGE_SIZE,
        }
    }
}

impl SearchOptions {
    /// Options scoped to a collection.
    #[must_use]
    pub fn for_collection(slug: impl Into<String>) -> Self {
        Self {
            collection_slug: Some(slug.into()),
            ..Self::default()
        }
    }
}

/// Build the shop API search input from URL parameters.
///
/// Price bounds are not sent; listing pages filter on price after the fetch.
#[must_use]
pub fn build_search_input(params: &SearchParams, options: &SearchOptions) -> SearchInput {
    let page = current_page(params);
    let facets = params.facets();

    SearchInput {
        term: params.term().map(ToString::to_string),
        collection_slug: options.collection_slug.clone(),
        facet_value_filters: if facets.is_empty() {
            None
        } else {
            Some(
                facets
                    .into_iter()
                    .map(|id| FacetValueFilter { and: id })
                    .collect(),
            )
        },
        group_by_product: true,
        take: options.take,
        skip: (page - 1).saturating_mul(options.take),
        sort: Some(params.sort().to_search_sort()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_page_defaults() {
        for raw in ["", "page=", "page=abc", "page=0", "page=-3", "page=1.5"] {
            assert_eq!(current_page(&SearchParams::from_query(raw)), 1, "{raw}");
        }
        assert_eq!(current_page(&SearchParams::from_query("page=4")), 4);
    }

    #[test]
    fn test_build_input_without_facets_omits_filter() {
        let input = build_search_input(&SearchParams::from_query("q=halo"), &SearchOptions::default());
        assert_eq!(input.facet_value_filters, None);
        assert_eq!(input.term.as_deref(), Some("halo"));
        assert_eq!(input.skip, 0);
        assert_eq!(input.take, 12);
        assert!(input.group_by_product);
        assert_eq!(input.sort, Some(SearchSort::Name(SortOrder::Asc)));
    }

    #[test]
    fn test_build_input_with_facets_and_page() {
        let params = SearchParams::from_query("facets=3&facets=9&page=3&sort=price-desc");
        let input = build_search_input(&params, &SearchOptions::for_collection("engagement-rings"));
        assert_eq!(
            input.facet_value_filters,
            Some(vec![
                FacetValueFilter { and: FacetValueId::new("3") },
                FacetValueFilter { and: FacetValueId::new("9") },
            ])
        );
        assert_eq!(input.skip, 24);
        assert_eq!(input.collection_slug.as_deref(), Some("engagement-rings"));
        assert_eq!(input.sort, Some(SearchSort::Price(SortOrder::Desc)));
    }

    #[test]
    fn test_blank_term_is_absent() {
        let input = build_search_input(&SearchParams::from_query("q=++"), &SearchOptions::default());
        assert_eq!(input.term, None);
    }

    #[test]
    fn test_get_single_rejects_repeats() {
        let params = SearchParams::from_query("metal=gold&size=6&size=7");
        assert_eq!(params.get_single("metal"), Some("gold"));
        assert_eq!(params.get_single("size"), None);
        assert_eq!(params.get_single("carat"), None);
    }

    #[test]
    fn test_values_borrow_only_from_params() {
        let params = SearchParams::from_query("metal=gold&facets=1&facets=2");
        let (single, all) = {
            let key = String::from("metal");
            let facets = String::from("facets");
            (
                params.get_single(&key),
                params.get_all(&facets).collect::<Vec<_>>(),
            )
        };
        assert_eq!(single, Some("gold"));
        assert_eq!(all, vec!["1", "2"]);
    }

    #[test]
    fn test_set_collapses_repeats_in_place() {
        let mut params = SearchParams::from_query("a=1&size=6&b=2&size=7");
        params.set("size", "8");
        assert_eq!(params.to_query_string(), "a=1&size=8&b=2");

        params.set("metal", "gold");
        assert_eq!(params.to_query_string(), "a=1&size=8&b=2&metal=gold");
    }

    #[test]
    fn test_with_page_preserves_other_params() {
        let params = SearchParams::from_query("q=oval+cut&facets=2&page=1");
        assert_eq!(
            params.with_page(2).to_url("/search"),
            "/search?q=oval+cut&facets=2&page=2"
        );
    }

    #[test]
    fn test_to_url_without_query() {
        assert_eq!(SearchParams::default().to_url("/search"), "/search");
    }

    #[test]
    fn test_sort_param_round_trip() {
        for option in SortOption::ALL {
            assert_eq!(SortOption::from_param(option.as_param()), option);
        }
        assert_eq!(SortOption::from_param("bogus"), SortOption::NameAsc);
    }
}
