//! Search results page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{RawQuery, State};
use tracing::instrument;

use crate::catalog::{SearchOptions, SearchParams};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::layout::Layout;
use crate::routes::listing::{GridMode, Listing};
use crate::seo::PageMeta;
use crate::state::AppState;

pub const PATH: &str = "/search";

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub layout: Layout,
    pub term: String,
    pub listing: Listing,
    /// Current price bounds for the filter form.
    pub min_price: String,
    pub max_price: String,
}

/// Display search results for `q`, `facets`, `sort`, `page` and optional
/// `minPrice`/`maxPrice`.
#[instrument(skip(state, ctx, nonce))]
pub async fn search(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    RawQuery(query): RawQuery,
) -> Result<SearchTemplate> {
    let params = SearchParams::from_query(query.as_deref().unwrap_or_default());
    let term = params.term().unwrap_or_default().to_string();

    let listing = Listing::fetch(
        &state,
        &ctx,
        PATH,
        &params,
        &SearchOptions::default(),
        GridMode::from_query(&params),
    )
    .await?;

    let title = if term.is_empty() {
        "Search".to_string()
    } else {
        format!("Search results for \"{term}\"")
    };
    let meta = PageMeta::new(&title, "Search diamond rings, wedding bands and fine jewelry.")
        .canonical(state.config().absolute_url(PATH))
        .noindex();

    let mut layout = Layout::load(&state, &ctx, nonce, meta, &params.to_url(PATH)).await;
    layout.search_term.clone_from(&term);

    Ok(SearchTemplate {
        layout,
        term,
        listing,
        min_price: params.get("minPrice").unwrap_or_default().to_string(),
        max_price: params.get("maxPrice").unwrap_or_default().to_string(),
    })
}
